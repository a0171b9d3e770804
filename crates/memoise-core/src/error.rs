//! Error types for the memoise core.

use std::path::PathBuf;

/// Errors raised by the memoise core itself.
///
/// Failures of the wrapped function are never converted into this type; they
/// reach the caller exactly as the function returned them.
#[derive(Debug, thiserror::Error)]
pub enum MemoError {
    /// Argument cannot be used as a cache key (arrays, objects).
    #[error("argument {position} is not usable as a cache key: {kind}")]
    UnhashableArgument { position: usize, kind: String },

    /// Float argument without a stable equality (NaN).
    #[error("argument {position} is not usable as a cache key: NaN has no equality")]
    NonFiniteKey { position: usize },

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Reading a config file failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MemoError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// True when the error comes from caller-supplied arguments rather than setup.
    pub fn is_key_error(&self) -> bool {
        matches!(
            self,
            Self::UnhashableArgument { .. } | Self::NonFiniteKey { .. }
        )
    }
}

/// Result alias for memoise operations.
pub type MemoResult<T> = Result<T, MemoError>;
