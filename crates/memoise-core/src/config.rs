use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MemoError, MemoResult};

pub const SUPPORTED_CONFIG_VERSION: u32 = 1;

/// Environment variable overriding the configured key strategy.
pub const STRATEGY_ENV: &str = "MEMOISE_STRATEGY";

/// How argument sequences are turned into cache keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyStrategy {
    /// One composite key per argument sequence.
    #[default]
    Flat,
    /// One trie level per argument position.
    Trie,
}

impl std::str::FromStr for KeyStrategy {
    type Err = MemoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flat" => Ok(Self::Flat),
            "trie" => Ok(Self::Trie),
            other => Err(MemoError::config(format!(
                "unknown key strategy '{}' (expected flat or trie)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemoConfig {
    pub version: u32,
    #[serde(default)]
    pub strategy: KeyStrategy,
    /// Emit a debug event with the cache contents after every call.
    #[serde(default)]
    pub trace_snapshots: bool,
}

impl Default for MemoConfig {
    fn default() -> Self {
        Self {
            version: SUPPORTED_CONFIG_VERSION,
            strategy: KeyStrategy::default(),
            trace_snapshots: false,
        }
    }
}

impl MemoConfig {
    pub fn from_yaml_str(raw: &str) -> MemoResult<Self> {
        let cfg: MemoConfig = serde_yaml::from_str(raw)
            .map_err(|e| MemoError::config(format!("failed to parse YAML: {}", e)))?;
        if cfg.version != SUPPORTED_CONFIG_VERSION {
            return Err(MemoError::config(format!(
                "unsupported config version {} (supported: {})",
                cfg.version, SUPPORTED_CONFIG_VERSION
            )));
        }
        Ok(cfg)
    }

    /// Apply `MEMOISE_STRATEGY` if set.
    pub fn apply_env(self) -> MemoResult<Self> {
        match std::env::var(STRATEGY_ENV) {
            Ok(raw) => self.with_strategy_override(Some(&raw)),
            Err(_) => Ok(self),
        }
    }

    pub fn with_strategy_override(mut self, raw: Option<&str>) -> MemoResult<Self> {
        if let Some(raw) = raw {
            self.strategy = raw.parse()?;
            tracing::debug!(strategy = ?self.strategy, "key strategy overridden");
        }
        Ok(self)
    }
}

pub fn load_config(path: &Path) -> MemoResult<MemoConfig> {
    let raw = std::fs::read_to_string(path).map_err(|source| MemoError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    MemoConfig::from_yaml_str(&raw)
}
