//! Memoization of deterministic functions over argument sequences.
//!
//! A [`Memoized`] wrapper owns the wrapped function and a private cache.
//! Calling it with an argument slice either returns the result cached for
//! exactly that sequence or invokes the function once and caches what it
//! returned.
//!
//! - Any arity, including zero, through an explicit `&[A]` parameter
//! - Flat (composite key) or trie storage, see [`KeyStrategy`]
//! - Fallible functions: errors propagate untouched and are never cached
//! - Optional observer hook receiving the cache state after each call
//!
//! # Quick Start
//!
//! ```
//! use memoise_core::memoize;
//!
//! let mut calls = 0;
//! let mut min = memoize(|args: &[i64]| {
//!     calls += 1;
//!     args.iter().copied().min()
//! });
//!
//! assert_eq!(min.call(&[3, -1, 7]), Some(-1));
//! assert_eq!(min.call(&[3, -1, 7]), Some(-1));
//! drop(min);
//! assert_eq!(calls, 1);
//! ```
//!
//! Not provided: eviction, sharing a wrapper between threads, persistence.
//! Memory grows with the number of distinct argument sequences seen.
//!
//! # Configuration
//!
//! | Key | Description |
//! |-----|-------------|
//! | `version` | Config format version (must be `1`) |
//! | `strategy` | `flat` (default) or `trie` |
//! | `trace_snapshots` | Emit a `debug` tracing event with the cache contents after each call |
//!
//! `MEMOISE_STRATEGY` overrides `strategy` when [`MemoConfig::apply_env`] is used.

pub mod cache;
pub mod config;
pub mod error;
pub mod key;
pub mod memo;
pub mod observe;
pub mod store;

pub use cache::{CacheStats, MemoCache};
pub use config::{load_config, KeyStrategy, MemoConfig, SUPPORTED_CONFIG_VERSION};
pub use error::{MemoError, MemoResult};
pub use key::ArgKey;
pub use memo::{memoize, memoize_fallible, FallibleMemoized, Memoized};
pub use observe::{
    CacheObserver, CacheSnapshot, CallEvent, CallOutcome, SnapshotEntry, TracingObserver,
};
pub use store::{AnyStore, FlatStore, KeyStore, TrieStore};
