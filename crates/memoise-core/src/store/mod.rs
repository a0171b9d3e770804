//! Key stores backing the memoizing wrapper.
//!
//! Both stores map a complete argument sequence to one result and share the
//! same contract:
//!
//! - `lookup` never mutates and stops at the first argument with no entry.
//! - `install` is only called after the wrapped function returned a value.
//! - The empty sequence is an ordinary key; a zero-argument result is
//!   present or absent independent of what the result looks like.
//!
//! ```text
//! flat:  { [2, 2] -> 4, [1, 2] -> 3, [] -> 10 }
//!
//! trie:  root (leaf: 10)
//!          ├── 2 ── 2 (leaf: 4)
//!          └── 1 ── 2 (leaf: 3)
//! ```

use std::hash::Hash;

use crate::config::KeyStrategy;

pub mod flat;
pub mod trie;

pub use flat::FlatStore;
pub use trie::TrieStore;

/// Storage for memoized results keyed by argument sequence.
pub trait KeyStore<A, R> {
    /// Cached result for `args`, if one was installed.
    fn lookup(&self, args: &[A]) -> Option<&R>;

    /// Record `value` as the result for `args`.
    fn install(&mut self, args: &[A], value: R);

    /// Number of cached argument sequences.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Visit every `(arguments, result)` pair. Order is unspecified.
    fn for_each_entry(&self, visit: &mut dyn FnMut(&[A], &R));
}

/// Store selected at runtime from [`KeyStrategy`].
#[derive(Debug, Clone)]
pub enum AnyStore<A, R> {
    Flat(FlatStore<A, R>),
    Trie(TrieStore<A, R>),
}

impl<A, R> AnyStore<A, R>
where
    A: Eq + Hash + Clone,
{
    pub fn for_strategy(strategy: KeyStrategy) -> Self {
        match strategy {
            KeyStrategy::Flat => Self::Flat(FlatStore::new()),
            KeyStrategy::Trie => Self::Trie(TrieStore::new()),
        }
    }

    pub fn strategy(&self) -> KeyStrategy {
        match self {
            Self::Flat(_) => KeyStrategy::Flat,
            Self::Trie(_) => KeyStrategy::Trie,
        }
    }
}

impl<A, R> KeyStore<A, R> for AnyStore<A, R>
where
    A: Eq + Hash + Clone,
{
    fn lookup(&self, args: &[A]) -> Option<&R> {
        match self {
            Self::Flat(s) => s.lookup(args),
            Self::Trie(s) => s.lookup(args),
        }
    }

    fn install(&mut self, args: &[A], value: R) {
        match self {
            Self::Flat(s) => s.install(args, value),
            Self::Trie(s) => s.install(args, value),
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Flat(s) => s.len(),
            Self::Trie(s) => s.len(),
        }
    }

    fn for_each_entry(&self, visit: &mut dyn FnMut(&[A], &R)) {
        match self {
            Self::Flat(s) => s.for_each_entry(visit),
            Self::Trie(s) => s.for_each_entry(visit),
        }
    }
}
