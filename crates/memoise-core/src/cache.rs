//! Cache state shared by the infallible and fallible wrappers.

use std::fmt::Debug;

use serde::Serialize;

use crate::observe::{CacheObserver, CacheSnapshot, CallEvent, CallOutcome};
use crate::store::KeyStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl CacheStats {
    pub fn calls(&self) -> u64 {
        self.hits + self.misses
    }

    pub fn hit_rate(&self) -> f64 {
        match self.calls() {
            0 => 0.0,
            n => self.hits as f64 / n as f64,
        }
    }
}

/// Store plus counters and the optional observer.
pub struct MemoCache<A, R, S> {
    store: S,
    hits: u64,
    misses: u64,
    observer: Option<Box<dyn CacheObserver<A, R>>>,
}

impl<A, R, S> MemoCache<A, R, S>
where
    S: KeyStore<A, R>,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            hits: 0,
            misses: 0,
            observer: None,
        }
    }

    pub fn set_observer(&mut self, observer: Box<dyn CacheObserver<A, R>>) {
        self.observer = Some(observer);
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Lookup phase. A hit is counted and reported; a miss is left to
    /// [`MemoCache::record_miss`] once the result exists.
    pub fn lookup(&mut self, args: &[A]) -> Option<R>
    where
        R: Clone,
    {
        let value = self.store.lookup(args).cloned()?;
        self.hits += 1;
        self.notify(CallOutcome::Hit, args);
        Some(value)
    }

    /// Compute phase epilogue: install a freshly computed result.
    pub fn record_miss(&mut self, args: &[A], value: R) {
        self.store.install(args, value);
        self.misses += 1;
        tracing::trace!(arity = args.len(), entries = self.store.len(), "memoise miss");
        self.notify(CallOutcome::Miss, args);
    }

    pub fn contains(&self, args: &[A]) -> bool {
        self.store.lookup(args).is_some()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.store.len(),
        }
    }

    pub fn snapshot(&self) -> CacheSnapshot
    where
        A: Debug,
        R: Debug,
    {
        CacheSnapshot::capture(&self.store)
    }

    fn notify(&mut self, outcome: CallOutcome, args: &[A]) {
        if let Some(observer) = self.observer.as_mut() {
            observer.observe(&CallEvent {
                outcome,
                args,
                store: &self.store,
            });
        }
    }
}
