//! The memoizing wrappers.

use std::fmt::Debug;
use std::hash::Hash;

use crate::cache::{CacheStats, MemoCache};
use crate::config::MemoConfig;
use crate::observe::{CacheObserver, CacheSnapshot, TracingObserver};
use crate::store::{AnyStore, KeyStore};

/// Wrap `func` with a fresh flat cache.
///
/// ```
/// use memoise_core::memoize;
///
/// let mut sum = memoize(|args: &[i64]| args.iter().sum::<i64>());
/// assert_eq!(sum.call(&[2, 2]), 4);
/// assert_eq!(sum.call(&[2, 2]), 4);
/// assert_eq!(sum.stats().misses, 1);
/// ```
pub fn memoize<A, R, F>(func: F) -> Memoized<A, R, F>
where
    A: Eq + Hash + Clone,
    F: FnMut(&[A]) -> R,
{
    Memoized::new(func)
}

/// Wrap a fallible `func`. Errors are returned as-is and never cached.
pub fn memoize_fallible<A, T, E, F>(func: F) -> FallibleMemoized<A, T, F>
where
    A: Eq + Hash + Clone,
    F: FnMut(&[A]) -> Result<T, E>,
{
    FallibleMemoized::new(func)
}

/// A function plus the cache of its results, keyed by argument sequence.
pub struct Memoized<A, R, F, S = AnyStore<A, R>> {
    func: F,
    cache: MemoCache<A, R, S>,
}

impl<A, R, F> Memoized<A, R, F>
where
    A: Eq + Hash + Clone,
    F: FnMut(&[A]) -> R,
{
    pub fn new(func: F) -> Self {
        Self::with_store(func, AnyStore::for_strategy(Default::default()))
    }

    /// Build the store and observer described by `config`.
    pub fn from_config(func: F, config: &MemoConfig) -> Self
    where
        A: Debug + 'static,
        R: Debug + 'static,
    {
        let mut memo = Self::with_store(func, AnyStore::for_strategy(config.strategy));
        if config.trace_snapshots {
            memo.cache.set_observer(Box::new(TracingObserver));
        }
        memo
    }
}

impl<A, R, F, S> Memoized<A, R, F, S>
where
    F: FnMut(&[A]) -> R,
    S: KeyStore<A, R>,
{
    pub fn with_store(func: F, store: S) -> Self {
        Self {
            func,
            cache: MemoCache::new(store),
        }
    }

    pub fn with_observer(mut self, observer: impl CacheObserver<A, R> + 'static) -> Self {
        self.cache.set_observer(Box::new(observer));
        self
    }

    /// Return the cached result for `args`, computing and storing it on a miss.
    ///
    /// If `func` panics the cache is left untouched.
    pub fn call(&mut self, args: &[A]) -> R
    where
        R: Clone,
    {
        if let Some(hit) = self.cache.lookup(args) {
            return hit;
        }
        let value = (self.func)(args);
        self.cache.record_miss(args, value.clone());
        value
    }

    /// Consume the wrapper into a plain closure.
    pub fn into_fn(mut self) -> impl FnMut(&[A]) -> R
    where
        R: Clone,
    {
        move |args: &[A]| self.call(args)
    }

    pub fn contains(&self, args: &[A]) -> bool {
        self.cache.contains(args)
    }

    pub fn len(&self) -> usize {
        self.cache.stats().entries
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn store(&self) -> &S {
        self.cache.store()
    }

    pub fn snapshot(&self) -> CacheSnapshot
    where
        A: Debug,
        R: Debug,
    {
        self.cache.snapshot()
    }
}

/// Memoizing wrapper for functions returning `Result`. Only `Ok` values are
/// stored.
pub struct FallibleMemoized<A, T, F, S = AnyStore<A, T>> {
    func: F,
    cache: MemoCache<A, T, S>,
}

impl<A, T, F> FallibleMemoized<A, T, F>
where
    A: Eq + Hash + Clone,
{
    pub fn new(func: F) -> Self {
        Self::with_store(func, AnyStore::for_strategy(Default::default()))
    }

    pub fn from_config(func: F, config: &MemoConfig) -> Self
    where
        A: Debug + 'static,
        T: Debug + 'static,
    {
        let mut memo = Self::with_store(func, AnyStore::for_strategy(config.strategy));
        if config.trace_snapshots {
            memo.cache.set_observer(Box::new(TracingObserver));
        }
        memo
    }
}

impl<A, T, F, S> FallibleMemoized<A, T, F, S>
where
    S: KeyStore<A, T>,
{
    pub fn with_store(func: F, store: S) -> Self {
        Self {
            func,
            cache: MemoCache::new(store),
        }
    }

    pub fn with_observer(mut self, observer: impl CacheObserver<A, T> + 'static) -> Self {
        self.cache.set_observer(Box::new(observer));
        self
    }

    /// Like [`Memoized::call`], but an `Err` from `func` is propagated
    /// unchanged and leaves no entry behind, so the next call retries.
    pub fn call<E>(&mut self, args: &[A]) -> Result<T, E>
    where
        F: FnMut(&[A]) -> Result<T, E>,
        T: Clone,
    {
        if let Some(hit) = self.cache.lookup(args) {
            return Ok(hit);
        }
        let value = (self.func)(args)?;
        self.cache.record_miss(args, value.clone());
        Ok(value)
    }

    pub fn contains(&self, args: &[A]) -> bool {
        self.cache.contains(args)
    }

    pub fn len(&self) -> usize {
        self.cache.stats().entries
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn snapshot(&self) -> CacheSnapshot
    where
        A: Debug,
        T: Debug,
    {
        self.cache.snapshot()
    }
}
