//! Diagnostic side channel.
//!
//! Observers are told about every completed invocation. They only get shared
//! access to the store and return nothing, so they cannot alter a result or
//! the control flow of a call.

use std::fmt::{self, Debug};

use serde::Serialize;

use crate::store::KeyStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CallOutcome {
    Hit,
    Miss,
}

impl fmt::Display for CallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hit => write!(f, "hit"),
            Self::Miss => write!(f, "miss"),
        }
    }
}

/// One completed invocation, seen after the store was updated.
pub struct CallEvent<'a, A, R> {
    pub outcome: CallOutcome,
    pub args: &'a [A],
    pub store: &'a dyn KeyStore<A, R>,
}

pub trait CacheObserver<A, R> {
    fn observe(&mut self, event: &CallEvent<'_, A, R>);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotEntry {
    pub args: Vec<String>,
    pub value: String,
}

/// Point-in-time rendering of the cache contents, sorted by arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheSnapshot {
    pub entries: Vec<SnapshotEntry>,
}

impl CacheSnapshot {
    pub fn capture<A, R, S>(store: &S) -> Self
    where
        A: Debug,
        R: Debug,
        S: KeyStore<A, R> + ?Sized,
    {
        let mut entries = Vec::with_capacity(store.len());
        store.for_each_entry(&mut |args, value| {
            entries.push(SnapshotEntry {
                args: args.iter().map(|a| format!("{:?}", a)).collect(),
                value: format!("{:?}", value),
            });
        });
        entries.sort_by(|a, b| a.args.cmp(&b.args));
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Emits a `debug` event with the cache contents after each call.
///
/// The snapshot is only built when the debug level is enabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl<A: Debug, R: Debug> CacheObserver<A, R> for TracingObserver {
    fn observe(&mut self, event: &CallEvent<'_, A, R>) {
        if !tracing::enabled!(tracing::Level::DEBUG) {
            return;
        }
        let snapshot = CacheSnapshot::capture(event.store);
        tracing::debug!(
            outcome = %event.outcome,
            args = ?event.args,
            entries = snapshot.len(),
            cache = ?snapshot.entries,
            "memoise cache"
        );
    }
}
