// src/core/env_cache.rs

use crate::models::ShellEnvironment;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Snapshot {
    env: Option<ShellEnvironment>,
    generation: u64,
}

/// Holds the global shell environment snapshot.
///
/// Computation is serialized by its own lock so that concurrent first
/// callers run the probe once, while `invalidate` only ever touches the
/// snapshot lock and never waits behind a running probe.
#[derive(Debug, Default)]
pub struct EnvironmentCache {
    snapshot: Mutex<Snapshot>,
    compute: Mutex<()>,
}

impl EnvironmentCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached snapshot, computing it with `compute` on a miss.
    ///
    /// A snapshot computed across an `invalidate` is returned to this caller
    /// but not stored.
    pub fn get_or_compute<F>(&self, compute: F) -> ShellEnvironment
    where
        F: FnOnce() -> ShellEnvironment,
    {
        if let Some(env) = &self.snapshot().env {
            return env.clone();
        }

        let _computing = self.compute.lock().unwrap_or_else(PoisonError::into_inner);

        let generation = {
            let snapshot = self.snapshot();
            if let Some(env) = &snapshot.env {
                return env.clone();
            }
            snapshot.generation
        };

        let env = compute();

        let mut snapshot = self.snapshot();
        if snapshot.generation == generation {
            snapshot.env = Some(env.clone());
        } else {
            log::debug!("Shell environment invalidated while computing; not caching.");
        }
        env
    }

    /// Drops the cached snapshot.
    pub fn invalidate(&self) {
        let mut snapshot = self.snapshot();
        snapshot.env = None;
        snapshot.generation = snapshot.generation.wrapping_add(1);
    }

    /// Returns `true` if a snapshot is stored.
    pub fn is_cached(&self) -> bool {
        self.snapshot().env.is_some()
    }

    fn snapshot(&self) -> MutexGuard<'_, Snapshot> {
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
