// src/core/locator.rs

use crate::{
    constants::SHELL_PATH_PREFERENCE,
    core::platform::PlatformPolicy,
    models::EnvLookup,
    system::{preferences::PreferenceStore, probe::FileProbe},
};
use std::path::PathBuf;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};
use thiserror::Error;

/// Why the shell path could not be produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocatorError {
    /// Neither the override nor the search found an executable.
    #[error("Shell executable could not be found.")]
    NotFound,
    /// Resolution was requested by the thread already performing it.
    #[error("Shell resolution was re-entered from the thread performing it.")]
    Reentrant,
}

/// Where shell resolution currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ResolveState {
    Unresolved,
    /// A search is running on `owner`; other threads wait for it.
    Resolving { owner: ThreadId },
    Resolved(PathBuf),
    /// The last search failed. Threads that waited on it get the error;
    /// later callers search again.
    Failed(LocatorError),
}

#[derive(Debug)]
struct Slot {
    state: ResolveState,
    /// Bumped on every invalidation so a search that started before it
    /// never populates the cache.
    generation: u64,
}

enum Step {
    Done(Result<PathBuf, LocatorError>),
    Wait,
    Search,
}

/// Finds the shell executable and caches the answer.
pub struct ShellLocator {
    policy: PlatformPolicy,
    probe: Arc<dyn FileProbe>,
    preferences: Arc<dyn PreferenceStore>,
    env_lookup: EnvLookup,
    slot: Mutex<Slot>,
    settled: Condvar,
}

impl std::fmt::Debug for ShellLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShellLocator")
            .field("policy", &self.policy)
            .field("slot", &*self.lock())
            .finish_non_exhaustive()
    }
}

impl ShellLocator {
    /// Creates a locator with nothing resolved yet.
    pub fn new(
        policy: PlatformPolicy,
        probe: Arc<dyn FileProbe>,
        preferences: Arc<dyn PreferenceStore>,
        env_lookup: EnvLookup,
    ) -> Self {
        Self {
            policy,
            probe,
            preferences,
            env_lookup,
            slot: Mutex::new(Slot {
                state: ResolveState::Unresolved,
                generation: 0,
            }),
            settled: Condvar::new(),
        }
    }

    /// Returns the shell path, searching for it on first use.
    ///
    /// Only one thread searches at a time; the others block until it is done
    /// and share its outcome. A call made from the searching thread itself
    /// returns [`LocatorError::Reentrant`] instead of deadlocking.
    pub fn resolve(&self) -> Result<PathBuf, LocatorError> {
        let me = thread::current().id();
        let mut slot = self.lock();
        let mut waited = false;

        loop {
            let step = match &slot.state {
                ResolveState::Resolved(path) => Step::Done(Ok(path.clone())),
                ResolveState::Resolving { owner } if *owner == me => {
                    Step::Done(Err(LocatorError::Reentrant))
                }
                ResolveState::Resolving { .. } => Step::Wait,
                ResolveState::Failed(err) if waited => Step::Done(Err(err.clone())),
                ResolveState::Unresolved | ResolveState::Failed(_) => Step::Search,
            };

            match step {
                Step::Done(result) => return result,
                Step::Wait => {
                    slot = self
                        .settled
                        .wait(slot)
                        .unwrap_or_else(PoisonError::into_inner);
                    waited = true;
                }
                Step::Search => break,
            }
        }

        let generation = slot.generation;
        slot.state = ResolveState::Resolving { owner: me };
        drop(slot);

        // A panicking probe must not leave waiters blocked forever.
        let unwind_guard = scopeguard::guard_on_unwind((), |()| {
            let mut slot = self.lock();
            if slot.state == (ResolveState::Resolving { owner: me }) {
                slot.state = ResolveState::Unresolved;
            }
            self.settled.notify_all();
        });
        let outcome = self.locate();
        drop(unwind_guard);

        let mut slot = self.lock();
        if slot.generation == generation {
            slot.state = match &outcome {
                Ok(path) => ResolveState::Resolved(path.clone()),
                Err(err) => ResolveState::Failed(err.clone()),
            };
        } else {
            log::debug!("Shell configuration changed during resolution; result not cached.");
            slot.state = ResolveState::Unresolved;
        }
        drop(slot);
        self.settled.notify_all();

        match &outcome {
            Ok(path) => log::debug!("Resolved shell executable: {}", path.display()),
            Err(err) => log::debug!("Shell resolution failed: {}", err),
        }
        outcome
    }

    /// Returns `true` while the calling thread is performing a resolution.
    pub fn is_resolving_on_current_thread(&self) -> bool {
        let me = thread::current().id();
        matches!(self.lock().state, ResolveState::Resolving { owner } if owner == me)
    }

    /// Returns the cached path without triggering a search.
    pub fn cached(&self) -> Option<PathBuf> {
        match &self.lock().state {
            ResolveState::Resolved(path) => Some(path.clone()),
            _ => None,
        }
    }

    /// Forgets the cached result. An in-flight search is allowed to finish
    /// but its result is handed only to its own caller.
    pub fn invalidate(&self) {
        let mut slot = self.lock();
        slot.generation = slot.generation.wrapping_add(1);
        if !matches!(slot.state, ResolveState::Resolving { .. }) {
            slot.state = ResolveState::Unresolved;
        }
    }

    /// The platform rules this locator searches with.
    pub fn policy(&self) -> PlatformPolicy {
        self.policy
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn locate(&self) -> Result<PathBuf, LocatorError> {
        if let Some(path) = self.preferred_path() {
            log::debug!("Using shell from preferences: {}", path.display());
            return Ok(path);
        }

        let name = self.policy.default_executable_name();
        let candidates = self
            .policy
            .candidate_locations(self.probe.as_ref(), &self.env_lookup);
        log::debug!(
            "Searching for '{}' in {} candidate location(s) and PATH",
            name,
            candidates.len()
        );

        self.probe
            .find_executable(name, &candidates)
            .ok_or(LocatorError::NotFound)
    }

    /// Reads the override preference. A directory gets the default executable
    /// name appended; anything that isn't executable is ignored with a warning.
    fn preferred_path(&self) -> Option<PathBuf> {
        let pref = self.preferences.get(SHELL_PATH_PREFERENCE)?;
        if pref.trim().is_empty() {
            return None;
        }

        let mut path = PathBuf::from(pref);
        if self.probe.is_dir(&path) {
            path.push(self.policy.default_executable_name());
        }

        if self.probe.is_executable(&path) {
            Some(path)
        } else {
            log::warn!(
                "Shell executable path preference points to an invalid location: {}",
                path.display()
            );
            None
        }
    }
}
