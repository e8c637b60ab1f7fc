// src/models.rs

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// A filtered snapshot of the variables a shell exports.
pub type ShellEnvironment = HashMap<String, String>;

/// On-disk shape of `preferences.toml`: a flat table of string entries.
pub type PreferenceTable = BTreeMap<String, String>;

/// Looks up an environment variable by name. Injected so that template
/// expansion can be driven by something other than the real process env.
pub type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Returns an [`EnvLookup`] backed by the current process environment.
pub fn process_env_lookup() -> EnvLookup {
    Arc::new(|name: &str| std::env::var(name).ok())
}

/// How the environment of a launched child process is derived.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EnvSource {
    /// Inherit the parent's environment untouched.
    #[default]
    Inherit,
    /// Inherit the parent's environment and overlay these entries.
    Merge(HashMap<String, String>),
    /// Discard the parent's environment and use exactly these `KEY=VALUE` entries.
    Replace(Vec<String>),
}

impl EnvSource {
    /// Builds a merge source, treating an empty map like no override at all.
    pub fn merge(vars: Option<&HashMap<String, String>>) -> Self {
        match vars {
            Some(vars) if !vars.is_empty() => Self::Merge(vars.clone()),
            _ => Self::Inherit,
        }
    }
}
