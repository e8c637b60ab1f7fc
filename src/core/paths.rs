// src/core/paths.rs

use crate::constants::{CONFIG_DIR_ENV_VAR, CONFIG_DIR_NAME, PREFERENCES_FILENAME};
use crate::models::EnvLookup;
use lazy_static::lazy_static;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

lazy_static! {
    static ref CONFIG_DIR: Mutex<Option<PathBuf>> = Mutex::new(None);
}

/// Failures resolving the configuration directory.
#[derive(Error, Debug)]
pub enum PathError {
    /// The system reports no config directory.
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    /// The directory could not be created.
    #[error("Could not create config directory at '{path}': {source}")]
    ConfigDirCreation {
        /// The directory that could not be created.
        path: String,
        /// The underlying filesystem error.
        #[source]
        source: std::io::Error,
    },
}

/// Returns the shellenv configuration directory (`~/.config/shellenv` on Linux),
/// honouring `SHELLENV_CONFIG_DIR`. Creates it if it doesn't exist.
///
/// Memoized: the first call computes and caches the path.
pub fn get_config_dir() -> Result<PathBuf, PathError> {
    let mut cached = CONFIG_DIR.lock().unwrap_or_else(PoisonError::into_inner);

    if let Some(path) = &*cached {
        return Ok(path.clone());
    }

    let config_path = match std::env::var_os(CONFIG_DIR_ENV_VAR) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::config_dir()
            .ok_or(PathError::ConfigDirNotFound)?
            .join(CONFIG_DIR_NAME),
    };

    if !config_path.exists() {
        fs::create_dir_all(&config_path).map_err(|e| PathError::ConfigDirCreation {
            path: config_path.display().to_string(),
            source: e,
        })?;
    }

    *cached = Some(config_path.clone());
    Ok(config_path)
}

/// Returns the path to `preferences.toml` inside the configuration directory.
pub fn get_preferences_path() -> Result<PathBuf, PathError> {
    get_config_dir().map(|dir| dir.join(PREFERENCES_FILENAME))
}

/// Expands `${VAR}` references in a location template using `lookup`.
///
/// Returns `None` when the template references a variable that `lookup`
/// does not know, so callers can skip the candidate entirely.
pub fn expand_location_template(template: &str, lookup: &EnvLookup) -> Option<PathBuf> {
    let expanded = shellexpand::env_with_context(template, |name: &str| {
        lookup(name).map(Some).ok_or(MissingVariable)
    });

    match expanded {
        Ok(path) => Some(PathBuf::from(path.into_owned())),
        Err(e) => {
            log::trace!("Skipping location template '{}': {}", template, e);
            None
        }
    }
}

#[derive(Debug)]
struct MissingVariable;

impl std::fmt::Display for MissingVariable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("variable is not set")
    }
}
