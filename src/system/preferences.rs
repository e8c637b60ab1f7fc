// src/system/preferences.rs

use crate::{core::paths, models::PreferenceTable};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Failures loading or saving preferences.
#[derive(Error, Debug)]
pub enum PreferenceError {
    /// Reading or writing the file failed.
    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),
    /// The staged file could not replace the target.
    #[error("Error with temporary file: {0}")]
    TempFile(#[from] tempfile::PersistError),
    /// The file exists but is not a flat TOML table of strings.
    #[error("Failed to parse preferences file '{path}': {source}")]
    TomlParse {
        /// The file that failed to parse.
        path: String,
        /// The parser's error.
        #[source]
        source: toml::de::Error,
    },
    /// The table could not be rendered as TOML.
    #[error("Failed to serialize preferences to TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    /// The configuration directory is unusable.
    #[error(transparent)]
    Path(#[from] paths::PathError),
    /// The backing store rejected the operation.
    #[error("Preference store is unavailable: {0}")]
    Unavailable(String),
}

/// A string key-value store for user preferences.
///
/// Writes are staged in memory; `flush` commits them to the backing store.
pub trait PreferenceStore: Send + Sync {
    /// The value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;
    /// Stages `value` under `key`.
    fn set(&self, key: &str, value: &str);
    /// Stages the removal of `key`.
    fn remove(&self, key: &str);
    /// Commits staged changes to the backing store.
    fn flush(&self) -> Result<(), PreferenceError>;
}

/// Preferences persisted as a flat TOML table.
#[derive(Debug)]
pub struct TomlPreferenceStore {
    path: PathBuf,
    values: Mutex<PreferenceTable>,
}

impl TomlPreferenceStore {
    /// Opens the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PreferenceError> {
        let path = path.into();
        let values = if path.exists() {
            let content = fs::read_to_string(&path)?;
            toml::from_str(&content).map_err(|e| PreferenceError::TomlParse {
                path: path.display().to_string(),
                source: e,
            })?
        } else {
            PreferenceTable::new()
        };
        log::debug!(
            "Loaded {} preference(s) from '{}'",
            values.len(),
            path.display()
        );
        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    /// Opens `preferences.toml` in the default configuration directory.
    pub fn open_default() -> Result<Self, PreferenceError> {
        Self::open(paths::get_preferences_path()?)
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn values(&self) -> MutexGuard<'_, PreferenceTable> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PreferenceStore for TomlPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values().remove(key);
    }

    /// Writes the table through a temporary file renamed over the target.
    fn flush(&self) -> Result<(), PreferenceError> {
        let toml_string = toml::to_string_pretty(&*self.values())?;

        let parent = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)?;

        let mut staged = NamedTempFile::new_in(&parent)?;
        staged.write_all(toml_string.as_bytes())?;
        staged.flush()?;
        staged.persist(&self.path)?;
        log::trace!("Preferences written to '{}'", self.path.display());
        Ok(())
    }
}

/// Preferences kept only in memory. Used by tests and embedders that manage
/// persistence themselves.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<HashMap<String, String>>,
    fail_flush: AtomicBool,
    flushes: AtomicUsize,
}

impl MemoryPreferenceStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `flush` fail.
    pub fn failing_flush(self) -> Self {
        self.fail_flush.store(true, Ordering::SeqCst);
        self
    }

    /// Number of successful flushes so far.
    pub fn flush_count(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }

    fn values(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values().remove(key);
    }

    fn flush(&self) -> Result<(), PreferenceError> {
        if self.fail_flush.load(Ordering::SeqCst) {
            return Err(PreferenceError::Unavailable(
                "backing store rejected the write".to_string(),
            ));
        }
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
