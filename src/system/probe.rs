// src/system/probe.rs

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Filesystem checks used while locating the shell.
///
/// The locator only talks to the filesystem through this trait so that the
/// search can be exercised deterministically.
pub trait FileProbe: Send + Sync {
    /// Returns `true` if `path` exists and is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Returns `true` if `path` exists and is a regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Returns `true` if `path` is a regular file the current user may execute.
    fn is_executable(&self, path: &Path) -> bool;

    /// Searches `extra_dirs` first, then the standard `PATH`, for `name`.
    fn find_executable(&self, name: &str, extra_dirs: &[PathBuf]) -> Option<PathBuf>;
}

/// [`FileProbe`] backed by the real filesystem and the `which` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProbe;

impl FileProbe for SystemProbe {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_executable(&self, path: &Path) -> bool {
        is_executable_file(path)
    }

    fn find_executable(&self, name: &str, extra_dirs: &[PathBuf]) -> Option<PathBuf> {
        if extra_dirs.is_empty() {
            return which::which(name).ok();
        }

        let search_path = build_search_path(extra_dirs)?;
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        match which::which_in(name, Some(search_path), cwd) {
            Ok(path) => Some(path),
            Err(e) => {
                log::debug!("'{}' not found in candidate locations or PATH: {}", name, e);
                None
            }
        }
    }
}

/// Joins `extra_dirs` in front of the current `PATH` entries.
fn build_search_path(extra_dirs: &[PathBuf]) -> Option<OsString> {
    let inherited = env::var_os("PATH").unwrap_or_default();
    let dirs = extra_dirs
        .iter()
        .cloned()
        .chain(env::split_paths(&inherited));

    match env::join_paths(dirs) {
        Ok(joined) => Some(joined),
        Err(e) => {
            log::warn!("Could not build shell search path: {}", e);
            None
        }
    }
}

#[cfg(unix)]
fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable_file(path: &Path) -> bool {
    path.is_file()
}
