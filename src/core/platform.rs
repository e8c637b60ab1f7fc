// src/core/platform.rs

use crate::{
    constants::{POSIX_SHELL_NAME, WINDOWS_SHELL_LOCATIONS, WINDOWS_SHELL_NAME},
    core::paths::expand_location_template,
    models::EnvLookup,
    system::probe::FileProbe,
};
use std::path::PathBuf;

/// The per-OS-family rules used while locating and driving the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformPolicy {
    /// Windows family: `sh.exe`, Git for Windows locations, no `.rvmrc`.
    Windows,
    /// Everything else: `bash` from `PATH`.
    Posix,
}

impl PlatformPolicy {
    /// The policy for the operating system this binary was built for.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else {
            Self::Posix
        }
    }

    /// Executable name appended to directory overrides and searched for.
    pub fn default_executable_name(self) -> &'static str {
        match self {
            Self::Windows => WINDOWS_SHELL_NAME,
            Self::Posix => POSIX_SHELL_NAME,
        }
    }

    /// Unexpanded candidate directory templates, probed before `PATH`.
    pub fn candidate_templates(self) -> &'static [&'static str] {
        match self {
            Self::Windows => WINDOWS_SHELL_LOCATIONS,
            Self::Posix => &[],
        }
    }

    /// Whether a directory-local init script may be sourced before snapshotting.
    pub fn supports_directory_sourcing(self) -> bool {
        matches!(self, Self::Posix)
    }

    /// Expands the candidate templates and keeps those that exist as directories.
    pub fn candidate_locations(self, probe: &dyn FileProbe, lookup: &EnvLookup) -> Vec<PathBuf> {
        self.candidate_templates()
            .iter()
            .filter_map(|template| expand_location_template(template, lookup))
            .filter(|dir| probe.is_dir(dir))
            .collect()
    }
}
