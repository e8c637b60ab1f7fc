//! Locates a usable login shell, snapshots the environment it exports and
//! launches commands through it.
//!
//! The entry point is [`ShellExecutable`]: build one at startup, keep it
//! alive for as long as commands are launched, and share it by reference.

/// Command-line front end: argument types, dispatcher and handlers.
pub mod cli;
/// Fixed names, flags and defaults.
pub mod constants;
/// Pure logic: parsing, composition, platform rules and caches.
pub mod core;
/// Shared type aliases and plain data types.
pub mod models;
pub mod system;

pub use crate::core::locator::LocatorError;
pub use crate::core::platform::PlatformPolicy;
pub use crate::models::{EnvSource, ShellEnvironment};
pub use crate::system::preferences::{
    MemoryPreferenceStore, PreferenceError, PreferenceStore, TomlPreferenceStore,
};
pub use crate::system::probe::{FileProbe, SystemProbe};
pub use crate::system::shell::{ShellError, ShellExecutable, ShellExecutableBuilder};
