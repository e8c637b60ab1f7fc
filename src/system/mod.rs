//! # System Interaction Layer
//!
//! Abstractions for talking to the operating system: the filesystem, the
//! preference store and child processes.
//!
//! ## Modules
//!
//! - **`executor`**: Builds and spawns `std::process::Command`s, and runs
//!   short-lived probes with a timeout while capturing their output.
//! - **`preferences`**: The key-value preference store and its TOML-backed
//!   implementation.
//! - **`probe`**: Filesystem checks and executable search (`which`).
//! - **`shell`**: `ShellExecutable`, which ties resolution, environment
//!   caching and process launching together.

/// Child process construction and bounded capture.
pub mod executor;
/// Preference storage.
pub mod preferences;
/// Filesystem checks and executable search.
pub mod probe;
/// The `ShellExecutable` facade.
pub mod shell;
