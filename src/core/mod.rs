// src/core/mod.rs

/// Quote escaping and login-shell command composition.
pub mod composer;
/// The cached global environment snapshot.
pub mod env_cache;
/// Parsing and filtering of `env` output.
pub mod env_parser;
/// Shell executable resolution.
pub mod locator;
/// Configuration paths and location templates.
pub mod paths;
/// Per-platform search rules.
pub mod platform;
