// src/cli/handlers/mod.rs

/// Helpers shared by several handlers.
pub mod commons;
/// `config`: manage the shell override.
pub mod config;
/// `env`: print the shell environment.
pub mod env;
/// `run`: launch a command through the login shell.
pub mod run;
/// `which`: print the resolved shell.
pub mod which;
/// `wrap`: print the composed command line.
pub mod wrap;
