// src/bin/shellenv.rs

//! The `shellenv` command-line tool.

use anyhow::Result;
use clap::Parser;
use colored::*;
use shellenv::{
    ShellExecutable, TomlPreferenceStore,
    cli::{Cli, dispatcher, handlers::run::CommandExit},
    constants::PREFERENCES_FILENAME,
};
use std::sync::Arc;

/// Sets up logging, opens the preference store, dispatches to a handler
/// and performs centralized error handling.
fn main() {
    env_logger::init();

    if let Err(e) = run_cli(Cli::parse()) {
        // A launched command failed; mirror its status without extra noise.
        if let Some(CommandExit(code)) = e.downcast_ref::<CommandExit>() {
            std::process::exit(*code);
        }
        // Handler argument errors and `--help` output keep clap's formatting.
        if let Some(clap_err) = e.downcast_ref::<clap::Error>() {
            clap_err.exit();
        }

        eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    let preferences = match &cli.config {
        Some(dir) => TomlPreferenceStore::open(dir.join(PREFERENCES_FILENAME))?,
        None => TomlPreferenceStore::open_default()?,
    };
    log::debug!("Using preferences at '{}'", preferences.path().display());

    let shell = ShellExecutable::new(Arc::new(preferences));
    dispatcher::dispatch(cli.args, &shell)
}
