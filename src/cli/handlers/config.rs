use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;

use crate::system::shell::ShellExecutable;

#[derive(Parser, Debug)]
#[command(
    no_binary_name = true,
    about = "Shows or changes the shell executable override."
)]
struct ConfigArgs {
    #[command(subcommand)]
    action: Option<ConfigAction>,
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the stored override, if any.
    Get,
    /// Store a shell executable, or a directory containing one.
    Set {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
    /// Remove the override and fall back to the platform search.
    Clear,
}

/// Reads, stores or clears the shell override.
pub fn handle(args: Vec<String>, shell: &ShellExecutable) -> Result<()> {
    let config_args = ConfigArgs::try_parse_from(&args)?;

    match config_args.action.unwrap_or(ConfigAction::Get) {
        ConfigAction::Get => match shell.override_path() {
            Some(path) if !path.trim().is_empty() => println!("{}", path),
            _ => println!("{}", "No shell override is set.".dimmed()),
        },
        ConfigAction::Set { path } => {
            let path = if path.exists() {
                dunce::canonicalize(&path)
                    .with_context(|| format!("Invalid path '{}'", path.display()))?
            } else {
                eprintln!(
                    "{} '{}' does not exist; the platform search will be used until it does.",
                    "Warning:".yellow().bold(),
                    path.display()
                );
                path
            };
            shell.set_override(Some(&path));
            println!(
                "{} Shell override set to '{}'.",
                "✔".green(),
                path.display().to_string().cyan()
            );
        }
        ConfigAction::Clear => {
            shell.set_override(None);
            println!("{} Shell override cleared.", "✔".green());
        }
    }
    Ok(())
}
