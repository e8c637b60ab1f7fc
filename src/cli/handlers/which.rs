use anyhow::Result;
use clap::Parser;
use colored::*;
use serde::Serialize;
use std::path::PathBuf;

use crate::system::shell::ShellExecutable;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Prints the path of the shell executable that commands are launched with."
)]
struct WhichArgs {
    /// Also report the stored override and the platform.
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Serialize, Debug)]
struct WhichReport {
    shell: PathBuf,
    preferred: Option<String>,
    platform: String,
}

/// Prints the resolved shell, optionally with its origin.
pub fn handle(args: Vec<String>, shell: &ShellExecutable) -> Result<()> {
    let which_args = WhichArgs::try_parse_from(&args)?;

    let report = WhichReport {
        shell: shell.resolve()?,
        preferred: shell.override_path().filter(|p| !p.trim().is_empty()),
        platform: format!("{:?}", shell.policy()).to_lowercase(),
    };

    if which_args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", report.shell.display());
    if which_args.verbose {
        match &report.preferred {
            Some(preferred) => eprintln!("{} {}", "Override:".bold(), preferred.cyan()),
            None => eprintln!("{} {}", "Override:".bold(), "(none)".dimmed()),
        }
        eprintln!("{} {}", "Platform:".bold(), report.platform);
    }
    Ok(())
}
