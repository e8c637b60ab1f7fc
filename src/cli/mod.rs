// src/cli/mod.rs

use clap::Parser;
use std::path::PathBuf;

/// Argument structs shared between handlers.
pub mod args;
/// Routes a command name to its handler.
pub mod dispatcher;
/// One module per command.
pub mod handlers;

/// shellenv: find your login shell, inspect its environment and run commands through it.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
    after_help = "Commands:\n  which    Print the resolved shell executable\n  env      Print the shell's environment\n  run      Run a command through the login shell\n  wrap     Print the argument vector a command would be launched with\n  config   Show, set or clear the shell override"
)]
/// Top-level arguments: global flags plus the command and its arguments.
#[command(disable_help_subcommand = true)]
#[command(trailing_var_arg = true)]
pub struct Cli {
    /// Directory holding `preferences.toml`. Defaults to the user config directory.
    #[arg(long, global = true, value_name = "DIR")]
    pub config: Option<PathBuf>,

    /// The command to run followed by its arguments.
    #[arg(allow_hyphen_values = true, trailing_var_arg = true)]
    pub args: Vec<String>,
}
