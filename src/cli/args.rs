// src/cli/args.rs
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Runs a command through the login shell."
)]
/// Arguments of `shellenv run`.
pub struct RunArgs {
    /// Working directory for the command. Defaults to the current directory.
    #[arg(long = "cwd", short = 'C', value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Set environment variables for the command (e.g., "KEY=VALUE").
    #[arg(long = "env", short = 'e', value_name = "KEY=VALUE")]
    pub env: Vec<String>,

    /// Start from an empty environment; only `--env` entries are passed.
    #[arg(long)]
    pub clear_env: bool,

    /// Merge the shell's (directory-scoped) environment snapshot before `--env`.
    #[arg(long, conflicts_with = "clear_env")]
    pub shell_env: bool,

    /// The command and its arguments.
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Prints the environment exported by the login shell."
)]
/// Arguments of `shellenv env`.
pub struct EnvArgs {
    /// Source this directory's `.rvmrc` before taking the snapshot.
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Print the snapshot as a JSON object.
    #[arg(long, conflicts_with = "path")]
    pub json: bool,

    /// Print only the `PATH` entries, one per line.
    #[arg(long)]
    pub path: bool,
}
