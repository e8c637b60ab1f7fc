use anyhow::{Result, anyhow};
use clap::Parser;

use crate::system::shell::ShellExecutable;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Prints the argument vector a command would be launched with, without running it."
)]
struct WrapArgs {
    /// Print the arguments as a JSON array instead of a quoted shell line.
    #[arg(long)]
    json: bool,

    /// The command and its arguments.
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

/// Prints the login-shell argument vector for a command.
pub fn handle(args: Vec<String>, shell: &ShellExecutable) -> Result<()> {
    let wrap_args = WrapArgs::try_parse_from(&args)?;

    let argv = shell.to_shell_command(&wrap_args.command)?;
    if wrap_args.json {
        println!("{}", serde_json::to_string_pretty(&argv)?);
    } else {
        let line = shlex::try_join(argv.iter().map(String::as_str))
            .map_err(|e| anyhow!("Could not quote the command line: {}", e))?;
        println!("{}", line);
    }
    Ok(())
}
