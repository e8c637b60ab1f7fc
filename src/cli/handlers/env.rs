use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    cli::{args::EnvArgs, handlers::commons},
    constants::PATH_SEPARATOR,
    system::shell::ShellExecutable,
};

/// Prints the shell environment, sorted by name.
pub fn handle(args: Vec<String>, shell: &ShellExecutable) -> Result<()> {
    let env_args = EnvArgs::try_parse_from(&args)?;

    let dir = env_args
        .dir
        .as_deref()
        .map(|d| dunce::canonicalize(d).with_context(|| format!("Invalid directory '{}'", d.display())))
        .transpose()?;

    let env = shell.environment_for_directory(dir.as_deref());
    if env.is_empty() {
        log::warn!("The shell reported an empty environment.");
    }

    if env_args.path {
        if let Some(path) = env.get("PATH") {
            path.split(PATH_SEPARATOR)
                .filter(|entry| !entry.is_empty())
                .for_each(|entry| println!("{}", entry));
        }
        return Ok(());
    }

    let sorted = commons::sorted(&env);
    if env_args.json {
        println!("{}", serde_json::to_string_pretty(&sorted)?);
    } else {
        for (key, value) in sorted {
            println!("{}={}", key, value);
        }
    }
    Ok(())
}
