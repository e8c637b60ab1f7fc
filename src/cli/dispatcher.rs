use anyhow::{Result, anyhow};

use crate::{cli::handlers, system::shell::ShellExecutable};

/// Defines a system command, its aliases, and its handler.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(Vec<String>, &ShellExecutable) -> Result<()>,
}

/// The single source of truth for all system commands.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "which",
        aliases: &["path"],
        handler: handlers::which::handle,
    },
    CommandDefinition {
        name: "env",
        aliases: &[],
        handler: handlers::env::handle,
    },
    CommandDefinition {
        name: "run",
        aliases: &["exec"],
        handler: handlers::run::handle,
    },
    CommandDefinition {
        name: "wrap",
        aliases: &[],
        handler: handlers::wrap::handle,
    },
    CommandDefinition {
        name: "config",
        aliases: &["cfg"],
        handler: handlers::config::handle,
    },
];

/// Finds a command definition in the registry by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// Routes `all_args` to a handler. With no arguments the resolved shell is
/// printed, like `which`.
pub fn dispatch(all_args: Vec<String>, shell: &ShellExecutable) -> Result<()> {
    log::debug!("Dispatching args: {:?}", all_args);

    let mut args = all_args.into_iter();
    let Some(action) = args.next() else {
        return handlers::which::handle(Vec::new(), shell);
    };

    let command = find_command(&action).ok_or_else(|| {
        let known: Vec<&str> = COMMAND_REGISTRY.iter().map(|c| c.name).collect();
        anyhow!(
            "Unknown command '{}'. Available commands: {}",
            action,
            known.join(", ")
        )
    })?;

    (command.handler)(args.collect(), shell)
}
