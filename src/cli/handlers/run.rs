use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Read, Write};
use std::process::Child;
use std::thread;
use thiserror::Error;

use crate::{
    cli::{args::RunArgs, handlers::commons},
    models::EnvSource,
    system::shell::ShellExecutable,
};

/// The launched command finished with a non-zero status.
///
/// The binary maps this to its own exit code instead of printing an error.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Command exited with status {0}")]
pub struct CommandExit(pub i32);

///
/// Main entry point for the 'run' command.
/// The command is wrapped in the login shell and its output is streamed.
///
pub fn handle(args: Vec<String>, shell: &ShellExecutable) -> Result<()> {
    let run_args = RunArgs::try_parse_from(&args)?;

    let working_dir = match &run_args.cwd {
        Some(dir) => Some(
            dunce::canonicalize(dir)
                .with_context(|| format!("Invalid working directory '{}'", dir.display()))?,
        ),
        None => None,
    };
    let overrides = commons::parse_key_value_pairs(&run_args.env)?;

    let env = if run_args.clear_env {
        EnvSource::Replace(commons::to_envp(&overrides))
    } else if run_args.shell_env {
        let mut vars = shell.environment_for_directory(working_dir.as_deref());
        vars.extend(overrides);
        EnvSource::merge(Some(&vars))
    } else {
        EnvSource::merge(Some(&overrides))
    };
    let child = shell.run_attached(&run_args.command, working_dir.as_deref(), &env)?;

    let code = stream_to_completion(child)?;
    if code != 0 {
        return Err(CommandExit(code).into());
    }
    Ok(())
}

/// Forwards the child's stdout and stderr to ours until it exits.
/// A child killed by a signal reports `1`.
fn stream_to_completion(mut child: Child) -> Result<i32> {
    let stdout = child.stdout.take().map(|out| forward(out, io::stdout));
    let stderr = child.stderr.take().map(|err| forward(err, io::stderr));

    let status = child.wait().context("Failed to wait for the command")?;

    for pump in [stdout, stderr].into_iter().flatten() {
        if pump.join().is_err() {
            log::warn!("Output forwarding thread panicked.");
        }
    }

    log::debug!("Command finished with {}", status);
    Ok(status.code().unwrap_or(1))
}

fn forward<R, W, F>(mut source: R, sink: F) -> thread::JoinHandle<()>
where
    R: Read + Send + 'static,
    W: Write,
    F: FnOnce() -> W + Send + 'static,
{
    thread::spawn(move || {
        let mut sink = sink();
        let mut buffer = [0u8; 8192];
        loop {
            match source.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => {
                    let chunk = buffer.get(..n).unwrap_or_default();
                    if sink.write_all(chunk).and_then(|()| sink.flush()).is_err() {
                        break;
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    log::debug!("Stopped forwarding command output: {}", e);
                    break;
                }
            }
        }
    })
}
