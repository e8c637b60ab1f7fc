// src/system/executor.rs

use crate::models::EnvSource;
use std::io::Read;
use std::path::Path;
use std::process::{Child, Command as StdCommand, ExitStatus, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use wait_timeout::ChildExt;

/// Failures while starting or waiting on a child process.
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// The argument vector was empty.
    #[error("No command specified to run.")]
    EmptyCommand,
    /// Spawning or waiting on the program failed.
    #[error("Command '{0}' could not be executed: {1}")]
    CommandFailed(String, #[source] std::io::Error),
    /// The process or its output outlived the deadline.
    #[error("Command '{command}' did not finish within {timeout:?}")]
    TimedOut {
        /// The command line as displayed in logs.
        command: String,
        /// The deadline that was exceeded.
        timeout: Duration,
    },
    /// The process ran but reported failure.
    #[error("Command '{command}' exited with {status}")]
    NonZeroExit {
        /// The command line as displayed in logs.
        command: String,
        /// The failing status.
        status: ExitStatus,
    },
}

/// What a finished probe process left behind.
#[derive(Debug)]
pub struct CapturedOutput {
    /// Exit status of the direct child.
    pub status: ExitStatus,
    /// Everything written to stdout, decoded lossily.
    pub stdout: String,
}

impl CapturedOutput {
    /// Returns the captured stdout, or [`ExecutionError::NonZeroExit`] if the
    /// process did not succeed.
    pub fn into_success(self, command: &[String]) -> Result<String, ExecutionError> {
        if self.status.success() {
            Ok(self.stdout)
        } else {
            Err(ExecutionError::NonZeroExit {
                command: display_command(command),
                status: self.status,
            })
        }
    }
}

/// Builds a `Command` for a literal argument vector.
///
/// `cwd` is simplified with `dunce` so Windows verbatim paths reach the child
/// in their plain form. With [`EnvSource::Replace`], entries lacking `=` are
/// dropped.
pub fn build_command(
    argv: &[String],
    cwd: Option<&Path>,
    env: &EnvSource,
) -> Result<StdCommand, ExecutionError> {
    let (program, args) = argv.split_first().ok_or(ExecutionError::EmptyCommand)?;

    let mut command = StdCommand::new(program);
    command.args(args);

    if let Some(dir) = cwd {
        command.current_dir(dunce::simplified(dir));
    }

    match env {
        EnvSource::Inherit => {}
        EnvSource::Merge(vars) => {
            command.envs(vars);
        }
        EnvSource::Replace(entries) => {
            command.env_clear();
            for entry in entries {
                match entry.split_once('=') {
                    Some((name, value)) if !name.is_empty() => {
                        command.env(name, value);
                    }
                    _ => log::debug!("Ignoring malformed environment entry '{}'", entry),
                }
            }
        }
    }

    Ok(command)
}

/// Starts `argv` and returns the running child. Stdout and stderr are piped;
/// stdin is whatever the caller passes.
pub fn spawn_process(
    argv: &[String],
    cwd: Option<&Path>,
    env: &EnvSource,
    stdin: Stdio,
) -> Result<Child, ExecutionError> {
    let mut command = build_command(argv, cwd, env)?;
    command
        .stdin(stdin)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    log::debug!("Spawning {:?}", argv);
    command
        .spawn()
        .map_err(|e| ExecutionError::CommandFailed(display_command(argv), e))
}

/// Runs `argv` to completion and captures its standard output.
///
/// Stdin is closed and stderr discarded. `timeout` bounds both the child and
/// the collection of its output, so a background process that inherited the
/// stdout pipe can't hold the caller past the deadline.
pub fn capture_output(
    argv: &[String],
    cwd: Option<&Path>,
    timeout: Duration,
) -> Result<CapturedOutput, ExecutionError> {
    let command_line = display_command(argv);
    let mut command = build_command(argv, cwd, &EnvSource::Inherit)?;
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null());

    let deadline = Instant::now() + timeout;
    let mut child = command
        .spawn()
        .map_err(|e| ExecutionError::CommandFailed(command_line.clone(), e))?;

    // Drain stdout on its own thread so a chatty child can't fill the pipe
    // and stall while we wait for it.
    let (sender, receiver) = mpsc::channel();
    if let Some(mut stdout) = child.stdout.take() {
        thread::spawn(move || {
            let mut buf = Vec::new();
            if let Err(e) = stdout.read_to_end(&mut buf) {
                log::debug!("Failed reading probe output: {}", e);
            }
            sender.send(buf).ok();
        });
    }

    let status = match child.wait_timeout(timeout) {
        Ok(Some(status)) => status,
        Ok(None) => {
            log::debug!(
                "Probe '{}' exceeded {:?}, killing child process (PID: {})...",
                command_line,
                timeout,
                child.id()
            );
            if let Err(e) = child.kill() {
                log::warn!("Failed to kill child process {}: {}", child.id(), e);
            }
            if let Err(e) = child.wait() {
                log::warn!("Failed to reap timed-out probe: {}", e);
            }
            return Err(ExecutionError::TimedOut {
                command: command_line,
                timeout,
            });
        }
        Err(e) => return Err(ExecutionError::CommandFailed(command_line, e)),
    };

    let remaining = deadline.saturating_duration_since(Instant::now());
    let bytes = match receiver.recv_timeout(remaining) {
        Ok(bytes) => bytes,
        Err(RecvTimeoutError::Disconnected) => Vec::new(),
        Err(RecvTimeoutError::Timeout) => {
            log::debug!(
                "Output of '{}' still open after {:?}; a background process holds it.",
                command_line,
                timeout
            );
            return Err(ExecutionError::TimedOut {
                command: command_line,
                timeout,
            });
        }
    };

    Ok(CapturedOutput {
        status,
        stdout: String::from_utf8_lossy(&bytes).into_owned(),
    })
}

fn display_command(argv: &[String]) -> String {
    argv.join(" ")
}
