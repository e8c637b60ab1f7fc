// src/core/composer.rs

use crate::constants::{COMMAND_FLAG, LOGIN_FLAG};
use std::path::Path;

/// Escapes every `"` and `'` in `arg` by prefixing it with a backslash.
///
/// Single pass, left to right. Existing backslashes are left alone, so an
/// already escaped quote (`\"`) becomes `\\"`.
pub fn escape_quotes(arg: &str) -> String {
    let mut escaped = String::with_capacity(arg.len());
    for c in arg.chars() {
        if c == '"' || c == '\'' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Joins a command and its arguments into the single string handed to `-c`.
pub fn join_command<S: AsRef<str>>(command: &[S]) -> String {
    let mut line = String::new();
    for arg in command {
        line.push_str(&escape_quotes(arg.as_ref()));
        line.push(' ');
    }
    line.trim_end().to_string()
}

/// Wraps `command` in a login-shell invocation of `shell`.
///
/// The result always has four elements: `[shell, "--login", "-c", joined]`.
pub fn wrap_in_login_shell<S: AsRef<str>>(shell: &Path, command: &[S]) -> Vec<String> {
    vec![
        shell.to_string_lossy().into_owned(),
        LOGIN_FLAG.to_string(),
        COMMAND_FLAG.to_string(),
        join_command(command),
    ]
}
