// src/core/env_parser.rs

use crate::{constants::ENV_FILTER, models::ShellEnvironment};

/// Parses the output of `env` into a [`ShellEnvironment`].
///
/// Lines are split on `\r` and `\n`; each line is split on its first `=`.
/// Lines without `=` are skipped and a repeated name keeps its last value.
/// The fixed [`ENV_FILTER`] rules are applied to the result, so this never
/// fails: malformed input simply yields fewer entries.
pub fn parse(text: &str) -> ShellEnvironment {
    let mut env: ShellEnvironment = text
        .split(['\r', '\n'])
        .filter(|line| !line.is_empty())
        .filter_map(|line| line.split_once('='))
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();

    apply_filter(&mut env, ENV_FILTER);
    env
}

/// Removes every entry matched by `rules` from `env`.
///
/// A rule ending in `*` removes all names starting with the text before it;
/// any other rule removes the exact name.
pub fn apply_filter(env: &mut ShellEnvironment, rules: &[&str]) {
    for rule in rules {
        match rule.strip_suffix('*') {
            Some(prefix) => env.retain(|name, _| !name.starts_with(prefix)),
            None => {
                env.remove(*rule);
            }
        }
    }
}
