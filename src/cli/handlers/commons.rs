// src/cli/handlers/commons.rs

// Helpers shared by several handlers.

use anyhow::{Result, anyhow};
use std::collections::{BTreeMap, HashMap};

use crate::models::ShellEnvironment;

/// Parses a vector of "KEY=VALUE" strings into a HashMap.
/// Later entries win; the value may itself contain `=`.
pub fn parse_key_value_pairs(pairs: &[String]) -> Result<HashMap<String, String>> {
    let mut map = HashMap::new();
    for pair in pairs {
        match pair.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                map.insert(key.trim().to_string(), value.to_string());
            }
            _ => {
                return Err(anyhow!(
                    "Invalid format for key-value pair: '{}'. Expected 'KEY=VALUE'.",
                    pair
                ));
            }
        }
    }
    Ok(map)
}

/// Renders a map as `KEY=VALUE` entries, sorted by key.
pub fn to_envp(vars: &HashMap<String, String>) -> Vec<String> {
    sorted(vars)
        .into_iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect()
}

/// Orders an environment by variable name for stable output.
pub fn sorted(env: &ShellEnvironment) -> BTreeMap<&str, &str> {
    env.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
}
