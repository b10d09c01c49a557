// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::config::consts::{DEFAULT_DELAY_ALIASES, DELAY_EVENT_NAME};
use crate::engine::BatchItem;
use crate::errors::ConfigError;

/// A chain definition file.
///
/// Declares any number of chains up front so they can be consumed later by id.
///
/// # Example
/// ```yaml
/// engine:
///   delay_aliases: [sleep, delay, wait]
/// chains:
///   - id: greet
///     metadata: { owner: demo }
///     steps:
///       - event: text.change_case
///         props: { text: "hello", case: upper }
///       - event: sleep
///         props: { duration: 10 }
///       - event: text.reverse
/// ```
#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineOptions,
    #[serde(default)]
    pub chains: Vec<ChainConfig>,
}

/// Engine-wide options.
///
/// # Fields
/// * `delay_aliases` - batch event names (case-insensitive) that become delay steps
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EngineOptions {
    #[serde(default = "default_delay_aliases")]
    pub delay_aliases: Vec<String>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            delay_aliases: default_delay_aliases(),
        }
    }
}

impl EngineOptions {
    /// True if `event` should be translated into a delay step by `batch`.
    pub fn is_delay_alias(&self, event: &str) -> bool {
        self.delay_aliases
            .iter()
            .any(|alias| alias.eq_ignore_ascii_case(event))
    }

    /// True for the reserved delay event or any of its aliases.
    pub fn is_delay_event(&self, event: &str) -> bool {
        event == DELAY_EVENT_NAME || self.is_delay_alias(event)
    }
}

fn default_delay_aliases() -> Vec<String> {
    DEFAULT_DELAY_ALIASES.iter().map(|s| s.to_string()).collect()
}

/// One declared chain in the file. Steps use the same shape as [`BatchItem`].
#[derive(Debug, Deserialize)]
pub struct ChainConfig {
    pub id: String,
    #[serde(default)]
    pub metadata: Value,
    #[serde(default)]
    pub steps: Vec<BatchItem>,
}

/// Load a config from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&content)?;
    Ok(cfg)
}

/// Load a config and reject it if any chain definition is invalid.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let cfg = load_config(path)?;
    crate::config::validate_config(&cfg).map_err(ConfigError::Invalid)?;
    Ok(cfg)
}
