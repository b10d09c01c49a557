// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::Config;
use crate::engine::ChainEngine;
use crate::errors::ConfigError;
use crate::handlers::local::LocalHandlerFactory;

/// Chain runtime builder - turns a chain definition file into a ready engine.
///
/// The engine gets the configured options, every built-in local handler, and
/// one declared chain per entry in `chains`, ready to be consumed by id.
///
/// # Examples
///
/// ```
/// use the_chainwood::config::{Config, RuntimeBuilder};
///
/// let config: Config = serde_yaml::from_str(r#"
/// chains:
///   - id: shout
///     steps:
///       - event: text.change_case
///         props: { text: "hi", case: upper }
/// "#).unwrap();
///
/// let engine = RuntimeBuilder::from_config(&config).unwrap();
/// assert!(engine.has_chain("shout"));
/// ```
pub struct RuntimeBuilder;

impl RuntimeBuilder {
    pub fn from_config(cfg: &Config) -> Result<ChainEngine, ConfigError> {
        let engine = ChainEngine::with_options(cfg.engine.clone());
        LocalHandlerFactory::register_all(&engine).map_err(ConfigError::Handler)?;

        for chain in &cfg.chains {
            engine
                .chain(chain.id.as_str())
                .meta(chain.metadata.clone())
                .batch(chain.steps.iter().cloned())
                .build()?;
        }

        Ok(engine)
    }
}
