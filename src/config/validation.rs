// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashSet;

use crate::config::Config;
use crate::engine::delay::parse_duration;
use crate::errors::ValidationError;
use crate::model::context_from_value;

/// Check every chain definition in a config, collecting all problems rather than stopping at the first.
pub fn validate_config(cfg: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for chain in &cfg.chains {
        if !seen.insert(chain.id.as_str()) {
            errors.push(ValidationError::DuplicateChainId {
                chain_id: chain.id.clone(),
            });
        }

        for (step_index, step) in chain.steps.iter().enumerate() {
            if step.event.trim().is_empty() {
                errors.push(ValidationError::EmptyEventName {
                    chain_id: chain.id.clone(),
                    step_index,
                });
                continue;
            }

            let Ok(props) = context_from_value(step.props.clone()) else {
                errors.push(ValidationError::MalformedProps {
                    chain_id: chain.id.clone(),
                    step_index,
                });
                continue;
            };

            if cfg.engine.is_delay_event(&step.event) {
                if let Err(reason) = parse_duration(&props) {
                    errors.push(ValidationError::InvalidDelay {
                        chain_id: chain.id.clone(),
                        step_index,
                        reason,
                    });
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
