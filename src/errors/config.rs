// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use thiserror::Error;

use crate::errors::ChainError;

/// Errors that can occur while checking a chain definition file
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Two chains in the same file share an id; the later one would overwrite the earlier
    DuplicateChainId {
        chain_id: String,
    },
    /// A step has an empty event name
    EmptyEventName {
        chain_id: String,
        step_index: usize,
    },
    /// A delay step has a missing, negative or non-numeric duration
    InvalidDelay {
        chain_id: String,
        step_index: usize,
        reason: String,
    },
    /// A step's props are not a mapping
    MalformedProps {
        chain_id: String,
        step_index: usize,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::DuplicateChainId { chain_id } => {
                write!(f, "Duplicate chain ID: '{}'", chain_id)
            }
            ValidationError::EmptyEventName {
                chain_id,
                step_index,
            } => {
                write!(
                    f,
                    "Chain '{}' step {} has an empty event name",
                    chain_id, step_index
                )
            }
            ValidationError::InvalidDelay {
                chain_id,
                step_index,
                reason,
            } => {
                write!(
                    f,
                    "Chain '{}' step {} has an invalid delay: {}",
                    chain_id, step_index, reason
                )
            }
            ValidationError::MalformedProps {
                chain_id,
                step_index,
            } => {
                write!(
                    f,
                    "Chain '{}' step {} props must be a mapping",
                    chain_id, step_index
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors from loading a chain definition file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Configuration validation failed:\n{}", join_errors(.0))]
    Invalid(Vec<ValidationError>),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error("Failed to register handlers: {0}")]
    Handler(String),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
