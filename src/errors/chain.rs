// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors raised while declaring a chain.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChainError {
    /// Input that cannot form a valid step (empty event name, bad delay, malformed batch item).
    #[error("Invalid argument for chain '{chain_id}': {reason}")]
    InvalidArgument { chain_id: String, reason: String },
}

impl ChainError {
    pub fn invalid(chain_id: &str, reason: impl Into<String>) -> Self {
        ChainError::InvalidArgument {
            chain_id: chain_id.to_string(),
            reason: reason.into(),
        }
    }
}
