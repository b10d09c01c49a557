// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Serialize;

use crate::model::Context;

/// What a handler wrapper sends back through the step's continuation.
#[derive(Debug, Clone, PartialEq)]
pub enum StepSignal {
    /// Move on with `context` as the new carry-forward context.
    /// `failure` is set when the handler failed and `context` is the unchanged input.
    Continue {
        context: Context,
        failure: Option<String>,
    },
    /// The handler called `stop`.
    Stop { context: Context },
}

/// How a `consume` call ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ChainStatus {
    Completed,
    Stopped { index: usize, event_name: String },
    NotFound,
}

/// A handler failure that was swallowed so the chain could continue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepFailure {
    pub index: usize,
    pub event_name: String,
    pub message: String,
}

/// Result of consuming a chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainReport {
    pub chain_id: String,
    pub status: ChainStatus,
    /// Final carry-forward context. Empty when the chain was not found.
    pub context: Context,
    pub failures: Vec<StepFailure>,
}

impl ChainReport {
    pub fn not_found(chain_id: impl Into<String>) -> Self {
        Self {
            chain_id: chain_id.into(),
            status: ChainStatus::NotFound,
            context: Context::new(),
            failures: Vec::new(),
        }
    }

    pub fn is_found(&self) -> bool {
        self.status != ChainStatus::NotFound
    }

    pub fn is_completed(&self) -> bool {
        self.status == ChainStatus::Completed
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self.status, ChainStatus::Stopped { .. })
    }

    /// Completed with every handler succeeding.
    pub fn is_clean(&self) -> bool {
        self.is_completed() && self.failures.is_empty()
    }
}
