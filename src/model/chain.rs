// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::config::consts::{DELAY_EVENT_NAME, PREV_KEY};
use crate::model::Context;

/// One unit of work in a chain: an event name plus the parameters declared for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainStep {
    pub event_name: String,
    pub parameters: Context,
}

impl ChainStep {
    pub fn new(event_name: impl Into<String>, parameters: Context) -> Self {
        Self {
            event_name: event_name.into(),
            parameters,
        }
    }

    /// True for the reserved pure-delay step.
    pub fn is_delay(&self) -> bool {
        self.event_name == DELAY_EVENT_NAME
    }

    /// Build the context a handler for this step receives.
    ///
    /// The step's own parameters are copied and `prev` is set to the
    /// carry-forward context of the previous step, replacing any declared `prev`.
    pub fn execution_context(&self, carry: &Context) -> Context {
        let mut ctx = self.parameters.clone();
        ctx.insert(PREV_KEY.to_string(), Value::Object(carry.clone()));
        ctx
    }
}

/// An immutable, declared-but-not-yet-consumed chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeclaredChain {
    pub id: String,
    pub steps: Vec<ChainStep>,
    pub created_at: DateTime<Utc>,
    /// Descriptive only; never read during execution.
    pub metadata: Context,
}

impl DeclaredChain {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
