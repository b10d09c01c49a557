// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the context broadcaster.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// The broadcaster's entries changed and subscribers were notified.
///
/// # Log Level
/// `debug!`
pub struct ContextChanged<'a> {
    pub action: &'a str,
    pub context_id: &'a str,
    pub entry_count: usize,
    pub subscriber_count: usize,
}

impl Display for ContextChanged<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Context '{}' {}: {} entries sent to {} subscriber(s)",
            self.context_id, self.action, self.entry_count, self.subscriber_count
        )
    }
}

impl StructuredLog for ContextChanged<'_> {
    fn log(&self) {
        tracing::debug!(
            action = self.action,
            context_id = self.context_id,
            entry_count = self.entry_count,
            subscriber_count = self.subscriber_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "context_changed",
            span_name = name,
            action = self.action,
            context_id = self.context_id,
        )
    }
}
