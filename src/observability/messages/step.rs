// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for individual chain steps.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A step was handed to its registered handlers.
///
/// # Log Level
/// `debug!`
pub struct StepDispatched<'a> {
    pub chain_id: &'a str,
    pub event_name: &'a str,
    pub step_index: usize,
    pub listener_count: usize,
}

impl Display for StepDispatched<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Chain '{}' step {}: dispatching '{}' to {} handler(s)",
            self.chain_id, self.step_index, self.event_name, self.listener_count
        )
    }
}

impl StructuredLog for StepDispatched<'_> {
    fn log(&self) {
        tracing::debug!(
            chain_id = self.chain_id,
            event_name = self.event_name,
            step_index = self.step_index,
            listener_count = self.listener_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "step",
            span_name = name,
            chain_id = self.chain_id,
            event_name = self.event_name,
            step_index = self.step_index,
        )
    }
}

/// A step had no handler and its context was passed straight through.
///
/// # Log Level
/// `debug!`
pub struct StepPassthrough<'a> {
    pub chain_id: &'a str,
    pub event_name: &'a str,
    pub step_index: usize,
}

impl Display for StepPassthrough<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Chain '{}' step {}: no handler for '{}', passing context through",
            self.chain_id, self.step_index, self.event_name
        )
    }
}

impl StructuredLog for StepPassthrough<'_> {
    fn log(&self) {
        tracing::debug!(
            chain_id = self.chain_id,
            event_name = self.event_name,
            step_index = self.step_index,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "step_passthrough",
            span_name = name,
            chain_id = self.chain_id,
            event_name = self.event_name,
        )
    }
}

/// A handler returned an error or panicked. The chain continues.
///
/// # Log Level
/// `warn!`
///
/// # Example
/// ```
/// use the_chainwood::observability::messages::step::HandlerFailed;
///
/// let error = std::io::Error::new(std::io::ErrorKind::Other, "upstream timed out");
/// let msg = HandlerFailed {
///     event_name: "data.fetch",
///     error: &error,
/// };
///
/// tracing::warn!("{}", msg);
/// ```
pub struct HandlerFailed<'a> {
    pub event_name: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for HandlerFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Handler for '{}' failed, continuing with unchanged context: {}",
            self.event_name, self.error
        )
    }
}

impl StructuredLog for HandlerFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            event_name = self.event_name,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "handler_failed",
            span_name = name,
            event_name = self.event_name,
            error = %self.error,
        )
    }
}

/// Every listener for a step finished without replying. The context passes through.
///
/// # Log Level
/// `warn!`
pub struct ContinuationDropped<'a> {
    pub chain_id: &'a str,
    pub event_name: &'a str,
    pub step_index: usize,
}

impl Display for ContinuationDropped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Chain '{}' step {}: listeners for '{}' dropped the continuation without replying",
            self.chain_id, self.step_index, self.event_name
        )
    }
}

impl StructuredLog for ContinuationDropped<'_> {
    fn log(&self) {
        tracing::warn!(
            chain_id = self.chain_id,
            event_name = self.event_name,
            step_index = self.step_index,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "continuation_dropped",
            span_name = name,
            chain_id = self.chain_id,
            event_name = self.event_name,
        )
    }
}

/// A delay step carried a duration that could not be used; it was treated as zero.
///
/// # Log Level
/// `warn!`
pub struct InvalidDelayDuration<'a> {
    pub raw: &'a str,
}

impl Display for InvalidDelayDuration<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Ignoring invalid delay duration {}, using 0ms", self.raw)
    }
}

impl StructuredLog for InvalidDelayDuration<'_> {
    fn log(&self) {
        tracing::warn!(raw = self.raw, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("invalid_delay", span_name = name, raw = self.raw)
    }
}
