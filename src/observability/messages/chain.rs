// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the chain lifecycle: declare, consume, stop, clear.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A chain was built and stored.
///
/// # Log Level
/// `info!`
///
/// # Example
/// ```
/// use the_chainwood::observability::messages::chain::ChainDeclared;
///
/// let msg = ChainDeclared {
///     chain_id: "onboarding",
///     step_count: 3,
///     replaced: false,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ChainDeclared<'a> {
    pub chain_id: &'a str,
    pub step_count: usize,
    pub replaced: bool,
}

impl Display for ChainDeclared<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.replaced {
            write!(
                f,
                "Chain '{}' re-declared with {} steps, previous declaration replaced",
                self.chain_id, self.step_count
            )
        } else {
            write!(f, "Chain '{}' declared with {} steps", self.chain_id, self.step_count)
        }
    }
}

impl StructuredLog for ChainDeclared<'_> {
    fn log(&self) {
        tracing::info!(
            chain_id = self.chain_id,
            step_count = self.step_count,
            replaced = self.replaced,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "chain_declared",
            span_name = name,
            chain_id = self.chain_id,
            step_count = self.step_count,
        )
    }
}

/// Consumption of a chain started.
///
/// # Log Level
/// `info!`
pub struct ChainConsumeStarted<'a> {
    pub chain_id: &'a str,
    pub step_count: usize,
}

impl Display for ChainConsumeStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Consuming chain '{}': {} steps",
            self.chain_id, self.step_count
        )
    }
}

impl StructuredLog for ChainConsumeStarted<'_> {
    fn log(&self) {
        tracing::info!(
            chain_id = self.chain_id,
            step_count = self.step_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "consume",
            span_name = name,
            chain_id = self.chain_id,
            step_count = self.step_count,
        )
    }
}

/// Every step of a chain resolved.
///
/// # Log Level
/// `info!`
///
/// # Example
/// ```
/// use the_chainwood::observability::messages::chain::ChainConsumeCompleted;
/// use std::time::Duration;
///
/// let msg = ChainConsumeCompleted {
///     chain_id: "onboarding",
///     step_count: 3,
///     failure_count: 0,
///     duration: Duration::from_millis(120),
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ChainConsumeCompleted<'a> {
    pub chain_id: &'a str,
    pub step_count: usize,
    pub failure_count: usize,
    pub duration: std::time::Duration,
}

impl Display for ChainConsumeCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Chain '{}' completed: {} steps, {} failed, in {:?}",
            self.chain_id, self.step_count, self.failure_count, self.duration
        )
    }
}

impl StructuredLog for ChainConsumeCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            chain_id = self.chain_id,
            step_count = self.step_count,
            failure_count = self.failure_count,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "consume_completed",
            span_name = name,
            chain_id = self.chain_id,
            failure_count = self.failure_count,
            duration = ?self.duration,
        )
    }
}

/// A handler called `stop`; the rest of the chain was abandoned.
///
/// # Log Level
/// `info!`
pub struct ChainStopped<'a> {
    pub chain_id: &'a str,
    pub event_name: &'a str,
    pub step_index: usize,
    pub skipped_steps: usize,
}

impl Display for ChainStopped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Chain '{}' stopped by '{}' at step {}, {} steps skipped",
            self.chain_id, self.event_name, self.step_index, self.skipped_steps
        )
    }
}

impl StructuredLog for ChainStopped<'_> {
    fn log(&self) {
        tracing::info!(
            chain_id = self.chain_id,
            event_name = self.event_name,
            step_index = self.step_index,
            skipped_steps = self.skipped_steps,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "chain_stopped",
            span_name = name,
            chain_id = self.chain_id,
            event_name = self.event_name,
        )
    }
}

/// `consume` was called for an id that is not declared (never built, or already consumed).
///
/// # Log Level
/// `warn!`
///
/// # Example
/// ```
/// use the_chainwood::observability::messages::chain::UnknownChain;
///
/// tracing::warn!("{}", UnknownChain { chain_id: "missing" });
/// ```
pub struct UnknownChain<'a> {
    pub chain_id: &'a str,
}

impl Display for UnknownChain<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "No declared chain '{}' to consume; it was never built or has already been consumed",
            self.chain_id
        )
    }
}

impl StructuredLog for UnknownChain<'_> {
    fn log(&self) {
        tracing::warn!(chain_id = self.chain_id, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("unknown_chain", span_name = name, chain_id = self.chain_id)
    }
}

/// Declared chains were removed without being consumed.
///
/// # Log Level
/// `debug!`
pub struct ChainsCleared<'a> {
    /// `None` when every chain was cleared.
    pub chain_id: Option<&'a str>,
    pub removed: usize,
}

impl Display for ChainsCleared<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.chain_id {
            Some(id) => write!(f, "Cleared chain '{}' ({} removed)", id, self.removed),
            None => write!(f, "Cleared all chains ({} removed)", self.removed),
        }
    }
}

impl StructuredLog for ChainsCleared<'_> {
    fn log(&self) {
        tracing::debug!(
            chain_id = self.chain_id,
            removed = self.removed,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "chains_cleared",
            span_name = name,
            chain_id = self.chain_id,
            removed = self.removed,
        )
    }
}
