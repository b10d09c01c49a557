// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! * `chain` - declaration, consumption and clearing of chains
//! * `step` - per-step dispatch, passthrough, delay and handler failures
//! * `broadcast` - context broadcaster changes

use tracing::Span;

pub mod broadcast;
pub mod chain;
pub mod step;

/// A message that knows its own log level and structured fields.
pub trait StructuredLog: std::fmt::Display {
    /// Emit the message as a `tracing` event at its level.
    fn log(&self);

    /// Open a span carrying the same fields.
    fn span(&self, name: &str) -> Span;
}
