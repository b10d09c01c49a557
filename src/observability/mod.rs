// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Every diagnostic the engine emits is a small struct in [`messages`] that
//! implements `Display` for the human-readable line and [`messages::StructuredLog`]
//! for the structured `tracing` event and span. This keeps message text out of
//! the engine code and gives every log line the same field names.
//!
//! # Usage
//!
//! ```rust
//! use the_chainwood::observability::messages::{chain::UnknownChain, StructuredLog};
//!
//! UnknownChain { chain_id: "checkout" }.log();
//! ```

pub mod messages;
