// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod broadcast;  // context broadcaster (sibling facility)
pub mod config;     // chain definition files + runtime builder
pub mod dispatch;   // named-topic event bus
pub mod engine;     // chain builder, store, executor
pub mod errors;     // error handling
pub mod handlers;   // built-in handlers
pub mod model;      // steps, chains, contexts
pub mod observability;
pub mod traits;     // handler abstraction

pub use engine::{ChainEngine, ChainReport, ChainStatus};
pub use model::Context;
pub use traits::{handler_fn, EventHandler, HandlerOutput, StopSignal};
