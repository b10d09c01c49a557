// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Core data types shared by the builder, the store and the executor.

mod chain;
mod context;

pub use chain::{ChainStep, DeclaredChain};
pub use context::{context_from_value, Context};
