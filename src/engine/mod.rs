// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The chain engine: declare chains with a [`ChainBuilder`], keep them in a
//! [`ChainStore`], and run them step by step through the event bus with
//! [`ChainEngine::consume`].

pub mod builder;
pub mod delay;
pub mod executor;
pub mod report;
pub mod store;
mod wrapper;


pub use builder::{BatchItem, ChainBuilder};
pub use delay::DelayHandler;
pub use executor::{ChainBus, ChainEngine};
pub use report::{ChainReport, ChainStatus, StepFailure, StepSignal};
pub use store::ChainStore;
