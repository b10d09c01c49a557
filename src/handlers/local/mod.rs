// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! In-process text handlers used by the CLI and by config-driven runtimes.

pub mod factory;
pub mod handlers;
mod text;

pub use factory::LocalHandlerFactory;
pub use text::resolve_text;
