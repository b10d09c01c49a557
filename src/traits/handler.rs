// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_json::Value;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::errors::HandlerError;
use crate::model::Context;

pub type HandlerResult = Result<HandlerOutput, HandlerError>;

/// What a handler hands back to the chain.
///
/// * `None` forwards the execution context the handler received.
/// * `Scalar` is wrapped as `{ value, prev: <execution context> }`.
/// * `Structured` becomes the next carry-forward context verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum HandlerOutput {
    None,
    Scalar(Value),
    Structured(Context),
}

impl From<Value> for HandlerOutput {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => HandlerOutput::None,
            Value::Object(map) => HandlerOutput::Structured(map),
            other => HandlerOutput::Scalar(other),
        }
    }
}

impl From<Context> for HandlerOutput {
    fn from(ctx: Context) -> Self {
        HandlerOutput::Structured(ctx)
    }
}

impl From<()> for HandlerOutput {
    fn from(_: ()) -> Self {
        HandlerOutput::None
    }
}

/// Lets a handler halt the chain it is running in.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    stopped: Arc<AtomicBool>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Halt the chain at the current step. Later steps never run.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// A callback registered against an event name.
///
/// Returning from `handle` is what lets the chain continue; a handler that
/// never returns stalls the chain that dispatched it.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, ctx: Context, stop: StopSignal) -> HandlerResult;
}

/// Adapter turning an async closure into an [`EventHandler`].
pub struct FnHandler<F> {
    f: F,
}

/// Wrap a closure `|ctx, stop| async move { ... }` as a handler.
pub fn handler_fn<F, Fut>(f: F) -> Arc<dyn EventHandler>
where
    F: Fn(Context, StopSignal) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    Arc::new(FnHandler { f })
}

#[async_trait]
impl<F, Fut> EventHandler for FnHandler<F>
where
    F: Fn(Context, StopSignal) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    async fn handle(&self, ctx: Context, stop: StopSignal) -> HandlerResult {
        (self.f)(ctx, stop).await
    }
}
