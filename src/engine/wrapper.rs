// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use futures::FutureExt;
use serde_json::Value;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use crate::config::consts::{PREV_KEY, VALUE_KEY};
use crate::dispatch::{Continuation, Listener};
use crate::engine::report::StepSignal;
use crate::errors::HandlerError;
use crate::model::Context;
use crate::observability::messages::{step::HandlerFailed, StructuredLog};
use crate::traits::{EventHandler, HandlerOutput, HandlerResult, StopSignal};

/// Adapts an [`EventHandler`] to the bus.
///
/// Always resumes the continuation exactly once. Errors and panics become a
/// `Continue` with the unchanged input context; a `stop()` call becomes `Stop`
/// carrying the input context, whatever the handler returned.
pub(crate) struct HandlerListener {
    event_name: String,
    handler: Arc<dyn EventHandler>,
}

impl HandlerListener {
    pub(crate) fn new(event_name: &str, handler: Arc<dyn EventHandler>) -> Self {
        Self {
            event_name: event_name.to_string(),
            handler,
        }
    }
}

#[async_trait]
impl Listener<Context, StepSignal> for HandlerListener {
    async fn on_event(&self, ctx: Context, continuation: Continuation<StepSignal>) {
        let stop = StopSignal::new();

        // A panic must not unwind into the dispatch task shared with the other listeners.
        let caught = AssertUnwindSafe(self.handler.handle(ctx.clone(), stop.clone()))
            .catch_unwind()
            .await;

        let signal = settle(&self.event_name, ctx, flatten(caught), &stop);
        continuation.resume(signal);
    }
}

fn flatten(caught: Result<HandlerResult, Box<dyn Any + Send>>) -> HandlerResult {
    caught.unwrap_or_else(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Err(HandlerError::Panicked(message))
    })
}

fn settle(event_name: &str, ctx: Context, result: HandlerResult, stop: &StopSignal) -> StepSignal {
    let outcome = result.map_err(|error| {
        HandlerFailed {
            event_name,
            error: &error,
        }
        .log();
        error.to_string()
    });

    if stop.is_stopped() {
        return StepSignal::Stop { context: ctx };
    }

    match outcome {
        Ok(output) => StepSignal::Continue {
            context: forward(output, ctx),
            failure: None,
        },
        Err(message) => StepSignal::Continue {
            context: ctx,
            failure: Some(message),
        },
    }
}

/// Turn a handler's output into the next carry-forward context.
pub(crate) fn forward(output: HandlerOutput, ctx: Context) -> Context {
    match output {
        HandlerOutput::None => ctx,
        HandlerOutput::Structured(next) => next,
        HandlerOutput::Scalar(value) => {
            let mut wrapped = Context::new();
            wrapped.insert(VALUE_KEY.to_string(), value);
            wrapped.insert(PREV_KEY.to_string(), Value::Object(ctx));
            wrapped
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::handler_fn;
    use serde_json::json;

    fn ctx(value: Value) -> Context {
        value.as_object().cloned().unwrap()
    }

    async fn run(handler: Arc<dyn EventHandler>, input: Context) -> StepSignal {
        let listener = HandlerListener::new("test.event", handler);
        let (continuation, rx) = Continuation::channel();
        listener.on_event(input, continuation).await;
        rx.await.unwrap()
    }

    #[test]
    fn forwarding_rules() {
        let input = ctx(json!({"a": 1}));
        assert_eq!(forward(HandlerOutput::None, input.clone()), input);
        assert_eq!(
            forward(HandlerOutput::Structured(ctx(json!({"b": 2}))), input.clone()),
            ctx(json!({"b": 2}))
        );
        assert_eq!(
            forward(HandlerOutput::Scalar(json!("hi")), input),
            ctx(json!({"value": "hi", "prev": {"a": 1}}))
        );
    }

    #[tokio::test]
    async fn error_keeps_input_context() {
        let handler = handler_fn(|_ctx, _stop| async { Err(HandlerError::msg("nope")) });
        let signal = run(handler, ctx(json!({"a": 1}))).await;
        assert_eq!(
            signal,
            StepSignal::Continue {
                context: ctx(json!({"a": 1})),
                failure: Some("nope".into())
            }
        );
    }

    #[tokio::test]
    async fn panic_is_caught() {
        let handler = handler_fn(|_ctx, _stop| async {
            if true {
                panic!("handler exploded");
            }
            Ok(HandlerOutput::None)
        });
        match run(handler, Context::new()).await {
            StepSignal::Continue { failure: Some(message), .. } => {
                assert!(message.contains("handler exploded"))
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn stop_wins_over_output() {
        let handler = handler_fn(|_ctx, stop| async move {
            stop.stop();
            Ok(HandlerOutput::Scalar(json!(1)))
        });
        let signal = run(handler, ctx(json!({"a": 1}))).await;
        assert_eq!(signal, StepSignal::Stop { context: ctx(json!({"a": 1})) });
    }
}
