// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

use crate::config::consts::DELAY_EVENT_NAME;
use crate::config::EngineOptions;
use crate::dispatch::{Continuation, EventBus, Subscription};
use crate::engine::builder::ChainBuilder;
use crate::engine::delay::DelayHandler;
use crate::engine::report::{ChainReport, ChainStatus, StepFailure, StepSignal};
use crate::engine::store::ChainStore;
use crate::engine::wrapper::HandlerListener;
use crate::model::{Context, DeclaredChain};
use crate::observability::messages::chain::{
    ChainConsumeCompleted, ChainConsumeStarted, ChainStopped, ChainsCleared, UnknownChain,
};
use crate::observability::messages::step::{
    ContinuationDropped, StepDispatched, StepPassthrough,
};
use crate::observability::messages::StructuredLog;
use crate::traits::EventHandler;

/// The bus the engine dispatches steps through.
pub type ChainBus = EventBus<Context, StepSignal>;

/// Declares, stores and executes event chains.
///
/// Cloning is cheap and every clone shares the same handlers and declared
/// chains. Separate `ChainEngine::new()` instances are fully independent.
///
/// ## Execution model
///
/// Steps run strictly one after another. For each step the engine builds the
/// execution context (the step's parameters plus `prev`, the previous step's
/// result), dispatches it to the handlers registered for the step's event and
/// waits for the first of them to resume the continuation before moving on.
/// A step nobody listens to passes its execution context straight through.
///
/// There is no timeout: a handler that never returns stalls its chain. Wrap
/// `consume` in `tokio::time::timeout` at the call site if that matters.
#[derive(Clone)]
pub struct ChainEngine {
    bus: ChainBus,
    store: ChainStore,
    options: Arc<EngineOptions>,
}

impl Default for ChainEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ChainEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainEngine")
            .field("declared_chains", &self.store.len())
            .field("options", &self.options)
            .finish()
    }
}

impl ChainEngine {
    pub fn new() -> Self {
        Self::with_options(EngineOptions::default())
    }

    pub fn with_options(options: EngineOptions) -> Self {
        let engine = Self {
            bus: ChainBus::new(),
            store: ChainStore::new(),
            options: Arc::new(options),
        };
        engine.on(DELAY_EVENT_NAME, Arc::new(DelayHandler));
        engine
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn bus(&self) -> &ChainBus {
        &self.bus
    }

    /// Register a handler for `event_name`.
    ///
    /// Unsubscribing does not affect steps already dispatched to it.
    pub fn on(&self, event_name: &str, handler: Arc<dyn EventHandler>) -> Subscription {
        self.bus
            .subscribe(event_name, Arc::new(HandlerListener::new(event_name, handler)))
    }

    /// Start declaring a chain. Nothing is stored until [`ChainBuilder::build`].
    pub fn chain(&self, id: impl Into<String>) -> ChainBuilder {
        ChainBuilder::new(id.into(), self.store.clone(), Arc::clone(&self.options))
    }

    pub fn has_chain(&self, id: &str) -> bool {
        self.store.contains(id)
    }

    /// Copy of every declared, not yet consumed chain.
    pub fn get_chains(&self) -> HashMap<String, DeclaredChain> {
        self.store.snapshot()
    }

    /// Remove one declared chain, or all when `id` is `None`. Running chains are unaffected.
    pub fn clear(&self, id: Option<&str>) -> usize {
        let removed = self.store.clear(id);
        ChainsCleared {
            chain_id: id,
            removed,
        }
        .log();
        removed
    }

    /// Remove the chain `id` from the store and run it.
    ///
    /// The chain is taken out of the store when this method is called, before
    /// the returned future is first polled, so a second `consume(id)` always
    /// sees it as gone. An unknown id logs a warning and yields a `NotFound`
    /// report with an empty context.
    pub fn consume(&self, id: &str) -> impl Future<Output = ChainReport> + Send + 'static {
        let declared = self.store.take(id);
        let bus = self.bus.clone();
        let chain_id = id.to_string();

        async move {
            match declared {
                Some(chain) => run_chain(bus, chain).await,
                None => {
                    UnknownChain {
                        chain_id: &chain_id,
                    }
                    .log();
                    ChainReport::not_found(chain_id)
                }
            }
        }
    }
}

async fn run_chain(bus: ChainBus, chain: DeclaredChain) -> ChainReport {
    let started = ChainConsumeStarted {
        chain_id: &chain.id,
        step_count: chain.steps.len(),
    };
    let span = started.span("consume");
    started.log();

    execute_steps(bus, &chain).instrument(span).await
}

const DROPPED_CONTINUATION: &str = "handler dropped the continuation without replying";

async fn execute_steps(bus: ChainBus, chain: &DeclaredChain) -> ChainReport {
    let start_time = Instant::now();
    let mut carry = Context::new();
    let mut failures = Vec::new();

    for (index, step) in chain.steps.iter().enumerate() {
        let exec = step.execution_context(&carry);

        let listener_count = bus.listener_count(&step.event_name);
        let passthrough = StepPassthrough {
            chain_id: &chain.id,
            event_name: &step.event_name,
            step_index: index,
        };
        if listener_count == 0 {
            passthrough.log();
            carry = exec;
            continue;
        }

        StepDispatched {
            chain_id: &chain.id,
            event_name: &step.event_name,
            step_index: index,
            listener_count,
        }
        .log();

        let (continuation, resumed) = Continuation::channel();
        if bus.dispatch(&step.event_name, exec.clone(), continuation) == 0 {
            // Every handler unsubscribed between the count and the dispatch.
            passthrough.log();
            carry = exec;
            continue;
        }

        match resumed.await {
            Ok(StepSignal::Continue { context, failure }) => {
                if let Some(message) = failure {
                    failures.push(StepFailure {
                        index,
                        event_name: step.event_name.clone(),
                        message,
                    });
                }
                carry = context;
            }
            Ok(StepSignal::Stop { context }) => {
                ChainStopped {
                    chain_id: &chain.id,
                    event_name: &step.event_name,
                    step_index: index,
                    skipped_steps: chain.steps.len() - index - 1,
                }
                .log();
                return ChainReport {
                    chain_id: chain.id.clone(),
                    status: ChainStatus::Stopped {
                        index,
                        event_name: step.event_name.clone(),
                    },
                    context,
                    failures,
                };
            }
            Err(_) => {
                ContinuationDropped {
                    chain_id: &chain.id,
                    event_name: &step.event_name,
                    step_index: index,
                }
                .log();
                failures.push(StepFailure {
                    index,
                    event_name: step.event_name.clone(),
                    message: DROPPED_CONTINUATION.to_string(),
                });
                carry = exec;
            }
        }
    }

    ChainConsumeCompleted {
        chain_id: &chain.id,
        step_count: chain.steps.len(),
        failure_count: failures.len(),
        duration: start_time.elapsed(),
    }
    .log();

    ChainReport {
        chain_id: chain.id.clone(),
        status: ChainStatus::Completed,
        context: carry,
        failures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{handler_fn, HandlerOutput};
    use serde_json::{json, Value};

    #[tokio::test]
    async fn consume_unknown_chain_is_not_found() {
        let engine = ChainEngine::new();
        let report = engine.consume("ghost").await;
        assert_eq!(report, ChainReport::not_found("ghost"));
    }

    #[tokio::test]
    async fn empty_chain_completes_with_empty_context() {
        let engine = ChainEngine::new();
        engine.chain("empty").build().unwrap();
        let report = engine.consume("empty").await;
        assert!(report.is_clean());
        assert!(report.context.is_empty());
    }

    #[tokio::test]
    async fn result_is_last_carry_forward_context() {
        let engine = ChainEngine::new();
        engine.on(
            "double",
            handler_fn(|ctx, _stop| async move {
                let n = ctx.get("n").and_then(Value::as_i64).unwrap_or(0);
                Ok(HandlerOutput::from(json!({ "n": n * 2 })))
            }),
        );
        engine.chain("c").add("double", json!({"n": 21})).build().unwrap();

        let report = engine.consume("c").await;
        assert_eq!(report.context, json!({"n": 42}).as_object().cloned().unwrap());
    }

    #[test]
    fn delay_handler_is_preregistered() {
        let engine = ChainEngine::new();
        assert_eq!(engine.bus().listener_count(DELAY_EVENT_NAME), 1);
    }

    #[test]
    fn clear_leaves_other_engines_alone() {
        let a = ChainEngine::new();
        let b = ChainEngine::new();
        a.chain("x").build().unwrap();
        b.chain("x").build().unwrap();

        assert_eq!(a.clear(None), 1);
        assert!(!a.has_chain("x"));
        assert!(b.has_chain("x"));
    }

    #[test]
    fn unsubscribed_handler_no_longer_counts() {
        let engine = ChainEngine::new();
        let sub = engine.on("x", handler_fn(|_ctx, _stop| async { Ok(HandlerOutput::None) }));
        assert_eq!(engine.bus().listener_count("x"), 1);
        assert!(sub.unsubscribe());
        assert_eq!(engine.bus().listener_count("x"), 0);
    }
}
