// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::config::consts::{DELAY_EVENT_NAME, DURATION_KEY};
use crate::config::EngineOptions;
use crate::engine::delay::parse_duration;
use crate::engine::store::ChainStore;
use crate::errors::ChainError;
use crate::model::{context_from_value, ChainStep, Context, DeclaredChain};
use crate::observability::messages::{chain::ChainDeclared, StructuredLog};

/// One entry for [`ChainBuilder::batch`], also the step shape in chain definition files.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BatchItem {
    pub event: String,
    #[serde(default)]
    pub props: Value,
}

impl BatchItem {
    pub fn new(event: impl Into<String>, props: Value) -> Self {
        Self {
            event: event.into(),
            props,
        }
    }
}

/// Fluent accumulator for a single chain.
///
/// Nothing is dispatched while building. The first invalid input is remembered
/// and returned from [`build`](ChainBuilder::build); later calls are ignored.
///
/// ```
/// # use the_chainwood::engine::ChainEngine;
/// # use serde_json::json;
/// let engine = ChainEngine::new();
/// let chain = engine
///     .chain("checkout")
///     .add("cart.filter", json!({ "category": "books" }))
///     .sleep(250)
///     .add("cart.render", json!(null))
///     .meta(json!({ "origin": "agent" }))
///     .build()
///     .unwrap();
///
/// assert_eq!(chain.steps.len(), 3);
/// assert!(engine.has_chain("checkout"));
/// ```
#[derive(Debug, Clone)]
pub struct ChainBuilder {
    id: String,
    steps: Vec<ChainStep>,
    metadata: Context,
    error: Option<ChainError>,
    store: ChainStore,
    options: Arc<EngineOptions>,
}

impl ChainBuilder {
    pub(crate) fn new(id: String, store: ChainStore, options: Arc<EngineOptions>) -> Self {
        Self {
            id,
            steps: Vec::new(),
            metadata: Context::new(),
            error: None,
            store,
            options,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn steps(&self) -> &[ChainStep] {
        &self.steps
    }

    /// Append a step. `parameters` must be a JSON object or `null` (empty).
    pub fn add(mut self, event_name: impl Into<String>, parameters: impl Into<Value>) -> Self {
        if self.error.is_some() {
            return self;
        }
        match self.make_step(event_name.into(), parameters.into()) {
            Ok(step) => self.steps.push(step),
            Err(reason) => self.fail(reason),
        }
        self
    }

    /// Append a delay step of `duration_ms` milliseconds.
    pub fn sleep(self, duration_ms: u64) -> Self {
        let mut params = Context::new();
        params.insert(DURATION_KEY.to_string(), Value::from(duration_ms));
        self.add(DELAY_EVENT_NAME, params)
    }

    /// Append several steps in order. Items named after a delay alias become
    /// delay steps; existing steps are kept.
    pub fn batch<I>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = BatchItem>,
    {
        for (index, item) in items.into_iter().enumerate() {
            if self.error.is_some() {
                break;
            }
            if self.options.is_delay_event(&item.event) {
                let checked = context_from_value(item.props)
                    .map_err(|_| "props must be a mapping".to_string())
                    .and_then(|props| parse_duration(&props).map(|_| props));
                match checked {
                    // Keep the raw duration so fractional values reach the delay step untouched.
                    Ok(mut props) => {
                        let mut params = Context::new();
                        if let Some(duration) = props.remove(DURATION_KEY) {
                            params.insert(DURATION_KEY.to_string(), duration);
                        }
                        self = self.add(DELAY_EVENT_NAME, params);
                    }
                    Err(reason) => self.fail(format!("batch item {}: {}", index, reason)),
                }
            } else {
                self = self.add(item.event, item.props);
            }
        }
        self
    }

    /// Merge descriptive fields into the chain metadata. Later keys win.
    pub fn meta(mut self, fields: impl Into<Value>) -> Self {
        if self.error.is_some() {
            return self;
        }
        match context_from_value(fields.into()) {
            Ok(fields) => self.metadata.extend(fields),
            Err(other) => self.fail(format!("metadata must be a mapping, got {}", other)),
        }
        self
    }

    /// Snapshot the chain and store it, replacing any declaration with the same id.
    ///
    /// The builder stays usable; later changes do not touch the returned or stored chain.
    pub fn build(&self) -> Result<DeclaredChain, ChainError> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }

        let chain = DeclaredChain {
            id: self.id.clone(),
            steps: self.steps.clone(),
            created_at: Utc::now(),
            metadata: self.metadata.clone(),
        };

        let replaced = self.store.insert(chain.clone());
        ChainDeclared {
            chain_id: &chain.id,
            step_count: chain.steps.len(),
            replaced,
        }
        .log();

        Ok(chain)
    }

    fn make_step(&self, event_name: String, parameters: Value) -> Result<ChainStep, String> {
        if event_name.trim().is_empty() {
            return Err(format!("step {} has an empty event name", self.steps.len()));
        }

        let parameters = context_from_value(parameters).map_err(|other| {
            format!(
                "parameters for '{}' must be a mapping, got {}",
                event_name, other
            )
        })?;

        let step = ChainStep::new(event_name, parameters);
        if step.is_delay() {
            parse_duration(&step.parameters)?;
        }
        Ok(step)
    }

    fn fail(&mut self, reason: String) {
        self.error = Some(ChainError::invalid(&self.id, reason));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn builder(id: &str) -> ChainBuilder {
        ChainBuilder::new(id.to_string(), ChainStore::new(), Arc::new(EngineOptions::default()))
    }

    #[test]
    fn add_defaults_to_empty_parameters() {
        let b = builder("a").add("x", Value::Null);
        assert_eq!(b.steps()[0], ChainStep::new("x", Context::new()));
    }

    #[test]
    fn sleep_is_a_reserved_step() {
        let b = builder("a").sleep(40);
        let step = &b.steps()[0];
        assert!(step.is_delay());
        assert_eq!(step.parameters.get(DURATION_KEY), Some(&json!(40)));
    }

    #[test]
    fn batch_matches_direct_calls() {
        let batched = builder("a").batch(vec![
            BatchItem::new("sleep", json!({"duration": 10})),
            BatchItem::new("z", json!({"a": 1})),
        ]);
        let direct = builder("a").sleep(10).add("z", json!({"a": 1}));
        assert_eq!(batched.steps(), direct.steps());
    }

    #[test]
    fn batch_keeps_fractional_delay() {
        let batched = builder("a").batch(vec![BatchItem::new("sleep", json!({"duration": 2.5}))]);
        let direct = builder("a").add(DELAY_EVENT_NAME, json!({"duration": 2.5}));
        assert_eq!(batched.steps(), direct.steps());
        assert_eq!(batched.steps()[0].parameters.get(DURATION_KEY), Some(&json!(2.5)));
    }

    #[test]
    fn batch_keeps_existing_steps() {
        let b = builder("a")
            .add("first", Value::Null)
            .batch(vec![BatchItem::new("DELAY", json!({"duration": 1}))]);
        assert_eq!(b.steps().len(), 2);
        assert_eq!(b.steps()[0].event_name, "first");
        assert!(b.steps()[1].is_delay());
    }

    #[test]
    fn meta_merges_and_overwrites() {
        let chain = builder("a")
            .meta(json!({"owner": "x", "v": 1}))
            .meta(json!({"v": 2}))
            .build()
            .unwrap();
        assert_eq!(chain.metadata, json!({"owner": "x", "v": 2}).as_object().cloned().unwrap());
    }

    #[test]
    fn empty_event_name_is_invalid() {
        let err = builder("a").add("  ", Value::Null).build().unwrap_err();
        assert!(matches!(err, ChainError::InvalidArgument { ref chain_id, .. } if chain_id == "a"));
    }

    #[test]
    fn scalar_parameters_are_invalid() {
        assert!(builder("a").add("x", json!(3)).build().is_err());
    }

    #[test]
    fn negative_batch_delay_is_invalid() {
        let err = builder("a")
            .batch(vec![BatchItem::new("sleep", json!({"duration": -10}))])
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("batch item 0"));
    }

    #[test]
    fn reserved_delay_added_directly_is_validated() {
        assert!(builder("a").add(DELAY_EVENT_NAME, json!({})).build().is_err());
    }

    #[test]
    fn first_error_is_kept() {
        let err = builder("a")
            .add("", Value::Null)
            .add("x", json!("nope"))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("empty event name"));
    }

    #[test]
    fn failed_build_stores_nothing() {
        let store = ChainStore::new();
        let b = ChainBuilder::new("a".into(), store.clone(), Arc::new(EngineOptions::default()))
            .add("", Value::Null);
        assert!(b.build().is_err());
        assert!(store.is_empty());
    }
}
