// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use super::handlers::*;
use crate::dispatch::Subscription;
use crate::engine::ChainEngine;
use crate::traits::EventHandler;

/// Factory for the built-in local handlers.
///
/// - "text.change_case" -> ChangeTextCaseHandler (`case`: upper, lower, proper, title)
/// - "text.reverse" -> ReverseTextHandler
/// - "text.prefix_suffix" -> PrefixSuffixAdderHandler (`prefix`, `suffix`)
/// - "text.token_count" -> TokenCounterHandler (`detail`)
pub struct LocalHandlerFactory;

impl LocalHandlerFactory {
    pub fn create_handler(event_name: &str) -> Result<Arc<dyn EventHandler>, String> {
        match event_name {
            "text.change_case" => Ok(Arc::new(ChangeTextCaseHandler)),
            "text.reverse" => Ok(Arc::new(ReverseTextHandler)),
            "text.prefix_suffix" => Ok(Arc::new(PrefixSuffixAdderHandler)),
            "text.token_count" => Ok(Arc::new(TokenCounterHandler)),
            _ => Err(format!("Unknown local handler: '{}'", event_name)),
        }
    }

    pub fn list_available_handlers() -> Vec<&'static str> {
        vec![
            "text.change_case",
            "text.reverse",
            "text.prefix_suffix",
            "text.token_count",
        ]
    }

    pub fn is_handler_available(event_name: &str) -> bool {
        Self::list_available_handlers().contains(&event_name)
    }

    /// Register every built-in handler on `engine` under its event name.
    pub fn register_all(engine: &ChainEngine) -> Result<Vec<Subscription>, String> {
        Self::list_available_handlers()
            .into_iter()
            .map(|name| -> Result<Subscription, String> {
                Ok(engine.on(name, Self::create_handler(name)?))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn every_listed_handler_can_be_created() {
        for name in LocalHandlerFactory::list_available_handlers() {
            assert!(LocalHandlerFactory::create_handler(name).is_ok(), "{}", name);
            assert!(LocalHandlerFactory::is_handler_available(name));
        }
        assert!(LocalHandlerFactory::create_handler("text.shout").is_err());
    }

    #[tokio::test]
    async fn registered_handlers_run_in_a_chain() {
        let engine = ChainEngine::new();
        let subs = LocalHandlerFactory::register_all(&engine).unwrap();
        assert_eq!(subs.len(), 4);

        engine
            .chain("text")
            .add("text.change_case", json!({"text": "hello world", "case": "upper"}))
            .add("text.reverse", json!(null))
            .add("text.prefix_suffix", json!({"prefix": "<", "suffix": ">"}))
            .add("text.token_count", json!(null))
            .build()
            .unwrap();

        let report = engine.consume("text").await;
        assert!(report.is_clean());
        assert_eq!(report.context["value"], json!(2));
        assert_eq!(report.context["prev"]["prev"]["text"], json!("<DLROW OLLEH>"));
    }
}
