// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use crate::config::consts::{DURATION_KEY, PREV_KEY};
use crate::model::Context;
use crate::observability::messages::{step::InvalidDelayDuration, StructuredLog};
use crate::traits::{EventHandler, HandlerOutput, HandlerResult, StopSignal};

/// Read a delay length in milliseconds from step parameters.
///
/// Accepts non-negative integers and non-negative finite floats (truncated).
pub fn parse_duration(params: &Context) -> Result<u64, String> {
    let Some(raw) = params.get(DURATION_KEY) else {
        return Err(format!("missing '{}'", DURATION_KEY));
    };

    if let Some(ms) = raw.as_u64() {
        return Ok(ms);
    }

    match raw.as_f64() {
        Some(ms) if ms.is_finite() && ms >= 0.0 => Ok(ms as u64),
        Some(ms) if ms < 0.0 => Err(format!("'{}' must not be negative, got {}", DURATION_KEY, ms)),
        _ => Err(format!("'{}' must be a number, got {}", DURATION_KEY, raw)),
    }
}

/// Built-in handler behind the reserved delay event.
///
/// Waits for the step's `duration` and forwards the previous step's context
/// untouched, so a delay is a barrier in time and a no-op for data.
#[derive(Debug, Default)]
pub struct DelayHandler;

#[async_trait]
impl EventHandler for DelayHandler {
    async fn handle(&self, mut ctx: Context, _stop: StopSignal) -> HandlerResult {
        let ms = match parse_duration(&ctx) {
            Ok(ms) => ms,
            Err(_) => {
                let raw = ctx
                    .get(DURATION_KEY)
                    .map_or_else(|| "<missing>".to_string(), Value::to_string);
                InvalidDelayDuration { raw: &raw }.log();
                0
            }
        };

        if ms > 0 {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }

        let prev = match ctx.remove(PREV_KEY) {
            Some(Value::Object(prev)) => prev,
            _ => Context::new(),
        };
        Ok(HandlerOutput::Structured(prev))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Instant;

    fn params(value: Value) -> Context {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn parses_integer_and_float_durations() {
        assert_eq!(parse_duration(&params(json!({"duration": 25}))), Ok(25));
        assert_eq!(parse_duration(&params(json!({"duration": 2.9}))), Ok(2));
        assert_eq!(parse_duration(&params(json!({"duration": 0}))), Ok(0));
    }

    #[test]
    fn rejects_bad_durations() {
        assert!(parse_duration(&params(json!({}))).is_err());
        assert!(parse_duration(&params(json!({"duration": -1}))).is_err());
        assert!(parse_duration(&params(json!({"duration": -0.5}))).is_err());
        assert!(parse_duration(&params(json!({"duration": "10"}))).is_err());
    }

    #[tokio::test]
    async fn waits_and_forwards_prev() {
        let ctx = params(json!({"duration": 20, "prev": {"kept": true}}));
        let started = Instant::now();

        let out = DelayHandler.handle(ctx, StopSignal::new()).await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(20));
        assert_eq!(out, HandlerOutput::Structured(params(json!({"kept": true}))));
    }

    #[tokio::test]
    async fn invalid_duration_is_zero() {
        let ctx = params(json!({"duration": "soon"}));
        let out = DelayHandler.handle(ctx, StopSignal::new()).await.unwrap();
        assert_eq!(out, HandlerOutput::Structured(Context::new()));
    }
}
