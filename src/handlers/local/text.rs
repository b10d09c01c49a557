// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::Value;

use crate::config::consts::PREV_KEY;
use crate::errors::HandlerError;
use crate::model::Context;

pub(crate) const TEXT_KEY: &str = "text";

/// Find the text a handler should work on.
///
/// Uses the step's own `text` parameter if present, otherwise the nearest
/// `text` found by walking back through the `prev` contexts.
pub fn resolve_text(ctx: &Context) -> Result<String, HandlerError> {
    let mut current = ctx;
    loop {
        if let Some(Value::String(text)) = current.get(TEXT_KEY) {
            return Ok(text.clone());
        }
        match current.get(PREV_KEY) {
            Some(Value::Object(prev)) => current = prev,
            _ => return Err(HandlerError::MissingField(TEXT_KEY.to_string())),
        }
    }
}

/// Context carrying only `text`.
pub(crate) fn text_output(text: String) -> Context {
    let mut out = Context::new();
    out.insert(TEXT_KEY.to_string(), Value::String(text));
    out
}

/// Optional string parameter from the step itself.
pub(crate) fn string_param<'a>(ctx: &'a Context, key: &str) -> Option<&'a str> {
    ctx.get(key).and_then(Value::as_str)
}
