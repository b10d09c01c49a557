// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::errors::HandlerError;
use crate::handlers::local::text::{resolve_text, string_param, text_output};
use crate::model::Context;
use crate::traits::{EventHandler, HandlerOutput, HandlerResult, StopSignal};

/// Converts text to upper, lower, proper or title case, chosen by the step's `case` parameter.
pub struct ChangeTextCaseHandler;

#[async_trait]
impl EventHandler for ChangeTextCaseHandler {
    async fn handle(&self, ctx: Context, _stop: StopSignal) -> HandlerResult {
        let input = resolve_text(&ctx)?;
        let case_type = string_param(&ctx, "case").unwrap_or("upper");

        let result = match case_type {
            "upper" => input.to_uppercase(),
            "lower" => input.to_lowercase(),
            "proper" => input
                .split_whitespace()
                .map(capitalize)
                .collect::<Vec<_>>()
                .join(" "),
            "title" => input
                .split_whitespace()
                .enumerate()
                .map(|(i, word)| {
                    let lower_word = word.to_lowercase();
                    // First word is always capitalized
                    if i == 0 || !is_small_word(&lower_word) {
                        capitalize(word)
                    } else {
                        lower_word
                    }
                })
                .collect::<Vec<_>>()
                .join(" "),
            other => return Err(HandlerError::msg(format!("Unknown case type: {}", other))),
        };

        Ok(HandlerOutput::Structured(text_output(result)))
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
    }
}

fn is_small_word(word: &str) -> bool {
    matches!(
        word,
        "a" | "an" | "the" | "and" | "or" | "but" | "in" | "on" | "at" | "to" | "for" | "of" | "with" | "by"
    )
}

/// Reverses the text.
pub struct ReverseTextHandler;

#[async_trait]
impl EventHandler for ReverseTextHandler {
    async fn handle(&self, ctx: Context, _stop: StopSignal) -> HandlerResult {
        let reversed: String = resolve_text(&ctx)?.chars().rev().collect();
        Ok(HandlerOutput::Structured(text_output(reversed)))
    }
}

/// Wraps the text with the step's `prefix` and/or `suffix` parameters.
pub struct PrefixSuffixAdderHandler;

#[async_trait]
impl EventHandler for PrefixSuffixAdderHandler {
    async fn handle(&self, ctx: Context, _stop: StopSignal) -> HandlerResult {
        let input = resolve_text(&ctx)?;
        let prefix = string_param(&ctx, "prefix").unwrap_or_default();
        let suffix = string_param(&ctx, "suffix").unwrap_or_default();
        Ok(HandlerOutput::Structured(text_output(format!(
            "{}{}{}",
            prefix, input, suffix
        ))))
    }
}

/// Counts words and returns the count as a scalar, so the next step sees
/// `{ value: <count>, prev: ... }`. With `detail: true` it returns character,
/// word and line counts alongside the text instead.
pub struct TokenCounterHandler;

#[async_trait]
impl EventHandler for TokenCounterHandler {
    async fn handle(&self, ctx: Context, _stop: StopSignal) -> HandlerResult {
        let input = resolve_text(&ctx)?;
        let word_count = input.split_whitespace().count();

        if ctx.get("detail").and_then(Value::as_bool).unwrap_or(false) {
            return Ok(HandlerOutput::from(json!({
                "text": input,
                "char_count": input.chars().count(),
                "word_count": word_count,
                "line_count": input.lines().count().max(1),
            })));
        }

        Ok(HandlerOutput::Scalar(json!(word_count)))
    }
}
