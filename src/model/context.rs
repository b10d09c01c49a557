// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::{Map, Value};

/// Open-ended key/value bag handed between steps.
///
/// The engine never inspects the shape of a context beyond the reserved
/// `prev` key it writes itself; everything else belongs to the handlers.
pub type Context = Map<String, Value>;

/// Convert a JSON value into a context.
///
/// `null` becomes an empty context, an object is taken as-is, anything else
/// is rejected and handed back to the caller.
pub fn context_from_value(value: Value) -> Result<Context, Value> {
    match value {
        Value::Null => Ok(Context::new()),
        Value::Object(map) => Ok(map),
        other => Err(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_becomes_empty_context() {
        assert_eq!(context_from_value(Value::Null), Ok(Context::new()));
    }

    #[test]
    fn object_is_kept() {
        let ctx = context_from_value(json!({"a": 1})).unwrap();
        assert_eq!(ctx.get("a"), Some(&json!(1)));
    }

    #[test]
    fn scalars_are_rejected() {
        assert_eq!(context_from_value(json!(3)), Err(json!(3)));
        assert_eq!(context_from_value(json!([1, 2])), Err(json!([1, 2])));
    }
}
