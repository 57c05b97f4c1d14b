//! Typed extraction from untyped tool arguments
//!
//! Tool invocations carry a flat JSON object of arguments. These helpers
//! pull individual fields out by name with a target type. Missing keys and
//! wrong-typed values yield the type's zero value — extraction never
//! panics and never errors. Callers decide whether a zero value means
//! "unset": a tool that requires a non-empty path must reject the empty
//! string itself.
//!
//! Numbers are always read at double precision so integer and float JSON
//! encodings behave identically.

use rmcp::model::JsonObject;
use serde_json::Value;

/// Extracts a string argument; missing or non-string values yield `""`
pub fn string_arg(args: &JsonObject, key: &str) -> String {
    args.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Extracts a numeric argument as `f64`; missing or non-numeric values
/// yield `0.0`
pub fn number_arg(args: &JsonObject, key: &str) -> f64 {
    args.get(key).and_then(Value::as_f64).unwrap_or_default()
}

/// Extracts a boolean flag; missing or non-boolean values yield `false`
pub fn bool_arg(args: &JsonObject, key: &str) -> bool {
    args.get(key).and_then(Value::as_bool).unwrap_or_default()
}

/// Extracts a nested mapping; missing or non-object values yield an empty
/// map
pub fn object_arg(args: &JsonObject, key: &str) -> JsonObject {
    args.get(key)
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_args() -> JsonObject {
        let value = json!({
            "serial": "emulator-5554",
            "duration": 30,
            "scale": 0.5,
            "cleanup": true,
            "nested": {"a": 1},
            "wrongType": 42,
        });
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_string_arg() {
        let args = sample_args();
        assert_eq!(string_arg(&args, "serial"), "emulator-5554");
    }

    #[test]
    fn test_string_arg_missing_or_wrong_type() {
        let args = sample_args();
        assert_eq!(string_arg(&args, "absent"), "");
        assert_eq!(string_arg(&args, "wrongType"), "");
    }

    #[test]
    fn test_number_arg_integer_and_float() {
        let args = sample_args();
        // JSON integers read at double precision
        assert_eq!(number_arg(&args, "duration"), 30.0);
        assert_eq!(number_arg(&args, "scale"), 0.5);
    }

    #[test]
    fn test_number_arg_missing_or_wrong_type() {
        let args = sample_args();
        assert_eq!(number_arg(&args, "absent"), 0.0);
        assert_eq!(number_arg(&args, "serial"), 0.0);
    }

    #[test]
    fn test_bool_arg() {
        let args = sample_args();
        assert!(bool_arg(&args, "cleanup"));
        assert!(!bool_arg(&args, "absent"));
        assert!(!bool_arg(&args, "duration"));
    }

    #[test]
    fn test_object_arg() {
        let args = sample_args();
        let nested = object_arg(&args, "nested");
        assert_eq!(nested.get("a"), Some(&json!(1)));

        assert!(object_arg(&args, "absent").is_empty());
        assert!(object_arg(&args, "serial").is_empty());
    }
}
