//! Recovery of a JSON object from free-form model output.
//!
//! Precedence:
//! 1. a fenced block tagged `json`
//! 2. the span from the first `{` to the last `}`
//! 3. otherwise the [`InvalidResponse`] sentinel
//!
//! A matched span that does not parse, or parses to something other than an
//! object, also yields the sentinel. Nothing here returns an error.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Error marker carried by the sentinel record.
pub const INVALID_JSON: &str = "Invalid JSON";

static JSON_FENCE: OnceLock<Regex> = OnceLock::new();

fn json_fence() -> &'static Regex {
    JSON_FENCE.get_or_init(|| {
        Regex::new(r"(?s)```json\s*(.*?)\s*```").expect("json fence regex must compile")
    })
}

/// The sentinel produced when no JSON object can be recovered.
///
/// Serializes as `{"error": "Invalid JSON", "raw_response": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidResponse {
    pub error: String,
    pub raw_response: String,
}

impl InvalidResponse {
    /// Wrap the original model output.
    pub fn new(raw_response: impl Into<String>) -> Self {
        Self {
            error: INVALID_JSON.to_string(),
            raw_response: raw_response.into(),
        }
    }
}

/// Outcome of recovery.
#[derive(Debug, Clone, PartialEq)]
pub enum RecoveredResponse {
    /// A JSON object was found and parsed.
    Object(Map<String, Value>),
    /// Nothing usable was found.
    Invalid(InvalidResponse),
}

impl RecoveredResponse {
    /// True when recovery produced the sentinel.
    pub fn is_invalid(&self) -> bool {
        matches!(self, RecoveredResponse::Invalid(_))
    }
}

/// Locate the candidate JSON text inside a response.
fn candidate(response: &str) -> Option<&str> {
    if let Some(captures) = json_fence().captures(response) {
        return captures.get(1).map(|m| m.as_str());
    }

    let start = response.find('{')?;
    let end = response.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&response[start..=end])
}

/// Recover a JSON object from a model response.
pub fn recover_json(response: &str) -> RecoveredResponse {
    let Some(text) = candidate(response) else {
        warn!(response_len = response.len(), "No JSON found in model response");
        return RecoveredResponse::Invalid(InvalidResponse::new(response));
    };

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => {
            debug!(keys = map.len(), "Recovered JSON object from model response");
            RecoveredResponse::Object(map)
        }
        Ok(other) => {
            warn!(kind = json_kind(&other), "Model response JSON is not an object");
            RecoveredResponse::Invalid(InvalidResponse::new(response))
        }
        Err(e) => {
            warn!(error = %e, "Model response JSON failed to parse");
            RecoveredResponse::Invalid(InvalidResponse::new(response))
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(response: &str) -> Value {
        match recover_json(response) {
            RecoveredResponse::Object(map) => Value::Object(map),
            RecoveredResponse::Invalid(invalid) => panic!("expected object, got {:?}", invalid),
        }
    }

    #[test]
    fn test_fenced_block_in_prose() {
        let response = "Sure! Here it is:\n```json\n{\"a\": \"1\"}\n```\nLet me know.";
        assert_eq!(object(response), json!({"a": "1"}));
    }

    #[test]
    fn test_bare_braces_in_prose() {
        let response = r#"Here is your data: {"a": "1"} thanks"#;
        assert_eq!(object(response), json!({"a": "1"}));
    }

    #[test]
    fn test_no_json_returns_sentinel_with_original_text() {
        let response = "no json here at all";
        assert_eq!(
            recover_json(response),
            RecoveredResponse::Invalid(InvalidResponse {
                error: "Invalid JSON".to_string(),
                raw_response: response.to_string(),
            })
        );
    }

    #[test]
    fn test_fence_takes_precedence_over_stray_braces() {
        let response = "Use {placeholders} like {this}.\n```json\n{\"b\": {\"c\": \"\"}}\n```";
        assert_eq!(object(response), json!({"b": {"c": ""}}));
    }

    #[test]
    fn test_greedy_brace_span_keeps_nested_objects() {
        let response = r#"Result: {"a": {"b": "1"}, "c": "2"} end"#;
        assert_eq!(object(response), json!({"a": {"b": "1"}, "c": "2"}));
    }

    #[test]
    fn test_unparseable_fence_is_sentinel() {
        let response = "```json\n{\"a\": \n```";
        let recovered = recover_json(response);
        assert!(recovered.is_invalid());
    }

    #[test]
    fn test_stray_braces_in_prose_are_sentinel() {
        let response = "I found {two} values and {three} more";
        match recover_json(response) {
            RecoveredResponse::Invalid(invalid) => assert_eq!(invalid.raw_response, response),
            other => panic!("expected sentinel, got {:?}", other),
        }
    }

    #[test]
    fn test_reversed_braces_are_sentinel() {
        assert!(recover_json("} nothing {").is_invalid());
    }

    #[test]
    fn test_non_object_fence_is_sentinel() {
        assert!(recover_json("```json\n[1, 2]\n```").is_invalid());
    }

    #[test]
    fn test_empty_response_is_sentinel() {
        assert!(recover_json("").is_invalid());
    }

    #[test]
    fn test_sentinel_wire_shape() {
        let value = serde_json::to_value(InvalidResponse::new("oops")).unwrap();
        assert_eq!(value, json!({"error": "Invalid JSON", "raw_response": "oops"}));
    }
}
