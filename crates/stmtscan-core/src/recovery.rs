//! Recovery of transaction lists from loosely-wrapped JSON payloads.
//!
//! Payloads arrive either as a plain JSON array or as a text wrapper of the
//! form `{"result": "<escaped JSON array>"}` produced by a text-generation
//! step. The wrapper's closing boundary is the last double quote in the
//! whole input rather than a matched scan, so wrappers with stray quotes
//! near the end are not recovered.

use serde_json::Value;
use tracing::{debug, error, info, warn};

const WRAPPER_PREFIX: &str = r#"{"result": ""#;
const WRAPPER_SUFFIX: &str = r#""}"#;
const RESULT_MARKER: &str = r#""result": ""#;

/// Shape of an incoming payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// The input parsed directly as a JSON array.
    DirectArray(Vec<Value>),
    /// The input is a `{"result": "..."}` wrapper; holds the once-unescaped inner text.
    WrappedString(String),
    /// Neither shape applies.
    Unparseable,
}

impl Payload {
    /// Classify a raw payload string.
    pub fn classify(raw: &str) -> Self {
        debug!("Attempting to parse input directly as a JSON list");
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Array(items)) => return Payload::DirectArray(items),
            Ok(other) => warn!(
                "Input parsed, but is not a list (type: {}); checking for wrapped structure",
                json_type(&other)
            ),
            Err(e) => warn!("Input is not a direct JSON list: {}", e),
        }

        match unwrap_result(raw) {
            Some(inner) => Payload::WrappedString(inner),
            None => Payload::Unparseable,
        }
    }

    /// Resolve the payload to a list. Anything that is not an array yields an empty list.
    pub fn into_items(self) -> Vec<Value> {
        match self {
            Payload::DirectArray(items) => {
                info!("Parsed input directly as a list of {} items", items.len());
                items
            }
            Payload::WrappedString(inner) => match serde_json::from_str::<Value>(&inner) {
                Ok(Value::Array(items)) => {
                    info!("Parsed wrapped inner JSON list of {} items", items.len());
                    items
                }
                Ok(other) => {
                    error!(
                        "Wrapped inner data is not a list (type: {})",
                        json_type(&other)
                    );
                    Vec::new()
                }
                Err(e) => {
                    error!("Failed to parse wrapped inner JSON: {}", e);
                    Vec::new()
                }
            },
            Payload::Unparseable => {
                error!("Failed to parse or extract a valid transaction list from the input");
                Vec::new()
            }
        }
    }
}

/// Recover a list of transaction objects from `raw`. Never fails; unrecoverable input yields `[]`.
pub fn recover(raw: &str) -> Vec<Value> {
    Payload::classify(raw).into_items()
}

/// Extract and unescape the value of a `{"result": "..."}` wrapper.
fn unwrap_result(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if !(trimmed.starts_with(WRAPPER_PREFIX) && trimmed.ends_with(WRAPPER_SUFFIX)) {
        error!("Input did not parse directly and does not match the wrapped format");
        return None;
    }

    let Some(marker) = raw.find(RESULT_MARKER) else {
        error!("Could not find the result marker");
        return None;
    };
    let content_start = marker + RESULT_MARKER.len();

    let end = match raw.rfind('"') {
        Some(end) if end > content_start => end,
        _ => {
            error!("Could not find closing quote for the result value");
            return None;
        }
    };

    let inner = &raw[content_start..end];
    match serde_json::from_str::<String>(&format!("\"{inner}\"")) {
        Ok(decoded) => Some(decoded),
        Err(_) => {
            warn!("Could not JSON-decode the extracted inner string, using it as is");
            Some(inner.to_string())
        }
    }
}

fn json_type(value: &Value) -> &'static str {
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
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_direct_array() {
        let items = json!([
            {"date": "01/03", "description": "GROCERY MART", "debit": "42.10"},
            {"date": "01/04", "description": "Café \"Le Nid\"", "debit": "8.00"}
        ]);
        let raw = serde_json::to_string(&items).unwrap();

        assert_eq!(Value::Array(recover(&raw)), items);
    }

    #[test]
    fn test_wrapped_array() {
        let raw = r#"{"result": "[{\"a\": 1}]"}"#;
        assert_eq!(
            Payload::classify(raw),
            Payload::WrappedString(r#"[{"a": 1}]"#.to_string())
        );
        assert_eq!(recover(raw), vec![json!({"a": 1})]);
    }

    #[test]
    fn test_wrapped_array_with_surrounding_whitespace() {
        let raw = "  {\"result\": \"[{\\\"description\\\": \\\"RENT\\\"}]\"}\n";
        assert_eq!(recover(raw), vec![json!({"description": "RENT"})]);
    }

    #[test]
    fn test_wrapped_unescaped_inner_is_used_as_is() {
        // Invalid escape sequence: decoding fails, the raw slice parses on its own.
        let raw = r#"{"result": "[{"a": "x\q"}]"}"#;
        assert!(matches!(Payload::classify(raw), Payload::WrappedString(_)));

        let raw = r#"{"result": "[1, 2]"}"#;
        assert_eq!(recover(raw), vec![json!(1), json!(2)]);
    }

    #[test]
    fn test_wrapped_non_array_is_empty() {
        let raw = r#"{"result": "{\"a\": 1}"}"#;
        assert!(recover(raw).is_empty());
    }

    #[test]
    fn test_object_without_wrapper_is_unparseable() {
        assert_eq!(Payload::classify(r#"{"items": []}"#), Payload::Unparseable);
        assert!(recover(r#"{"items": []}"#).is_empty());
    }

    #[test]
    fn test_garbage_is_empty() {
        assert_eq!(Payload::classify("not json at all"), Payload::Unparseable);
        assert!(recover("not json at all").is_empty());
        assert!(recover("").is_empty());
    }

    #[test]
    fn test_empty_result_value() {
        assert_eq!(Payload::classify(r#"{"result": ""}"#), Payload::Unparseable);
    }
}
