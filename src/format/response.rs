//! Response formatting
//!
//! Raw bodies are classified once into a tagged result, and formatting
//! matches on the tag instead of re-probing the shape downstream. This
//! function never fails: an absent body renders as an explicit no-data
//! message.

use serde_json::{Map, Value};

/// Priority keys considered "important" when summarizing an object
const IMPORTANT_KEYS: &[&str] = &[
    "id", "name", "title", "subject", "message", "text", "email", "date", "created", "updated",
];

/// Maximum entries rendered for an array response
const MAX_LISTED_ITEMS: usize = 10;

/// Maximum fallback properties rendered for an object with no known keys
const MAX_FALLBACK_PROPS: usize = 3;

/// Shape-classified API response
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResult {
    /// No body, or an explicit null
    Empty,
    /// A bare string/number/boolean
    Scalar(Value),
    /// A JSON object
    Object(Map<String, Value>),
    /// A JSON array
    Array(Vec<Value>),
}

impl ApiResult {
    /// Classify a raw body into its shape exactly once
    pub fn classify(body: Option<Value>) -> Self {
        match body {
            None | Some(Value::Null) => ApiResult::Empty,
            Some(Value::Object(map)) => ApiResult::Object(map),
            Some(Value::Array(items)) => ApiResult::Array(items),
            Some(scalar) => ApiResult::Scalar(scalar),
        }
    }

    /// Render a concise human-readable summary
    pub fn format(&self) -> String {
        match self {
            ApiResult::Empty => "The call succeeded but returned no data.".to_string(),
            ApiResult::Scalar(value) => render_scalar(value),
            ApiResult::Object(map) => summarize_object(map),
            ApiResult::Array(items) => {
                let mut lines = vec![format!("Found {} items", items.len())];
                for item in items.iter().take(MAX_LISTED_ITEMS) {
                    lines.push(format!("- {}", summarize_value(item)));
                }
                lines.join("\n")
            }
        }
    }
}

/// Classify and format in one step
pub fn format_response(body: Option<Value>) -> String {
    ApiResult::classify(body).format()
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn summarize_value(value: &Value) -> String {
    match value {
        Value::Object(map) => summarize_object(map),
        other => render_scalar(other),
    }
}

/// Summarize an object via the important-key priority list, falling back to
/// its first few own properties with nested objects rendered as a
/// placeholder rather than deep-serialized.
fn summarize_object(map: &Map<String, Value>) -> String {
    let mut parts: Vec<String> = Vec::new();

    for key in IMPORTANT_KEYS {
        if let Some(value) = map.get(*key) {
            if !value.is_null() {
                parts.push(format!("{}: {}", key, render_scalar(value)));
            }
        }
    }

    if parts.is_empty() {
        for (key, value) in map.iter().take(MAX_FALLBACK_PROPS) {
            let rendered = match value {
                Value::Object(_) => "{...}".to_string(),
                Value::Array(items) => format!("[{} items]", items.len()),
                other => render_scalar(other),
            };
            parts.push(format!("{}: {}", key, rendered));
        }
    }

    if parts.is_empty() {
        "(empty object)".to_string()
    } else {
        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_body_never_throws() {
        assert_eq!(
            format_response(None),
            "The call succeeded but returned no data."
        );
        assert_eq!(
            format_response(Some(Value::Null)),
            "The call succeeded but returned no data."
        );
    }

    #[test]
    fn test_scalar_rendered_verbatim() {
        assert_eq!(format_response(Some(json!("ok"))), "ok");
        assert_eq!(format_response(Some(json!(42))), "42");
        assert_eq!(format_response(Some(json!(true))), "true");
    }

    #[test]
    fn test_array_of_twelve_lists_ten() {
        let items: Vec<Value> = (0..12).map(|i| json!({"id": i, "name": format!("item{}", i)})).collect();
        let text = format_response(Some(Value::Array(items)));
        assert!(text.starts_with("Found 12 items"));
        let entry_lines = text.lines().filter(|l| l.starts_with("- ")).count();
        assert_eq!(entry_lines, 10);
    }

    #[test]
    fn test_object_uses_priority_keys() {
        let text = format_response(Some(json!({
            "irrelevant": "x",
            "name": "Jane",
            "email": "jane@example.com"
        })));
        assert!(text.contains("name: Jane"));
        assert!(text.contains("email: jane@example.com"));
        assert!(!text.contains("irrelevant"));
    }

    #[test]
    fn test_object_fallback_placeholders() {
        let text = format_response(Some(json!({
            "alpha": {"nested": true},
            "beta": [1, 2, 3],
            "gamma": "plain",
            "zeta": "dropped past the cap"
        })));
        assert!(text.contains("alpha: {...}"));
        assert!(text.contains("beta: [3 items]"));
        // Only the first 3 own-properties appear
        assert!(!text.contains("zeta"));
    }

    #[test]
    fn test_classification_tags() {
        assert_eq!(ApiResult::classify(None), ApiResult::Empty);
        assert!(matches!(
            ApiResult::classify(Some(json!([1]))),
            ApiResult::Array(_)
        ));
        assert!(matches!(
            ApiResult::classify(Some(json!({"a": 1}))),
            ApiResult::Object(_)
        ));
        assert!(matches!(
            ApiResult::classify(Some(json!("s"))),
            ApiResult::Scalar(_)
        ));
    }
}
