//! Plain completion endpoint: `{prompt, max_tokens, temperature}` posted to the base URL

use serde::Serialize;
use serde_json::Value;

use crate::config::ModelBackendConfig;

/// Response fields tried in order
const TEXT_FIELDS: &[&str] = &["text", "content", "response", "output", "result"];

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
}

pub fn build_request(config: &ModelBackendConfig, prompt: &str) -> Value {
    let request = CompletionRequest {
        prompt,
        max_tokens: config.max_tokens,
        temperature: config.temperature,
    };
    serde_json::to_value(request).unwrap_or(Value::Null)
}

pub fn endpoint(base: &str) -> String {
    base.to_string()
}

pub fn extract_text(body: &Value) -> Option<&str> {
    TEXT_FIELDS
        .iter()
        .find_map(|field| body.get(*field).and_then(Value::as_str))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_has_no_model() {
        let payload = build_request(&ModelBackendConfig::new("custom"), "p");
        assert_eq!(payload["prompt"], "p");
        assert!(payload.get("model").is_none());
    }

    #[test]
    fn test_extract_field_order() {
        assert_eq!(
            extract_text(&json!({"output": "o", "content": "c"})),
            Some("c")
        );
        assert_eq!(extract_text(&json!({"result": "r"})), Some("r"));
        assert_eq!(extract_text(&json!({"other": "x"})), None);
    }
}
