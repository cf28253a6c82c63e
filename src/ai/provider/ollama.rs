//! Ollama `/api/generate` wire format

use serde::Serialize;
use serde_json::Value;

use crate::config::ModelBackendConfig;

#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

pub fn build_request(config: &ModelBackendConfig, prompt: &str) -> Value {
    let request = OllamaRequest {
        model: &config.name,
        prompt,
        stream: false,
        options: OllamaOptions {
            temperature: config.temperature,
            num_predict: config.max_tokens,
        },
    };
    serde_json::to_value(request).unwrap_or(Value::Null)
}

pub fn endpoint(base: &str) -> String {
    format!("{}/api/generate", base)
}

pub fn extract_text(body: &Value) -> Option<&str> {
    body.get("response").and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_shape() {
        let config = ModelBackendConfig::new("llama3");
        let payload = build_request(&config, "hi");
        assert_eq!(payload["model"], "llama3");
        assert_eq!(payload["prompt"], "hi");
        assert_eq!(payload["stream"], false);
        assert_eq!(payload["options"]["num_predict"], 4096);
        assert!(payload["options"]["temperature"].is_number());
    }

    #[test]
    fn test_extract() {
        assert_eq!(extract_text(&json!({"response": "done"})), Some("done"));
        assert_eq!(extract_text(&json!({"text": "done"})), None);
    }
}
