//! OpenAI-compatible Chat Completions wire format

use serde::Serialize;
use serde_json::Value;

use crate::config::ModelBackendConfig;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

pub fn build_request(config: &ModelBackendConfig, prompt: &str) -> Value {
    let request = ChatCompletionRequest {
        model: &config.name,
        messages: vec![ChatMessage {
            role: "user",
            content: prompt,
        }],
        max_tokens: config.max_tokens,
        temperature: config.temperature,
    };
    serde_json::to_value(request).unwrap_or(Value::Null)
}

/// `<base>/v1/chat/completions`, without doubling an existing `/v1`
pub fn endpoint(base: &str) -> String {
    if base.ends_with("/v1") {
        format!("{}/chat/completions", base)
    } else {
        format!("{}/v1/chat/completions", base)
    }
}

/// `choices[0].message.content`, then the legacy `choices[0].text`
pub fn extract_text(body: &Value) -> Option<&str> {
    body.pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .or_else(|| body.pointer("/choices/0/text").and_then(Value::as_str))
}
