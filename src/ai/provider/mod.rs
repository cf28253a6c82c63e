//! Model Backends
//!
//! Wire formats for the supported backend kinds and the
//! [`LanguageModelOperations`] seam that performs the actual call.
//!
//! ## Kinds
//!
//! | Kind    | Endpoint                      | Text field                    |
//! |---------|-------------------------------|-------------------------------|
//! | Ollama  | `<base>/api/generate`         | `response`                    |
//! | OpenAI  | `<base>/v1/chat/completions`  | `choices[0].message.content`  |
//! | Generic | `<base>`                      | `text`, `content`, ...        |

pub mod generic;
pub mod http;
pub mod ollama;
pub mod openai;

pub use http::HttpModelClient;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::ModelBackendConfig;
use crate::constants::backend::DEFAULT_OLLAMA_PORT;
use crate::types::Result;

/// Name prefixes of models usually served by Ollama
const OLLAMA_MODEL_PREFIXES: &[&str] = &["llama", "mistral", "codellama"];

// =============================================================================
// Operations Trait
// =============================================================================

/// Performs one model call and returns the raw response body.
///
/// Implementations own the timeout and retry policy.
#[async_trait]
pub trait LanguageModelOperations: Send + Sync {
    async fn invoke(
        &self,
        backend: &ModelBackendConfig,
        endpoint: &str,
        payload: &Value,
    ) -> Result<String>;
}

/// Shared operations handle for concurrent stages
pub type SharedModelOps = Arc<dyn LanguageModelOperations>;

// =============================================================================
// Backend Kind
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Ollama,
    OpenAi,
    Generic,
}

impl BackendKind {
    /// Detect the wire format for a backend.
    ///
    /// An explicit provider wins; otherwise the base URL and model name decide.
    pub fn detect(config: &ModelBackendConfig) -> Self {
        let provider = config.provider.trim().to_lowercase();
        match provider.as_str() {
            "ollama" => return BackendKind::Ollama,
            "openai" => return BackendKind::OpenAi,
            _ => {}
        }

        let url = config.base_url.to_lowercase();
        let name = config.name.to_lowercase();

        if url.contains("ollama")
            || url.contains(&DEFAULT_OLLAMA_PORT.to_string())
            || OLLAMA_MODEL_PREFIXES.iter().any(|p| name.starts_with(p))
        {
            BackendKind::Ollama
        } else if url.contains("openai") || name.starts_with("gpt-") {
            BackendKind::OpenAi
        } else {
            BackendKind::Generic
        }
    }

    /// Request body for `prompt`; `extra` fields never override built-ins
    pub fn build_payload(&self, config: &ModelBackendConfig, prompt: &str) -> Value {
        let mut payload = match self {
            BackendKind::Ollama => ollama::build_request(config, prompt),
            BackendKind::OpenAi => openai::build_request(config, prompt),
            BackendKind::Generic => generic::build_request(config, prompt),
        };
        if let Value::Object(map) = &mut payload {
            for (key, value) in &config.extra {
                map.entry(key.clone()).or_insert_with(|| value.clone());
            }
        }
        payload
    }

    pub fn endpoint(&self, base_url: &str) -> String {
        let base = base_url.trim().trim_end_matches('/');
        match self {
            BackendKind::Ollama => ollama::endpoint(base),
            BackendKind::OpenAi => openai::endpoint(base),
            BackendKind::Generic => generic::endpoint(base),
        }
    }

    /// Generated text from a raw response body.
    ///
    /// Bodies that are not JSON, or lack the expected field, are returned unchanged.
    pub fn extract_text(&self, raw: &str) -> String {
        let Ok(body) = serde_json::from_str::<Value>(raw) else {
            return raw.to_string();
        };
        let text = match self {
            BackendKind::Ollama => ollama::extract_text(&body),
            BackendKind::OpenAi => openai::extract_text(&body),
            BackendKind::Generic => generic::extract_text(&body),
        };
        text.map(String::from).unwrap_or_else(|| raw.to_string())
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Ollama => write!(f, "ollama"),
            BackendKind::OpenAi => write!(f, "openai"),
            BackendKind::Generic => write!(f, "generic"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(name: &str, provider: &str, base_url: &str) -> ModelBackendConfig {
        ModelBackendConfig::new(name)
            .with_provider(provider)
            .with_base_url(base_url)
    }

    #[test]
    fn test_detect() {
        assert_eq!(
            BackendKind::detect(&backend("x", "ollama", "http://gpu:9000")),
            BackendKind::Ollama
        );
        assert_eq!(
            BackendKind::detect(&backend("x", "", "http://localhost:11434")),
            BackendKind::Ollama
        );
        assert_eq!(
            BackendKind::detect(&backend("mistral-7b", "", "http://gpu:9000")),
            BackendKind::Ollama
        );
        assert_eq!(
            BackendKind::detect(&backend("x", "", "https://api.openai.com")),
            BackendKind::OpenAi
        );
        assert_eq!(
            BackendKind::detect(&backend("gpt-4o", "", "http://proxy:8080")),
            BackendKind::OpenAi
        );
        assert_eq!(
            BackendKind::detect(&backend("gpt-4o", "openai", "http://localhost:11434")),
            BackendKind::OpenAi
        );
        assert_eq!(
            BackendKind::detect(&backend("claude", "", "http://proxy:8080/complete")),
            BackendKind::Generic
        );
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        assert_eq!(
            BackendKind::Ollama.endpoint("http://localhost:11434/"),
            "http://localhost:11434/api/generate"
        );
        assert_eq!(
            BackendKind::OpenAi.endpoint("https://api.openai.com/v1/"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            BackendKind::Generic.endpoint("http://proxy:8080/complete/"),
            "http://proxy:8080/complete"
        );
    }

    #[test]
    fn test_extra_fields_do_not_override() {
        let mut config = ModelBackendConfig::new("llama3");
        config.extra.insert("model".to_string(), serde_json::json!("other"));
        config.extra.insert("keep_alive".to_string(), serde_json::json!("5m"));

        let payload = BackendKind::Ollama.build_payload(&config, "p");
        assert_eq!(payload["model"], "llama3");
        assert_eq!(payload["keep_alive"], "5m");
    }

    #[test]
    fn test_extract_text_falls_back_to_raw() {
        assert_eq!(BackendKind::Ollama.extract_text(r#"{"response":"ok"}"#), "ok");
        assert_eq!(BackendKind::Ollama.extract_text("plain text"), "plain text");
        assert_eq!(
            BackendKind::Generic.extract_text(r#"{"unexpected":1}"#),
            r#"{"unexpected":1}"#
        );
    }
}
