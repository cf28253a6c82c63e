//! Model Orchestration
//!
//! Fans one element/purpose request out to every configured backend at once
//! and consolidates their text. A failing backend only contributes a
//! diagnostic line; nothing is propagated to the caller.

use futures::future::join_all;
use tracing::{debug, instrument, warn};

use super::prompt::Purpose;
use super::provider::{BackendKind, SharedModelOps};
use crate::config::ModelBackendConfig;
use crate::types::CodeElement;

/// Returned when no configuration is available at all
pub const MISSING_CONFIG_MESSAGE: &str =
    "Error: LLM configuration is null. Please check the application configuration.";

/// Outcome of one backend call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendResult {
    Success { backend: String, content: String },
    Failure { backend: String, diagnostic: String },
}

impl BackendResult {
    pub fn backend(&self) -> &str {
        match self {
            BackendResult::Success { backend, .. } | BackendResult::Failure { backend, .. } => {
                backend
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BackendResult::Success { .. })
    }
}

/// Merge backend results into one user-facing string.
///
/// A single success is returned as-is; several are headed `### <backend>`.
/// When every backend failed, the diagnostics are listed instead.
pub fn consolidate(results: Vec<BackendResult>) -> String {
    let (successes, failures): (Vec<_>, Vec<_>) =
        results.into_iter().partition(BackendResult::is_success);

    match successes.len() {
        0 => failures
            .into_iter()
            .filter_map(|r| match r {
                BackendResult::Failure { diagnostic, .. } => Some(diagnostic),
                BackendResult::Success { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n"),
        1 => successes
            .into_iter()
            .find_map(|r| match r {
                BackendResult::Success { content, .. } => Some(content),
                BackendResult::Failure { .. } => None,
            })
            .unwrap_or_default(),
        _ => successes
            .into_iter()
            .filter_map(|r| match r {
                BackendResult::Success { backend, content } => {
                    Some(format!("### {}\n\n{}", backend, content))
                }
                BackendResult::Failure { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n\n"),
    }
}

/// Runs model calls for code elements
#[derive(Clone)]
pub struct ModelOrchestrator {
    ops: SharedModelOps,
}

impl ModelOrchestrator {
    pub fn new(ops: SharedModelOps) -> Self {
        Self { ops }
    }

    /// Generate text for `element` from every backend.
    ///
    /// `None` and an empty backend list short-circuit with a descriptive
    /// message and make no call.
    #[instrument(skip_all, fields(element = %element.qualified_name(), purpose = %purpose))]
    pub async fn generate(
        &self,
        backends: Option<&[ModelBackendConfig]>,
        element: &CodeElement,
        purpose: Purpose,
    ) -> String {
        let Some(backends) = backends else {
            warn!("No LLM configuration available");
            return MISSING_CONFIG_MESSAGE.to_string();
        };
        if backends.is_empty() {
            return format!(
                "No LLM models configured for {} generation.",
                purpose.generation_label()
            );
        }

        let prompt = purpose.prompt(element);
        let calls = backends
            .iter()
            .map(|backend| self.call_backend(backend, &prompt, purpose));
        let results = join_all(calls).await;

        debug!(
            "{} of {} backends succeeded",
            results.iter().filter(|r| r.is_success()).count(),
            results.len()
        );
        consolidate(results)
    }

    async fn call_backend(
        &self,
        backend: &ModelBackendConfig,
        prompt: &str,
        purpose: Purpose,
    ) -> BackendResult {
        let kind = BackendKind::detect(backend);
        let payload = kind.build_payload(backend, prompt);
        let endpoint = kind.endpoint(&backend.base_url);

        let failure = |cause: String| BackendResult::Failure {
            backend: backend.name.clone(),
            diagnostic: format!(
                "Error generating {} with {}: {}",
                purpose.label(),
                backend.name,
                cause
            ),
        };

        match self.ops.invoke(backend, &endpoint, &payload).await {
            Ok(raw) => {
                let text = kind.extract_text(&raw);
                if text.trim().is_empty() {
                    failure("empty response".to_string())
                } else {
                    BackendResult::Success {
                        backend: backend.name.clone(),
                        content: text,
                    }
                }
            }
            Err(e) => {
                warn!("Backend {} failed: {}", backend.name, e);
                failure(e.cause())
            }
        }
    }
}
