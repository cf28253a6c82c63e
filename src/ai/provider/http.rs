//! reqwest-backed [`LanguageModelOperations`]
//!
//! One POST per attempt. Rate-limited, transient and network failures are
//! retried with exponential backoff up to `max_retries` times per backend.

use std::time::Duration;

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::{BackendKind, LanguageModelOperations};
use crate::config::ModelBackendConfig;
use crate::constants::backend::{BASE_DELAY_MS, MAX_DELAY_SECS};
use crate::types::{DocumentorError, ErrorClassifier, Result};

/// HTTP client shared by every backend
pub struct HttpModelClient {
    client: reqwest::Client,
    min_delay: Duration,
    max_delay: Duration,
}

impl std::fmt::Debug for HttpModelClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpModelClient")
            .field("min_delay", &self.min_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl HttpModelClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| DocumentorError::LlmApi(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            min_delay: Duration::from_millis(BASE_DELAY_MS),
            max_delay: Duration::from_secs(MAX_DELAY_SECS),
        })
    }

    /// Override the backoff window
    pub fn with_backoff(mut self, min_delay: Duration, max_delay: Duration) -> Self {
        self.min_delay = min_delay;
        self.max_delay = max_delay.max(min_delay);
        self
    }

    /// Only http and https endpoints are accepted
    pub fn validate_endpoint(endpoint: &str) -> Result<url::Url> {
        let url = url::Url::parse(endpoint).map_err(|e| {
            DocumentorError::Config(format!("Invalid model endpoint URL '{}': {}", endpoint, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(DocumentorError::Config(format!(
                "Model endpoint must use http or https scheme, got: {}",
                url.scheme()
            )));
        }

        Ok(url)
    }

    async fn post_once(
        &self,
        backend: &ModelBackendConfig,
        url: &url::Url,
        payload: &Value,
        bearer: Option<&SecretString>,
    ) -> Result<String> {
        let mut request = self
            .client
            .post(url.clone())
            .timeout(Duration::from_secs(backend.timeout_seconds))
            .json(payload);
        if let Some(key) = bearer {
            request = request.bearer_auth(key.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|e| ErrorClassifier::classify_transport(&e, &backend.name))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ErrorClassifier::classify_transport(&e, &backend.name))?;

        if !status.is_success() {
            let message = if body.trim().is_empty() {
                format!("HTTP {}", status)
            } else {
                format!("HTTP {}: {}", status, body.trim())
            };
            return Err(
                ErrorClassifier::classify_http_status(status.as_u16(), &message, &backend.name)
                    .into(),
            );
        }

        Ok(body)
    }
}

#[async_trait]
impl LanguageModelOperations for HttpModelClient {
    #[instrument(skip_all, fields(backend = %backend.name, endpoint = %endpoint))]
    async fn invoke(
        &self,
        backend: &ModelBackendConfig,
        endpoint: &str,
        payload: &Value,
    ) -> Result<String> {
        let url = Self::validate_endpoint(endpoint)?;

        let bearer = match (BackendKind::detect(backend), backend.api_key.as_deref()) {
            (BackendKind::Ollama, _) => None,
            (_, Some(key)) if !key.trim().is_empty() => Some(SecretString::from(key.to_string())),
            _ => None,
        };

        let policy = ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(backend.max_retries);

        let body = (|| async { self.post_once(backend, &url, payload, bearer.as_ref()).await })
            .retry(policy)
            .when(|e: &DocumentorError| e.is_recoverable())
            .notify(|e: &DocumentorError, delay: Duration| {
                warn!("Retrying {} in {:?}: {}", backend.name, delay, e);
            })
            .await?;

        debug!("Received {} bytes from {}", body.len(), backend.name);
        Ok(body)
    }
}
