//! Stage Timeouts
//!
//! Helpers for wrapping async work in a deadline, plus the per-stage
//! budgets derived from [`OutputSettings`].
//!
//! ## Usage
//!
//! ```ignore
//! use crate::ai::timeout::{StageTimeouts, with_timeout};
//!
//! let timeouts = StageTimeouts::from_settings(&config.output);
//! let outcome = with_timeout(timeouts.main, render_main(), "main documentation").await;
//! ```

use std::future::Future;
use std::time::Duration;

use crate::config::OutputSettings;
use crate::types::{DocumentorError, Result};

/// Deadline for each documentation stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageTimeouts {
    pub main: Duration,
    /// Twice the base budget
    pub elements: Duration,
    /// Twice the base budget
    pub tests: Duration,
    pub diagrams: Duration,
}

impl StageTimeouts {
    pub fn from_settings(settings: &OutputSettings) -> Self {
        Self::uniform(Duration::from_secs(settings.stage_timeout_secs))
    }

    /// Element and test stages get double `base`
    pub fn uniform(base: Duration) -> Self {
        Self {
            main: base,
            elements: base.saturating_mul(2),
            tests: base.saturating_mul(2),
            diagrams: base,
        }
    }
}

impl Default for StageTimeouts {
    fn default() -> Self {
        Self::from_settings(&OutputSettings::default())
    }
}

/// Execute an async operation with a timeout
///
/// Returns a timeout error if the operation doesn't complete within the specified duration.
/// The future is dropped on expiry.
pub async fn with_timeout<T, F>(timeout: Duration, future: F, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => Err(DocumentorError::timeout(operation_name, timeout)),
    }
}

/// Execute an infallible async operation with a timeout
pub async fn with_timeout_map<T, F>(timeout: Duration, future: F, operation_name: &str) -> Result<T>
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => Ok(result),
        Err(_) => Err(DocumentorError::timeout(operation_name, timeout)),
    }
}
