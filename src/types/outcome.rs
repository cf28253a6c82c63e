//! Uniform stage result so the documentation orchestrator applies one fallback policy.

use crate::types::DocumentorError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutcome {
    /// Stage that produced this outcome
    pub stage: String,
    pub content: String,
    pub succeeded: bool,
    pub diagnostic: Option<String>,
}

impl GenerationOutcome {
    pub fn success(stage: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            content: content.into(),
            succeeded: true,
            diagnostic: None,
        }
    }

    /// Successful no-op (stage disabled or nothing to do)
    pub fn skipped(stage: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            content: String::new(),
            succeeded: true,
            diagnostic: Some(reason.into()),
        }
    }

    pub fn failure(stage: impl Into<String>, diagnostic: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            content: String::new(),
            succeeded: false,
            diagnostic: Some(diagnostic.into()),
        }
    }

    /// Fold a stage result into an outcome
    pub fn from_result(
        stage: impl Into<String>,
        result: std::result::Result<String, DocumentorError>,
    ) -> Self {
        match result {
            Ok(content) => Self::success(stage, content),
            Err(e) => Self::failure(stage, e.to_string()),
        }
    }
}
