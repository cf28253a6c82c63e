//! AI Integration Layer
//!
//! Prompt templates, backend wire formats, the HTTP client and the
//! fan-out orchestrator used by documentation generation.

pub mod orchestrator;
pub mod prompt;
pub mod provider;
pub mod timeout;

pub use orchestrator::{BackendResult, MISSING_CONFIG_MESSAGE, ModelOrchestrator, consolidate};
pub use prompt::Purpose;
pub use provider::{
    BackendKind, HttpModelClient, LanguageModelOperations, SharedModelOps,
};
pub use timeout::{StageTimeouts, with_timeout, with_timeout_map};
