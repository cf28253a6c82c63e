pub mod analysis;
pub mod element;
pub mod error;
pub mod outcome;

pub use analysis::{AnalysisStats, ProjectAnalysis};
pub use element::{CodeElement, ElementKind, Visibility, is_public};
pub use error::{DocumentorError, ErrorCategory, ErrorClassifier, LlmError, Result};
pub use outcome::GenerationOutcome;
