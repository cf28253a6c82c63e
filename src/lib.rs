//! Documentor - AI-Assisted Codebase Documentation Generator
//!
//! Analyzes Java and Python source trees and generates Markdown documentation,
//! suggested unit tests and class diagrams by asking one or more language
//! model backends about every extracted class, method and field.
//!
//! ## Core Features
//!
//! - **Dual-Strategy Analysis**: tree-sitter parsing with a regex fallback
//! - **Multi-Backend Fan-out**: every configured model is queried concurrently,
//!   failures are isolated and results consolidated
//! - **Stage Isolation**: documentation, tests and diagrams run in parallel with
//!   independent timeouts; failures are reported, not fatal
//! - **Class Diagrams**: Mermaid and PlantUML with "uses" relationships
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use documentor::{ConfigLoader, DocumentationOrchestrator, HttpModelClient, ModelOrchestrator};
//! use documentor::analyzer::ProjectScanner;
//! use documentor::storage::FsOutputSink;
//!
//! let config = ConfigLoader::load()?;
//! let analysis = ProjectScanner::new()?.scan(&root, &config.analysis).await?;
//! let models = Arc::new(ModelOrchestrator::new(Arc::new(HttpModelClient::new()?)));
//! let sink = Arc::new(FsOutputSink::new(config.output.collision_policy));
//! let docs = DocumentationOrchestrator::new(Arc::new(config), models, sink);
//! let output_dir = docs.generate_documentation(&analysis).await?;
//! ```
//!
//! ## Modules
//!
//! - [`analyzer`]: file scanning, tree-sitter parsers, fallback extraction
//! - [`ai`]: model backends, prompts, fan-out and consolidation
//! - [`docs`]: documentation stages and the output layout
//! - [`diagram`]: class filtering, relationship graph, Mermaid/PlantUML
//! - [`storage`]: output sink with collision handling
//! - [`config`]: layered configuration

pub mod ai;
pub mod analyzer;
pub mod cli;
pub mod config;
pub mod constants;
pub mod diagram;
pub mod docs;
pub mod storage;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{CollisionPolicy, Config, ConfigLoader, ModelBackendConfig, OutputSettings};

// Error Types
pub use types::error::{DocumentorError, ErrorCategory, Result};

// Analysis
pub use analyzer::{LanguageAnalyzer, ProjectScanner};
pub use types::{CodeElement, ElementKind, GenerationOutcome, ProjectAnalysis};

// =============================================================================
// Generation Re-exports
// =============================================================================

pub use ai::{
    HttpModelClient, LanguageModelOperations, ModelOrchestrator, Purpose, consolidate,
    with_timeout,
};
pub use diagram::{DiagramBuilder, DiagramFormat};
pub use docs::DocumentationOrchestrator;
pub use storage::{FileOutputSink, FsOutputSink};
