//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (`~/.config/documentor/`) and project (`.documentor/`) level configuration.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use crate::constants::{analysis, backend, diagram, output};
use crate::diagram::naming;
use crate::types::{DocumentorError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Active model backends; every backend is invoked for every request
    pub llm_models: Vec<ModelBackendConfig>,

    /// Documentation output settings
    pub output: OutputSettings,

    /// Source analysis settings
    pub analysis: AnalysisSettings,
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `DocumentorError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for model in &self.llm_models {
            model.validate()?;
            if !names.insert(model.name.as_str()) {
                return Err(DocumentorError::Config(format!(
                    "Duplicate model backend name: {}",
                    model.name
                )));
            }
        }

        self.output.validate()?;
        self.analysis.validate()?;
        Ok(())
    }
}

// =============================================================================
// Model Backends
// =============================================================================

/// One configured model endpoint
///
/// Note: API keys are never serialized to output and are redacted in debug
/// output. The HTTP client converts the key to `SecretString` per request.
#[derive(Clone, Serialize, Deserialize)]
pub struct ModelBackendConfig {
    /// Model name sent to the backend (e.g. "llama3", "gpt-4o")
    pub name: String,

    /// Provider hint: "ollama", "openai", or anything else for a generic endpoint
    #[serde(default)]
    pub provider: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Never serialized to output for security
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature (0.0 - 2.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Retries for rate-limited or transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Extra top-level payload fields (e.g. `top_p`), never overriding built-ins
    #[serde(default)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl std::fmt::Debug for ModelBackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelBackendConfig")
            .field("name", &self.name)
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("max_retries", &self.max_retries)
            .field("extra", &self.extra)
            .finish()
    }
}

fn default_base_url() -> String {
    backend::DEFAULT_BASE_URL.to_string()
}

fn default_max_tokens() -> u32 {
    backend::DEFAULT_MAX_TOKENS
}

fn default_temperature() -> f32 {
    backend::DEFAULT_TEMPERATURE
}

fn default_timeout_seconds() -> u64 {
    backend::DEFAULT_TIMEOUT_SECS
}

fn default_max_retries() -> usize {
    backend::DEFAULT_MAX_RETRIES
}

impl ModelBackendConfig {
    /// Backend with default connection settings
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            provider: String::new(),
            base_url: default_base_url(),
            api_key: None,
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_seconds: default_timeout_seconds(),
            max_retries: default_max_retries(),
            extra: BTreeMap::new(),
        }
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(DocumentorError::Config(
                "Model backend name must not be empty".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(DocumentorError::Config(format!(
                "Temperature for {} must be between 0.0 and 2.0, got {}",
                self.name, self.temperature
            )));
        }
        if self.timeout_seconds == 0 {
            return Err(DocumentorError::Config(format!(
                "timeout_seconds for {} must be greater than 0",
                self.name
            )));
        }
        if self.max_tokens == 0 {
            return Err(DocumentorError::Config(format!(
                "max_tokens for {} must be greater than 0",
                self.name
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Output Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Directory receiving all generated artifacts
    pub output_directory: PathBuf,

    /// Generate `tests/unit-tests.md`
    pub generate_unit_tests: bool,

    pub generate_mermaid: bool,

    pub generate_plantuml: bool,

    pub mermaid_naming: DiagramNaming,

    pub plantuml_naming: DiagramNaming,

    /// Mermaid diagram directory; `<output_directory>/diagrams` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mermaid_output_path: Option<PathBuf>,

    /// PlantUML diagram directory; `<output_directory>/diagrams` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plantuml_output_path: Option<PathBuf>,

    /// Coverage goal quoted in the generated test document (0.0 - 1.0)
    pub target_coverage: f64,

    /// Per-stage timeout in seconds; element and test stages get twice this
    pub stage_timeout_secs: u64,

    /// Element-level model calls in flight per stage
    pub concurrency: usize,

    /// What to do when an artifact already exists
    pub collision_policy: CollisionPolicy,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            output_directory: PathBuf::from(output::DEFAULT_OUTPUT_DIR),
            generate_unit_tests: true,
            generate_mermaid: false,
            generate_plantuml: false,
            mermaid_naming: DiagramNaming::default(),
            plantuml_naming: DiagramNaming::default(),
            mermaid_output_path: None,
            plantuml_output_path: None,
            target_coverage: output::DEFAULT_TARGET_COVERAGE,
            stage_timeout_secs: output::DEFAULT_STAGE_TIMEOUT_SECS,
            concurrency: output::DEFAULT_CONCURRENCY,
            collision_policy: CollisionPolicy::default(),
        }
    }
}

impl OutputSettings {
    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.target_coverage) {
            return Err(DocumentorError::Config(format!(
                "target_coverage must be between 0.0 and 1.0, got {}",
                self.target_coverage
            )));
        }
        if self.stage_timeout_secs == 0 {
            return Err(DocumentorError::Config(
                "stage_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.concurrency == 0 {
            return Err(DocumentorError::Config(
                "concurrency must be greater than 0".to_string(),
            ));
        }
        self.mermaid_naming.validate()?;
        self.plantuml_naming.validate()?;
        Ok(())
    }
}

/// Behavior when a target file already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Replace the existing file
    #[default]
    Overwrite,
    /// Keep the existing file and report its path
    Skip,
    /// Write to `name_1.ext`, `name_2.ext`, ...
    Suffix,
}

impl std::fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollisionPolicy::Overwrite => write!(f, "overwrite"),
            CollisionPolicy::Skip => write!(f, "skip"),
            CollisionPolicy::Suffix => write!(f, "suffix"),
        }
    }
}

/// File naming for one diagram format: `<prefix><class><suffix>.<extension>`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramNaming {
    pub prefix: String,
    /// `None` selects the default `_diagram` suffix
    pub suffix: Option<String>,
    /// `None` selects the format's default extension
    pub extension: Option<String>,
}

impl DiagramNaming {
    pub fn suffix_or_default(&self) -> &str {
        self.suffix.as_deref().unwrap_or(diagram::DEFAULT_SUFFIX)
    }

    pub fn extension_or<'a>(&'a self, default: &'a str) -> &'a str {
        match self.extension.as_deref() {
            Some(ext) if !ext.is_empty() => ext,
            _ => default,
        }
    }

    pub fn validate(&self) -> Result<()> {
        naming::validate_affix("prefix", &self.prefix)?;
        if let Some(suffix) = &self.suffix {
            naming::validate_affix("suffix", suffix)?;
        }
        if let Some(extension) = &self.extension {
            naming::validate_extension(extension)?;
        }
        Ok(())
    }
}

// =============================================================================
// Analysis Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Keep private members in the analysis
    pub include_private_members: bool,

    /// Worker threads for file analysis (defaults to available parallelism)
    pub max_threads: Option<usize>,

    /// Languages to analyze ("java", "python")
    pub supported_languages: Vec<String>,

    /// Files larger than this (bytes) are skipped
    pub max_file_size: u64,

    /// When non-empty, a file must match at least one of these globs
    pub include_patterns: Vec<String>,

    /// Files matching any of these globs are skipped
    pub exclude_patterns: Vec<String>,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            include_private_members: false,
            max_threads: None,
            supported_languages: to_strings(analysis::DEFAULT_LANGUAGES),
            max_file_size: analysis::DEFAULT_MAX_FILE_SIZE,
            include_patterns: to_strings(analysis::DEFAULT_INCLUDE),
            exclude_patterns: to_strings(analysis::DEFAULT_EXCLUDE),
        }
    }
}

impl AnalysisSettings {
    fn validate(&self) -> Result<()> {
        if self.max_threads == Some(0) {
            return Err(DocumentorError::Config(
                "max_threads must be greater than 0".to_string(),
            ));
        }
        for lang in &self.supported_languages {
            lang.parse::<crate::analyzer::parser::Language>()
                .map_err(DocumentorError::Config)?;
        }
        for pattern in self.include_patterns.iter().chain(&self.exclude_patterns) {
            glob::Pattern::new(pattern).map_err(|e| {
                DocumentorError::Config(format!("Invalid glob pattern '{}': {}", pattern, e))
            })?;
        }
        Ok(())
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}
