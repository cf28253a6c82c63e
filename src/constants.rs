//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Model backend defaults
pub mod backend {
    /// Default Ollama port
    pub const DEFAULT_OLLAMA_PORT: u16 = 11434;

    /// Default base URL when a backend omits one
    pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

    /// Default maximum tokens to generate
    pub const DEFAULT_MAX_TOKENS: u32 = 4096;

    /// Default request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Default sampling temperature
    pub const DEFAULT_TEMPERATURE: f32 = 0.7;

    /// Default retry attempts for retryable HTTP failures
    pub const DEFAULT_MAX_RETRIES: usize = 2;

    /// Base delay for exponential backoff (milliseconds)
    pub const BASE_DELAY_MS: u64 = 500;

    /// Maximum delay between retries (seconds)
    pub const MAX_DELAY_SECS: u64 = 10;
}

/// Source analysis constants
pub mod analysis {
    /// Default maximum file size for analysis (1MB)
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 1_048_576;

    /// Languages analyzed when the configuration does not narrow them
    pub const DEFAULT_LANGUAGES: &[&str] = &["java", "python"];

    /// Default inclusion globs
    pub const DEFAULT_INCLUDE: &[&str] = &["**/*.java", "**/*.py"];

    /// Default exclusion globs
    pub const DEFAULT_EXCLUDE: &[&str] = &["**/test/**", "**/target/**"];
}

/// Diagram rendering constants
pub mod diagram {
    /// Character budget for one member line in a diagram body
    pub const MAX_SIGNATURE_LENGTH: usize = 50;

    /// Ellipsis appended to truncated member text
    pub const TRUNCATION_SUFFIX: &str = "...";

    /// Maximum length of a naming prefix or suffix
    pub const MAX_AFFIX_LENGTH: usize = 20;

    /// Maximum length of a file extension
    pub const MAX_EXTENSION_LENGTH: usize = 10;

    /// Default file name suffix for both formats
    pub const DEFAULT_SUFFIX: &str = "_diagram";

    /// Default Mermaid file extension (markdown wrapper)
    pub const MERMAID_EXTENSION: &str = "md";

    /// Default PlantUML file extension
    pub const PLANTUML_EXTENSION: &str = "plantuml";
}

/// Documentation output constants
pub mod output {
    /// Default output directory
    pub const DEFAULT_OUTPUT_DIR: &str = "docs";

    /// Main document file name
    pub const MAIN_DOC: &str = "README.md";

    /// Per-element documents directory
    pub const ELEMENTS_DIR: &str = "elements";

    /// Generated tests directory
    pub const TESTS_DIR: &str = "tests";

    /// Generated tests file name
    pub const TESTS_DOC: &str = "unit-tests.md";

    /// Diagrams directory
    pub const DIAGRAMS_DIR: &str = "diagrams";

    /// Default stage timeout (seconds); element and test stages get twice this
    pub const DEFAULT_STAGE_TIMEOUT_SECS: u64 = 180;

    /// Default number of element-level model calls in flight per stage
    pub const DEFAULT_CONCURRENCY: usize = 4;

    /// Default target coverage for generated tests
    pub const DEFAULT_TARGET_COVERAGE: f64 = 0.80;

    /// Number of classes linked from the main document
    pub const QUICK_LINK_LIMIT: usize = 5;

    /// Timestamp layout used in generated documents
    pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
}
