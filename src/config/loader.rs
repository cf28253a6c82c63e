//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (`<config dir>/documentor/config.toml`)
//! 3. Project config (`.documentor/config.toml`)
//! 4. Environment variables (`DOCUMENTOR_*`, `__` separates nesting levels)
//!
//! An explicit file passed with `--config` replaces steps 2 and 3.

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml},
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::types::{DocumentorError, Result};

const APP_NAME: &str = "documentor";
const CONFIG_FILE: &str = "config.toml";
const PROJECT_DIR: &str = ".documentor";
const ENV_PREFIX: &str = "DOCUMENTOR_";

/// Output format for `config show`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigFormat {
    #[default]
    Toml,
    Json,
    Yaml,
}

impl std::str::FromStr for ConfigFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "toml" | "text" => Ok(ConfigFormat::Toml),
            "json" => Ok(ConfigFormat::Json),
            "yaml" | "yml" => Ok(ConfigFormat::Yaml),
            _ => Err(format!(
                "Invalid format '{}'. Valid values: toml, json, yaml",
                s
            )),
        }
    }
}

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        let global = Self::global_config_path();
        Self::load_layered(global.as_deref(), &Self::project_config_path())
    }

    /// Resolution chain with explicit file locations; missing files are skipped.
    pub fn load_layered(global: Option<&Path>, project: &Path) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = global
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(global_path));
        }

        if project.exists() {
            debug!("Loading project config from: {}", project.display());
            figment = figment.merge(Toml::file(project));
        }

        Self::extract(figment.merge(Self::env_provider()))
    }

    /// Load configuration from a specific file (TOML, or JSON by extension)
    /// on top of the defaults and environment.
    pub fn load_from_file(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Err(DocumentorError::not_found(path));
        }

        let figment = Figment::new().merge(Serialized::defaults(Config::default()));
        let figment = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => figment.merge(Json::file(path)),
            _ => figment.merge(Toml::file(path)),
        };
        debug!("Loading config from: {}", path.display());

        Self::extract(figment.merge(Self::env_provider()))
    }

    fn env_provider() -> Env {
        // DOCUMENTOR_OUTPUT__TARGET_COVERAGE -> output.target_coverage
        Env::prefixed(ENV_PREFIX).split("__")
    }

    fn extract(figment: Figment) -> Result<Config> {
        let config: Config = figment
            .extract()
            .map_err(|e| DocumentorError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Global config directory; `XDG_CONFIG_HOME` wins over the platform default
    pub fn global_dir() -> Option<PathBuf> {
        env::var("XDG_CONFIG_HOME")
            .ok()
            .filter(|v| !v.is_empty())
            .map(|p| PathBuf::from(p).join(APP_NAME))
            .or_else(|| {
                ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
            })
    }

    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join(CONFIG_FILE))
    }

    pub fn project_config_path() -> PathBuf {
        PathBuf::from(PROJECT_DIR).join(CONFIG_FILE)
    }

    /// Known config file locations
    pub fn paths() -> Vec<(&'static str, Option<PathBuf>)> {
        vec![
            ("Global", Self::global_config_path()),
            ("Project", Some(Self::project_config_path())),
        ]
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Render a configuration in the requested format
    pub fn render(config: &Config, format: ConfigFormat) -> Result<String> {
        match format {
            ConfigFormat::Toml => toml::to_string_pretty(config)
                .map_err(|e| DocumentorError::Config(e.to_string())),
            ConfigFormat::Json => Ok(serde_json::to_string_pretty(config)?),
            ConfigFormat::Yaml => Ok(serde_yaml::to_string(config)?),
        }
    }

    /// Write the project config template under `root/.documentor/`.
    ///
    /// An existing file is kept unless `force` is set.
    pub fn init_project(root: &Path, force: bool) -> Result<PathBuf> {
        let project_dir = root.join(PROJECT_DIR);
        fs::create_dir_all(&project_dir)?;

        let config_path = project_dir.join(CONFIG_FILE);
        if !config_path.exists() || force {
            fs::write(&config_path, Self::default_project_config())?;
            info!("Created project config: {}", config_path.display());
        } else {
            info!("Project config exists: {}", config_path.display());
        }

        Ok(config_path)
    }

    // =========================================================================
    // Internal
    // =========================================================================

    fn default_project_config() -> &'static str {
        r#"# Documentor Project Configuration
# Overrides the global config. DOCUMENTOR_* environment variables override both
# (use "__" between levels, e.g. DOCUMENTOR_OUTPUT__GENERATE_MERMAID=true).

# Every backend is asked for every element; results are merged.
[[llm_models]]
name = "llama3"
provider = "ollama"
base_url = "http://localhost:11434"
max_tokens = 4096
temperature = 0.7
timeout_seconds = 30
max_retries = 2

# [[llm_models]]
# name = "gpt-4o"
# provider = "openai"
# base_url = "https://api.openai.com"
# api_key = "sk-..."

[output]
output_directory = "docs"
generate_unit_tests = true
generate_mermaid = true
generate_plantuml = false
# Diagram directories default to <output_directory>/diagrams
# mermaid_output_path = "docs/uml"
# plantuml_output_path = "docs/uml"
target_coverage = 0.8
stage_timeout_secs = 180
concurrency = 4
# overwrite | skip | suffix
collision_policy = "overwrite"

[output.mermaid_naming]
prefix = ""
suffix = "_diagram"

[output.plantuml_naming]
prefix = ""
suffix = "_diagram"
extension = "plantuml"

[analysis]
include_private_members = false
supported_languages = ["java", "python"]
max_file_size = 1048576
include_patterns = ["**/*.java", "**/*.py"]
exclude_patterns = ["**/test/**", "**/target/**"]
"#
    }
}
