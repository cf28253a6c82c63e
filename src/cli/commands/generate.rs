//! Generate Command
//!
//! Scans a project and writes documentation, unit tests and diagrams.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::ai::{HttpModelClient, ModelOrchestrator};
use crate::analyzer::ProjectScanner;
use crate::cli::Output;
use crate::config::Config;
use crate::constants::backend::{BASE_DELAY_MS, MAX_DELAY_SECS};
use crate::docs::DocumentationOrchestrator;
use crate::storage::FsOutputSink;
use crate::types::Result;

/// Command-line overrides applied on top of the loaded configuration
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub output: Option<PathBuf>,
    pub mermaid: bool,
    pub plantuml: bool,
    pub mermaid_output: Option<PathBuf>,
    pub plantuml_output: Option<PathBuf>,
    pub include_private: bool,
    pub no_tests: bool,
}

impl GenerateOptions {
    /// Flags only switch features on, except `--no-tests`.
    /// A diagram output path implies its format.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(output) = &self.output {
            config.output.output_directory = output.clone();
        }
        if let Some(path) = &self.mermaid_output {
            config.output.mermaid_output_path = Some(path.clone());
            config.output.generate_mermaid = true;
        }
        if let Some(path) = &self.plantuml_output {
            config.output.plantuml_output_path = Some(path.clone());
            config.output.generate_plantuml = true;
        }
        config.output.generate_mermaid |= self.mermaid;
        config.output.generate_plantuml |= self.plantuml;
        config.analysis.include_private_members |= self.include_private;
        if self.no_tests {
            config.output.generate_unit_tests = false;
        }
        config
    }
}

pub async fn run(root: &Path, config: Config, options: &GenerateOptions) -> Result<PathBuf> {
    let out = Output::new();
    let config = options.apply(config);
    config.validate()?;

    if config.llm_models.is_empty() {
        out.warning("No LLM models configured; documents will contain placeholder text");
        out.info("Run 'documentor config init' to create a project config");
    }

    let analysis = ProjectScanner::new()?.scan(root, &config.analysis).await?;
    out.info(&analysis.stats().to_string());

    let client = HttpModelClient::new()?.with_backoff(
        Duration::from_millis(BASE_DELAY_MS),
        Duration::from_secs(MAX_DELAY_SECS),
    );
    let models = Arc::new(ModelOrchestrator::new(Arc::new(client)));
    let sink = Arc::new(FsOutputSink::new(config.output.collision_policy));

    info!(
        "Generating with {} backends into {}",
        config.llm_models.len(),
        config.output.output_directory.display()
    );
    let docs = DocumentationOrchestrator::new(Arc::new(config), models, sink);
    let output_dir = docs.generate_documentation(&analysis).await?;

    out.success(&format!(
        "Documentation generated: {}",
        output_dir.join(crate::constants::output::MAIN_DOC).display()
    ));
    Ok(output_dir)
}
