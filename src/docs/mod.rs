//! Documentation Generation
//!
//! Runs four independent stages concurrently and merges their outcomes
//! into the output directory:
//!
//! | Stage                  | Output                          | Timeout |
//! |------------------------|---------------------------------|---------|
//! | main documentation     | `README.md`                     | base    |
//! | element documentation  | `elements/*.md`                 | 2x base |
//! | unit tests             | `tests/unit-tests.md`           | 2x base |
//! | diagrams               | `diagrams/*` or per-format dir  | base    |
//!
//! A failed or timed-out stage is reported in `README.md`; only failing to
//! create the output directory or to write `README.md` aborts the run.

pub mod element_doc;
pub mod main_doc;
pub mod test_doc;

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::ai::{ModelOrchestrator, StageTimeouts, with_timeout, with_timeout_map};
use crate::config::Config;
use crate::constants::output::{MAIN_DOC, TIMESTAMP_FORMAT};
use crate::diagram::{DiagramBuilder, DiagramFormat};
use crate::storage::SharedSink;
use crate::types::{DocumentorError, GenerationOutcome, ProjectAnalysis, Result};

pub const MAIN_STAGE: &str = "main documentation";
pub const ELEMENT_STAGE: &str = "element documentation";
pub const TEST_STAGE: &str = "unit tests";
pub const DIAGRAM_STAGE: &str = "diagrams";

/// Shared collaborators for every stage
pub struct GenerationContext {
    pub config: Arc<Config>,
    pub models: Arc<ModelOrchestrator>,
    pub sink: SharedSink,
}

pub struct DocumentationOrchestrator {
    ctx: GenerationContext,
    diagrams: DiagramBuilder,
    timeouts: StageTimeouts,
}

impl DocumentationOrchestrator {
    pub fn new(config: Arc<Config>, models: Arc<ModelOrchestrator>, sink: SharedSink) -> Self {
        let diagrams = DiagramBuilder::new(sink.clone()).with_naming(
            config.output.mermaid_naming.clone(),
            config.output.plantuml_naming.clone(),
        );
        let timeouts = StageTimeouts::from_settings(&config.output);
        Self {
            ctx: GenerationContext {
                config,
                models,
                sink,
            },
            diagrams,
            timeouts,
        }
    }

    pub fn with_timeouts(mut self, timeouts: StageTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Generate every artifact and return the output directory.
    #[instrument(skip_all, fields(project = %analysis.project_name(), elements = analysis.elements().len()))]
    pub async fn generate_documentation(&self, analysis: &ProjectAnalysis) -> Result<PathBuf> {
        let output_dir = self.ctx.config.output.output_directory.clone();
        self.ctx.sink.ensure_dir(&output_dir).await?;

        let (main, elements, tests, diagrams) = tokio::join!(
            self.main_stage(analysis),
            self.element_stage(analysis),
            self.test_stage(analysis),
            self.diagram_stage(analysis),
        );

        let others = [elements, tests, diagrams];
        for outcome in std::iter::once(&main).chain(&others) {
            if outcome.succeeded {
                info!("Stage '{}' completed", outcome.stage);
            } else {
                warn!(
                    "Stage '{}' failed: {}",
                    outcome.stage,
                    outcome.diagnostic.as_deref().unwrap_or_default()
                );
            }
        }

        let readme = main_doc::compose(&main, &others);
        self.ctx.sink.write(&output_dir.join(MAIN_DOC), &readme).await?;

        info!("Documentation written to {}", output_dir.display());
        Ok(output_dir)
    }

    async fn main_stage(&self, analysis: &ProjectAnalysis) -> GenerationOutcome {
        let generated_on = Utc::now().format(TIMESTAMP_FORMAT).to_string();
        let result = with_timeout_map(
            self.timeouts.main,
            async { main_doc::render(analysis, &generated_on) },
            MAIN_STAGE,
        )
        .await;
        GenerationOutcome::from_result(MAIN_STAGE, result)
    }

    async fn element_stage(&self, analysis: &ProjectAnalysis) -> GenerationOutcome {
        if analysis.is_empty() {
            return GenerationOutcome::skipped(ELEMENT_STAGE, "no code elements");
        }
        let result = with_timeout(
            self.timeouts.elements,
            element_doc::generate(&self.ctx, analysis),
            ELEMENT_STAGE,
        )
        .await;
        GenerationOutcome::from_result(ELEMENT_STAGE, result)
    }

    async fn test_stage(&self, analysis: &ProjectAnalysis) -> GenerationOutcome {
        if !self.ctx.config.output.generate_unit_tests {
            return GenerationOutcome::skipped(TEST_STAGE, "disabled by configuration");
        }
        let result = with_timeout(
            self.timeouts.tests,
            test_doc::generate(&self.ctx, analysis),
            TEST_STAGE,
        )
        .await;
        GenerationOutcome::from_result(TEST_STAGE, result)
    }

    async fn diagram_stage(&self, analysis: &ProjectAnalysis) -> GenerationOutcome {
        let formats = DiagramFormat::enabled(&self.ctx.config.output);
        if formats.is_empty() {
            return GenerationOutcome::skipped(DIAGRAM_STAGE, "no diagram format enabled");
        }
        let settings = &self.ctx.config.output;

        let result = with_timeout(
            self.timeouts.diagrams,
            async {
                let mut total = 0;
                let mut errors = Vec::new();
                for format in formats {
                    let dir = format.output_dir(settings);
                    match self.diagrams.build_diagrams(analysis, &dir, format).await {
                        Ok(paths) => total += paths.len(),
                        Err(e) => errors.push(format!("{}: {}", format, e)),
                    }
                }
                if errors.is_empty() {
                    Ok(format!("{} diagrams written", total))
                } else {
                    Err(DocumentorError::Diagram(errors.join("; ")))
                }
            },
            DIAGRAM_STAGE,
        )
        .await;
        GenerationOutcome::from_result(DIAGRAM_STAGE, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::LanguageModelOperations;
    use crate::ai::provider::SharedModelOps;
    use crate::config::{ModelBackendConfig, OutputSettings};
    use crate::storage::{FileOutputSink, FsOutputSink};
    use crate::types::{CodeElement, ElementKind};
    use async_trait::async_trait;
    use serde_json::Value;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tempfile::TempDir;

    /// Echoes the prompt's first line; counts unit-test prompts
    #[derive(Default)]
    struct EchoOps {
        calls: AtomicUsize,
        test_calls: AtomicUsize,
        delay: Option<Duration>,
    }

    #[async_trait]
    impl LanguageModelOperations for EchoOps {
        async fn invoke(
            &self,
            _backend: &ModelBackendConfig,
            _endpoint: &str,
            payload: &Value,
        ) -> crate::types::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let prompt = payload["prompt"].as_str().unwrap_or_default();
            if prompt.starts_with("Generate comprehensive unit tests") {
                self.test_calls.fetch_add(1, Ordering::SeqCst);
            }
            let first_line = prompt.lines().next().unwrap_or_default();
            Ok(serde_json::json!({ "response": format!("AI: {}", first_line) }).to_string())
        }
    }

    struct FailingReadmeSink {
        inner: FsOutputSink,
    }

    #[async_trait]
    impl FileOutputSink for FailingReadmeSink {
        async fn write(&self, path: &Path, content: &str) -> crate::types::Result<PathBuf> {
            if path.ends_with(MAIN_DOC) {
                return Err(DocumentorError::Output("read-only".to_string()));
            }
            self.inner.write(path, content).await
        }

        async fn ensure_dir(&self, path: &Path) -> crate::types::Result<()> {
            self.inner.ensure_dir(path).await
        }
    }

    fn config(out: &Path, output: OutputSettings) -> Arc<Config> {
        Arc::new(Config {
            llm_models: vec![ModelBackendConfig::new("llama3")],
            output: OutputSettings {
                output_directory: out.to_path_buf(),
                ..output
            },
            ..Config::default()
        })
    }

    fn orchestrator(config: Arc<Config>, ops: SharedModelOps) -> DocumentationOrchestrator {
        DocumentationOrchestrator::new(
            config,
            Arc::new(ModelOrchestrator::new(ops)),
            Arc::new(FsOutputSink::default()),
        )
    }

    fn analysis(root: &Path) -> ProjectAnalysis {
        ProjectAnalysis::new(
            root,
            vec![
                CodeElement::new(ElementKind::Class, "Cart", "shop.Cart", "Cart.java", 1, "public class Cart"),
                CodeElement::new(ElementKind::Field, "total", "shop.Cart.total", "Cart.java", 2, "protected int total"),
                CodeElement::new(ElementKind::Method, "add", "shop.Cart.add", "Cart.java", 3, "public void add(Item item)"),
                CodeElement::new(ElementKind::Class, "Item", "shop.Item", "Item.java", 1, "public class Item"),
            ],
        )
    }

    #[tokio::test]
    async fn test_full_generation() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("docs");
        let ops = Arc::new(EchoOps::default());
        let settings = OutputSettings {
            generate_mermaid: true,
            generate_plantuml: true,
            ..OutputSettings::default()
        };
        let docs = orchestrator(config(&out, settings), ops.clone());

        let result = docs.generate_documentation(&analysis(dir.path())).await.unwrap();

        assert_eq!(result, out);
        let readme = std::fs::read_to_string(out.join("README.md")).unwrap();
        assert!(readme.contains("- Code Documentation"));
        assert!(!readme.contains("Error Generating Documentation"));

        let cart = std::fs::read_to_string(out.join("elements/class-Cart.md")).unwrap();
        assert!(cart.contains("AI: Analyze and document this class/interface:"));
        assert!(cart.contains("AI: Generate practical usage examples for this method/function:"));
        assert!(out.join("elements/class-Item.md").exists());

        let tests = std::fs::read_to_string(out.join("tests/unit-tests.md")).unwrap();
        assert!(tests.contains("Target Coverage: 80%"));
        assert!(tests.contains("AI: Generate comprehensive unit tests for this method/function:"));

        assert!(out.join("diagrams/Cart_diagram.md").exists());
        assert!(out.join("diagrams/Cart_diagram.plantuml").exists());

        // 4 elements x 2 purposes, plus 3 non-field unit-test calls
        assert_eq!(ops.calls.load(Ordering::SeqCst), 11);
        assert_eq!(ops.test_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_unit_tests_disabled() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("docs");
        let ops = Arc::new(EchoOps::default());
        let settings = OutputSettings {
            generate_unit_tests: false,
            ..OutputSettings::default()
        };
        let docs = orchestrator(config(&out, settings), ops.clone());

        docs.generate_documentation(&analysis(dir.path())).await.unwrap();

        assert!(!out.join("tests").exists());
        assert_eq!(ops.test_calls.load(Ordering::SeqCst), 0);
        assert!(!out.join("diagrams").exists());
    }

    #[tokio::test]
    async fn test_empty_analysis() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("docs");
        let ops = Arc::new(EchoOps::default());
        let docs = orchestrator(config(&out, OutputSettings::default()), ops.clone());

        docs.generate_documentation(&ProjectAnalysis::new(dir.path(), vec![]))
            .await
            .unwrap();

        let readme = std::fs::read_to_string(out.join("README.md")).unwrap();
        assert!(readme.contains("0 total elements"));
        assert!(!out.join("elements").exists());
        assert_eq!(ops.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_stage_timeout_reported_in_readme() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("docs");
        let ops = Arc::new(EchoOps {
            delay: Some(Duration::from_secs(5)),
            ..EchoOps::default()
        });
        let docs = orchestrator(config(&out, OutputSettings::default()), ops)
            .with_timeouts(StageTimeouts::uniform(Duration::from_millis(50)));

        docs.generate_documentation(&analysis(dir.path())).await.unwrap();

        let readme = std::fs::read_to_string(out.join("README.md")).unwrap();
        assert!(readme.contains("# "));
        assert!(readme.contains("## Error Generating Documentation"));
        assert!(readme.contains("- **element documentation**: Timeout after"));
        assert!(readme.contains("- **unit tests**: Timeout after"));
        assert!(!out.join("elements/class-Cart.md").exists());
    }

    #[tokio::test]
    async fn test_readme_write_failure_is_fatal() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("docs");
        let docs = DocumentationOrchestrator::new(
            config(&out, OutputSettings::default()),
            Arc::new(ModelOrchestrator::new(Arc::new(EchoOps::default()))),
            Arc::new(FailingReadmeSink {
                inner: FsOutputSink::default(),
            }),
        );

        let result = docs.generate_documentation(&analysis(dir.path())).await;
        assert!(matches!(result, Err(DocumentorError::Output(_))));
    }

    #[tokio::test]
    async fn test_diagrams_in_custom_directories() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("docs");
        let mermaid_dir = dir.path().join("uml/mermaid");
        let settings = OutputSettings {
            generate_mermaid: true,
            generate_plantuml: true,
            mermaid_output_path: Some(mermaid_dir.clone()),
            ..OutputSettings::default()
        };
        let docs = orchestrator(config(&out, settings), Arc::new(EchoOps::default()));

        docs.generate_documentation(&analysis(dir.path())).await.unwrap();

        assert!(mermaid_dir.join("Cart_diagram.md").exists());
        assert!(!out.join("diagrams/Cart_diagram.md").exists());
        assert!(out.join("diagrams/Cart_diagram.plantuml").exists());
    }
}
