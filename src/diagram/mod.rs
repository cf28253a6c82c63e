//! Class Diagrams
//!
//! Builds one diagram file per eligible (non-private) class.
//!
//! ## Pipeline
//!
//! 1. **Filter**: eligible classes with their direct, non-private members
//! 2. **Relate**: "uses" edges from member signatures and parameters
//! 3. **Render**: Mermaid (markdown) or PlantUML text
//! 4. **Write**: through the output sink; a failed write skips that class only

pub mod filter;
pub mod graph;
pub mod mermaid;
pub mod naming;
pub mod plantuml;

pub use filter::{ClassView, eligible_classes};
pub use graph::RelationshipGraph;

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use crate::config::{DiagramNaming, OutputSettings};
use crate::constants::{diagram, output, output::TIMESTAMP_FORMAT};
use crate::storage::SharedSink;
use crate::types::{ProjectAnalysis, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagramFormat {
    Mermaid,
    PlantUml,
}

impl DiagramFormat {
    pub fn default_extension(&self) -> &'static str {
        match self {
            DiagramFormat::Mermaid => diagram::MERMAID_EXTENSION,
            DiagramFormat::PlantUml => diagram::PLANTUML_EXTENSION,
        }
    }

    /// Formats switched on in the output settings
    pub fn enabled(settings: &OutputSettings) -> Vec<DiagramFormat> {
        let mut formats = Vec::new();
        if settings.generate_mermaid {
            formats.push(DiagramFormat::Mermaid);
        }
        if settings.generate_plantuml {
            formats.push(DiagramFormat::PlantUml);
        }
        formats
    }

    /// Directory receiving this format's diagrams
    pub fn output_dir(&self, settings: &OutputSettings) -> PathBuf {
        let custom = match self {
            DiagramFormat::Mermaid => settings.mermaid_output_path.as_ref(),
            DiagramFormat::PlantUml => settings.plantuml_output_path.as_ref(),
        };
        custom
            .cloned()
            .unwrap_or_else(|| settings.output_directory.join(output::DIAGRAMS_DIR))
    }
}

impl fmt::Display for DiagramFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagramFormat::Mermaid => write!(f, "mermaid"),
            DiagramFormat::PlantUml => write!(f, "plantuml"),
        }
    }
}

/// Renders and writes class diagrams
#[derive(Clone)]
pub struct DiagramBuilder {
    sink: SharedSink,
    mermaid_naming: DiagramNaming,
    plantuml_naming: DiagramNaming,
}

impl DiagramBuilder {
    pub fn new(sink: SharedSink) -> Self {
        Self {
            sink,
            mermaid_naming: DiagramNaming::default(),
            plantuml_naming: DiagramNaming::default(),
        }
    }

    pub fn with_naming(mut self, mermaid: DiagramNaming, plantuml: DiagramNaming) -> Self {
        self.mermaid_naming = mermaid;
        self.plantuml_naming = plantuml;
        self
    }

    fn naming(&self, format: DiagramFormat) -> &DiagramNaming {
        match format {
            DiagramFormat::Mermaid => &self.mermaid_naming,
            DiagramFormat::PlantUml => &self.plantuml_naming,
        }
    }

    /// Write one diagram per eligible class and return the paths written.
    #[instrument(skip_all, fields(format = %format, dir = %output_dir.display()))]
    pub async fn build_diagrams(
        &self,
        analysis: &ProjectAnalysis,
        output_dir: &Path,
        format: DiagramFormat,
    ) -> Result<Vec<PathBuf>> {
        let views = eligible_classes(analysis)?;
        if views.is_empty() {
            debug!("No eligible classes for {} diagrams", format);
            return Ok(Vec::new());
        }

        let graph = RelationshipGraph::build(&views);
        debug!(
            "Relationship graph: {} classes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        self.sink.ensure_dir(output_dir).await?;
        let generated_on = Utc::now().format(TIMESTAMP_FORMAT).to_string();
        let naming = self.naming(format);

        let mut written = Vec::with_capacity(views.len());
        for view in &views {
            let content = match format {
                DiagramFormat::Mermaid => mermaid::render(view, &graph, &generated_on),
                DiagramFormat::PlantUml => plantuml::render(view, &graph),
            };
            let file_name =
                naming::file_name(view.class.name(), naming, format.default_extension());

            match self.sink.write(&output_dir.join(&file_name), &content).await {
                Ok(path) => written.push(path),
                Err(e) => warn!("Skipping {} diagram for {}: {}", format, view.class.name(), e),
            }
        }

        info!("Generated {} {} diagrams", written.len(), format);
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileOutputSink, FsOutputSink};
    use crate::types::{CodeElement, DocumentorError, ElementKind, is_public};
    use async_trait::async_trait;
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Rejects writes whose file name matches `reject`
    struct RejectingSink {
        inner: FsOutputSink,
        reject: &'static str,
    }

    #[async_trait]
    impl FileOutputSink for RejectingSink {
        async fn write(&self, path: &Path, content: &str) -> Result<PathBuf> {
            if path.ends_with(self.reject) {
                return Err(DocumentorError::Output("disk full".to_string()));
            }
            self.inner.write(path, content).await
        }

        async fn ensure_dir(&self, path: &Path) -> Result<()> {
            self.inner.ensure_dir(path).await
        }
    }

    fn builder() -> DiagramBuilder {
        DiagramBuilder::new(Arc::new(FsOutputSink::default()))
    }

    fn analysis() -> ProjectAnalysis {
        ProjectAnalysis::new(
            "/repo",
            vec![
                CodeElement::new(ElementKind::Class, "Account", "bank.Account", "Account.java", 3, "public class Account"),
                CodeElement::new(ElementKind::Method, "audit", "bank.Account.audit", "Account.java", 5, "private void audit()"),
                CodeElement::new(ElementKind::Method, "deposit", "bank.Account.deposit", "Account.java", 9, "public void deposit(Ledger ledger)")
                    .with_parameters(vec!["Ledger ledger".to_string()]),
                CodeElement::new(ElementKind::Class, "Ledger", "bank.Ledger", "Ledger.java", 1, "public class Ledger"),
            ],
        )
    }

    #[tokio::test]
    async fn test_one_file_per_class() {
        let dir = TempDir::new().unwrap();
        let paths = builder()
            .build_diagrams(&analysis(), dir.path(), DiagramFormat::Mermaid)
            .await
            .unwrap();

        assert_eq!(
            paths,
            [dir.path().join("Account_diagram.md"), dir.path().join("Ledger_diagram.md")]
        );
        let account = std::fs::read_to_string(&paths[0]).unwrap();
        assert!(account.contains("class Account {"));
        assert!(account.contains("Account --> Ledger : uses"));
        assert!(!account.contains("audit"));
    }

    #[tokio::test]
    async fn test_public_class_private_method() {
        let dir = TempDir::new().unwrap();
        let analysis = ProjectAnalysis::new(
            "/repo",
            vec![
                CodeElement::new(ElementKind::Class, "Widget", "Widget", "Widget.java", 1, "public class Widget"),
                CodeElement::new(ElementKind::Method, "m", "Widget.m", "Widget.java", 2, "private void m()"),
            ],
        );
        assert!(!is_public("private void m()"));

        let paths = builder()
            .build_diagrams(&analysis, dir.path(), DiagramFormat::PlantUml)
            .await
            .unwrap();

        assert_eq!(paths, [dir.path().join("Widget_diagram.plantuml")]);
        let text = std::fs::read_to_string(&paths[0]).unwrap();
        assert!(text.contains("class Widget {"));
        assert!(!text.contains("m()"));
    }

    #[tokio::test]
    async fn test_custom_naming() {
        let dir = TempDir::new().unwrap();
        let naming = DiagramNaming {
            prefix: "uml_".to_string(),
            suffix: Some(String::new()),
            extension: Some("puml".to_string()),
        };
        let paths = builder()
            .with_naming(DiagramNaming::default(), naming)
            .build_diagrams(&analysis(), dir.path(), DiagramFormat::PlantUml)
            .await
            .unwrap();
        assert!(paths.contains(&dir.path().join("uml_Account.puml")));
    }

    #[tokio::test]
    async fn test_no_classes_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("diagrams");
        let paths = builder()
            .build_diagrams(&ProjectAnalysis::new("/repo", vec![]), &out, DiagramFormat::Mermaid)
            .await
            .unwrap();
        assert!(paths.is_empty());
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn test_inconsistent_classes_fail() {
        let dir = TempDir::new().unwrap();
        let analysis = ProjectAnalysis::new(
            "/repo",
            vec![CodeElement::new(ElementKind::Class, "Ghost", "", "Ghost.java", 1, "public class Ghost")],
        );
        let result = builder()
            .build_diagrams(&analysis, dir.path(), DiagramFormat::Mermaid)
            .await;
        assert!(matches!(result, Err(DocumentorError::Diagram(_))));
    }

    #[test]
    fn test_enabled_formats() {
        let settings = OutputSettings {
            generate_mermaid: true,
            generate_plantuml: true,
            ..OutputSettings::default()
        };
        assert_eq!(
            DiagramFormat::enabled(&settings),
            [DiagramFormat::Mermaid, DiagramFormat::PlantUml]
        );
        assert!(DiagramFormat::enabled(&OutputSettings::default()).is_empty());
    }

    #[tokio::test]
    async fn test_write_failure_skips_class() {
        let dir = TempDir::new().unwrap();
        let sink = RejectingSink {
            inner: FsOutputSink::default(),
            reject: "Account_diagram.md",
        };
        let paths = DiagramBuilder::new(Arc::new(sink))
            .build_diagrams(&analysis(), dir.path(), DiagramFormat::Mermaid)
            .await
            .unwrap();

        assert_eq!(paths, [dir.path().join("Ledger_diagram.md")]);
        assert!(!dir.path().join("Account_diagram.md").exists());
    }

    #[test]
    fn test_output_dir_per_format() {
        let settings = OutputSettings {
            output_directory: PathBuf::from("site"),
            plantuml_output_path: Some(PathBuf::from("uml")),
            ..OutputSettings::default()
        };
        assert_eq!(
            DiagramFormat::Mermaid.output_dir(&settings),
            PathBuf::from("site/diagrams")
        );
        assert_eq!(DiagramFormat::PlantUml.output_dir(&settings), PathBuf::from("uml"));
    }
}
