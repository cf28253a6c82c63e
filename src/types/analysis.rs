//! Project Analysis Snapshot
//!
//! Built once per scan and never mutated afterwards; every grouping is derived
//! on access.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::element::{CodeElement, ElementKind};

#[derive(Debug, Clone, Serialize)]
pub struct ProjectAnalysis {
    project_path: PathBuf,
    elements: Vec<CodeElement>,
    timestamp: DateTime<Utc>,
}

impl ProjectAnalysis {
    /// Build a snapshot. Elements with an empty name are dropped.
    pub fn new(project_path: impl Into<PathBuf>, elements: Vec<CodeElement>) -> Self {
        Self {
            project_path: project_path.into(),
            elements: elements
                .into_iter()
                .filter(|e| !e.name().trim().is_empty())
                .collect(),
            timestamp: Utc::now(),
        }
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }

    /// Final path component, used as the project title
    pub fn project_name(&self) -> String {
        self.project_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.project_path.display().to_string())
    }

    pub fn elements(&self) -> &[CodeElement] {
        &self.elements
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn of_kind(&self, kind: ElementKind) -> impl Iterator<Item = &CodeElement> {
        self.elements.iter().filter(move |e| e.kind() == kind)
    }

    pub fn classes(&self) -> impl Iterator<Item = &CodeElement> {
        self.of_kind(ElementKind::Class)
    }

    pub fn methods(&self) -> impl Iterator<Item = &CodeElement> {
        self.of_kind(ElementKind::Method)
    }

    pub fn fields(&self) -> impl Iterator<Item = &CodeElement> {
        self.of_kind(ElementKind::Field)
    }

    pub fn elements_by_file(&self) -> BTreeMap<&str, Vec<&CodeElement>> {
        let mut grouped: BTreeMap<&str, Vec<&CodeElement>> = BTreeMap::new();
        for element in &self.elements {
            grouped.entry(element.file_path()).or_default().push(element);
        }
        grouped
    }

    pub fn elements_by_kind(&self) -> BTreeMap<ElementKind, Vec<&CodeElement>> {
        let mut grouped: BTreeMap<ElementKind, Vec<&CodeElement>> = BTreeMap::new();
        for element in &self.elements {
            grouped.entry(element.kind()).or_default().push(element);
        }
        grouped
    }

    pub fn stats(&self) -> AnalysisStats {
        AnalysisStats {
            total: self.elements.len(),
            classes: self.classes().count(),
            methods: self.methods().count(),
            fields: self.fields().count(),
            files: self.elements_by_file().len(),
        }
    }
}

/// Element counts for one analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AnalysisStats {
    pub total: usize,
    pub classes: usize,
    pub methods: usize,
    pub fields: usize,
    pub files: usize,
}

impl fmt::Display for AnalysisStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Analysis Summary: {} total elements ({} classes, {} methods, {} fields) across {} files",
            self.total, self.classes, self.methods, self.fields, self.files
        )
    }
}
