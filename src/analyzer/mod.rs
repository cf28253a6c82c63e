//! Code Analyzer Module
//!
//! Turns source files into [`CodeElement`]s:
//! - Structural parsing (tree-sitter) as the primary strategy
//! - Line-oriented pattern matching as the fallback
//! - Concurrent project scanning with gitignore support

pub mod fallback;
pub mod parser;
pub mod scanner;

pub use fallback::FallbackExtractor;
pub use scanner::{FileScanner, ProjectScanner};

use std::path::Path;

use tracing::{debug, warn};

use crate::types::{CodeElement, Result};
use parser::{Language, Parser, create_parser};

/// Two-tier analyzer for every supported language
pub struct LanguageAnalyzer {
    parsers: Vec<Box<dyn Parser>>,
    fallback: FallbackExtractor,
}

impl LanguageAnalyzer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            parsers: vec![
                create_parser(Language::Java)?,
                create_parser(Language::Python)?,
            ],
            fallback: FallbackExtractor::new()?,
        })
    }

    /// Read and analyze one file. Read failures yield no elements.
    pub fn analyze(&self, path: &Path) -> Vec<CodeElement> {
        match std::fs::read_to_string(path) {
            Ok(content) => self.analyze_source(&path.to_string_lossy(), &content),
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                Vec::new()
            }
        }
    }

    /// Analyze in-memory source.
    ///
    /// The fallback runs whenever the structural parser fails or finds nothing.
    pub fn analyze_source(&self, path: &str, content: &str) -> Vec<CodeElement> {
        let language = Language::from_path(path);
        let Some(parser) = self.parser_for(language) else {
            debug!("No analyzer for {}", path);
            return Vec::new();
        };

        match parser.parse(path, content) {
            Ok(elements) if !elements.is_empty() => elements,
            Ok(_) => {
                debug!("{}: parser found no elements, trying patterns", path);
                self.fallback.extract(path, content)
            }
            Err(e) => {
                debug!("{}, falling back to pattern extraction", e);
                self.fallback.extract(path, content)
            }
        }
    }

    fn parser_for(&self, language: Language) -> Option<&dyn Parser> {
        self.parsers
            .iter()
            .find(|p| p.language() == language)
            .map(|p| p.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_primary_strategy() {
        let analyzer = LanguageAnalyzer::new().unwrap();
        let elements = analyzer.analyze_source("app/App.java", "public class App { void run() {} }");
        let names: Vec<&str> = elements.iter().map(|e| e.qualified_name()).collect();
        assert_eq!(names, ["App", "App.run"]);
    }

    #[test]
    fn test_fallback_on_parse_error() {
        let analyzer = LanguageAnalyzer::new().unwrap();
        let source = "public class Broken {\n    public void ok() {\n    }\n    void bad( {\n}\n";
        let elements = analyzer.analyze_source("Broken.java", source);
        assert!(elements.iter().any(|e| e.qualified_name() == "Broken"));
        assert!(elements.iter().any(|e| e.qualified_name() == "Broken.ok"));
    }

    #[test]
    fn test_fallback_after_empty_class_body() {
        let analyzer = LanguageAnalyzer::new().unwrap();
        let source = "public class Marker {}\n\npublic class Service {\n    public void run() {\n    }\n    void bad( {\n}\n";
        let elements = analyzer.analyze_source("Service.java", source);
        let names: Vec<&str> = elements.iter().map(|e| e.qualified_name()).collect();

        assert!(names.contains(&"Marker"));
        assert!(names.contains(&"Service"));
        assert!(names.contains(&"Service.run"));
        assert!(!names.contains(&"Marker.run"));
    }

    #[test]
    fn test_empty_and_unknown() {
        let analyzer = LanguageAnalyzer::new().unwrap();
        assert!(analyzer.analyze_source("empty.py", "").is_empty());
        assert!(analyzer.analyze_source("notes.txt", "class A:").is_empty());
    }

    #[test]
    fn test_analyze_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mod.py");
        fs::write(&path, "def run():\n    pass\n").unwrap();

        let analyzer = LanguageAnalyzer::new().unwrap();
        let elements = analyzer.analyze(&path);
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].file_path(), path.to_string_lossy());

        assert!(analyzer.analyze(&dir.path().join("missing.py")).is_empty());
    }
}
