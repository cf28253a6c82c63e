//! Language Detection Module
//!
//! **Single source of truth** for language detection across the codebase.
//!
//! ```rust,ignore
//! use documentor::analyzer::parser::Language;
//!
//! let lang = Language::from_path("src/App.java");
//! assert_eq!(lang, Language::Java);
//! assert_eq!(lang.highlight_str(), "java");
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// =============================================================================
// Language Metadata Table
// =============================================================================

struct LanguageMeta {
    /// Display name (human-readable)
    display_name: &'static str,
    /// Syntax highlighting identifier (for markdown code fences)
    highlight_str: &'static str,
    extensions: &'static [&'static str],
    /// Alternative names accepted in configuration
    aliases: &'static [&'static str],
}

macro_rules! lang_meta {
    ($display:literal, $highlight:literal, [$($ext:literal),*], [$($alias:literal),*]) => {
        LanguageMeta {
            display_name: $display,
            highlight_str: $highlight,
            extensions: &[$($ext),*],
            aliases: &[$($alias),*],
        }
    };
}

impl Language {
    fn meta(&self) -> LanguageMeta {
        match self {
            Language::Java => lang_meta!("Java", "java", ["java"], ["java"]),
            Language::Python => lang_meta!("Python", "python", ["py", "pyi", "pyw"], ["python", "py"]),
            Language::Unknown => lang_meta!("Unknown", "text", [], ["unknown", "text"]),
        }
    }
}

/// Languages with an analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Java,
    Python,
    #[default]
    Unknown,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        self.meta().display_name
    }

    /// Identifier for ```lang code fences
    pub fn highlight_str(&self) -> &'static str {
        self.meta().highlight_str
    }

    pub fn from_extension(ext: &str) -> Self {
        let ext_lower = ext.to_lowercase();
        Self::all_variants()
            .iter()
            .copied()
            .find(|lang| lang.meta().extensions.contains(&ext_lower.as_str()))
            .unwrap_or(Language::Unknown)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(Language::Unknown)
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Language::Unknown)
    }

    fn all_variants() -> &'static [Language] {
        &[Language::Java, Language::Python]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s_lower = s.trim().to_lowercase();
        Self::all_variants()
            .iter()
            .copied()
            .find(|lang| lang.meta().aliases.contains(&s_lower.as_str()))
            .ok_or_else(|| format!("Unsupported language: {}. Supported: java, python", s))
    }
}

/// Highlight identifier for a path, `"text"` when unknown
pub fn detect_language_or_text<P: AsRef<Path>>(path: P) -> &'static str {
    Language::from_path(path).highlight_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(Language::from_extension("java"), Language::Java);
        assert_eq!(Language::from_extension("PY"), Language::Python);
        assert_eq!(Language::from_extension("pyi"), Language::Python);
        assert_eq!(Language::from_extension("rs"), Language::Unknown);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Language::from_path("src/App.java"), Language::Java);
        assert_eq!(Language::from_path("pkg/mod.py"), Language::Python);
        assert_eq!(Language::from_path("Makefile"), Language::Unknown);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Java".parse::<Language>(), Ok(Language::Java));
        assert_eq!("py".parse::<Language>(), Ok(Language::Python));
        assert!("cobol".parse::<Language>().is_err());
    }

    #[test]
    fn test_highlight() {
        assert_eq!(detect_language_or_text("a/B.java"), "java");
        assert_eq!(detect_language_or_text("notes.txt"), "text");
    }
}
