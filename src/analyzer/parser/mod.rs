//! Language Parser Module
//!
//! Tree-sitter based parsers that turn one source file into [`CodeElement`]s.
//!
//! ## Parser Factory
//!
//! Use `create_parser` to create a parser for a given language:
//!
//! ```rust,ignore
//! use documentor::analyzer::parser::{Language, create_parser};
//!
//! let parser = create_parser(Language::Java)?;
//! let elements = parser.parse("App.java", content)?;
//! ```
//!
//! [`CodeElement`]: crate::types::CodeElement

pub mod java;
pub mod language;
pub mod python;
pub mod traits;

pub use java::JavaParser;
pub use language::{Language, detect_language_or_text};
pub use python::PythonParser;
pub use traits::{
    Parser, children_of_kind, collapse_whitespace, create_ts_parser, execute_query,
    get_node_text, node_line, parse_clean_tree, text_without,
};

use crate::types::{DocumentorError, Result};

/// Create a parser for the given language.
///
/// Returns an error if the language has no structural parser.
pub fn create_parser(language: Language) -> Result<Box<dyn Parser>> {
    match language {
        Language::Java => Ok(Box::new(JavaParser::new()?)),
        Language::Python => Ok(Box::new(PythonParser::new()?)),
        Language::Unknown => Err(DocumentorError::Parse {
            message: format!("No parser available for language: {}", language),
            path: String::new(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_parser() {
        assert_eq!(create_parser(Language::Java).unwrap().language(), Language::Java);
        assert_eq!(
            create_parser(Language::Python).unwrap().language(),
            Language::Python
        );
        assert!(create_parser(Language::Unknown).is_err());
    }
}
