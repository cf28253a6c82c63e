//! Prompt templates for element-level generation.
//!
//! Each purpose has one template. The element is described by its
//! [`CodeElement::analysis_context`] block.

use std::fmt;

use crate::types::CodeElement;

/// What a model call is asked to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Purpose {
    Documentation,
    UsageExamples,
    UnitTests,
}

impl Purpose {
    /// Label used in per-backend diagnostics
    pub fn label(&self) -> &'static str {
        match self {
            Purpose::Documentation => "documentation",
            Purpose::UsageExamples => "usage examples",
            Purpose::UnitTests => "unit tests",
        }
    }

    /// Label used when no backend is configured
    pub fn generation_label(&self) -> &'static str {
        match self {
            Purpose::Documentation => "documentation",
            Purpose::UsageExamples => "example",
            Purpose::UnitTests => "unit test",
        }
    }

    pub fn prompt(&self, element: &CodeElement) -> String {
        let kind = element.kind().description().to_lowercase();
        let context = element.analysis_context();
        match self {
            Purpose::Documentation => format!(
                "Analyze and document this {}:\n\n{}\n\nProvide: description, parameters, return value, usage notes.",
                kind, context
            ),
            Purpose::UsageExamples => format!(
                "Generate practical usage examples for this {}:\n\n{}\n\nProvide: 2-3 examples with sample data, expected outputs, use cases.",
                kind, context
            ),
            Purpose::UnitTests => format!(
                "Generate comprehensive unit tests for this {}:\n\n{}\n\nProvide: normal cases, edge cases, error handling tests.",
                kind, context
            ),
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ElementKind;

    fn method() -> CodeElement {
        CodeElement::new(
            ElementKind::Method,
            "place",
            "Shop.place",
            "Shop.java",
            3,
            "public Order place(Customer c)",
        )
        .with_parameters(vec!["Customer c".to_string()])
    }

    #[test]
    fn test_documentation_prompt() {
        let prompt = Purpose::Documentation.prompt(&method());
        assert!(prompt.starts_with("Analyze and document this method/function:\n\n"));
        assert!(prompt.contains("Signature: public Order place(Customer c)"));
        assert!(prompt.contains("Parameters: Customer c"));
        assert!(prompt.ends_with("Provide: description, parameters, return value, usage notes."));
    }

    #[test]
    fn test_other_prompts() {
        assert!(
            Purpose::UsageExamples
                .prompt(&method())
                .starts_with("Generate practical usage examples for this method/function:")
        );
        assert!(
            Purpose::UnitTests
                .prompt(&method())
                .ends_with("Provide: normal cases, edge cases, error handling tests.")
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(Purpose::UsageExamples.label(), "usage examples");
        assert_eq!(Purpose::UsageExamples.generation_label(), "example");
        assert_eq!(Purpose::UnitTests.generation_label(), "unit test");
    }
}
