//! Project overview document (`README.md`)

use std::path::Path;

use crate::constants::output::{ELEMENTS_DIR, QUICK_LINK_LIMIT};
use crate::types::{GenerationOutcome, ProjectAnalysis};

use super::element_doc::class_file_name;

pub fn render(analysis: &ProjectAnalysis, generated_on: &str) -> String {
    let mut doc = String::new();

    doc.push_str(&format!(
        "# {} - Code Documentation\n\n",
        analysis.project_name()
    ));
    doc.push_str(&format!("Generated on: {}\n\n", generated_on));
    doc.push_str(
        "This documentation was automatically generated using AI-powered code analysis.\n\n",
    );

    append_statistics(&mut doc, analysis);
    append_api_reference(&mut doc, analysis);
    append_quick_links(&mut doc, analysis);

    doc
}

fn append_statistics(doc: &mut String, analysis: &ProjectAnalysis) {
    let stats = analysis.stats();
    doc.push_str("## Project Statistics\n\n");
    doc.push_str(&format!("{}\n\n", stats));
    doc.push_str("| Element Type | Count |\n");
    doc.push_str("|--------------|-------|\n");
    doc.push_str(&format!("| Classes | {} |\n", stats.classes));
    doc.push_str(&format!("| Methods | {} |\n", stats.methods));
    doc.push_str(&format!("| Fields | {} |\n", stats.fields));
    doc.push_str(&format!("| Files | {} |\n\n", stats.files));
}

fn append_api_reference(doc: &mut String, analysis: &ProjectAnalysis) {
    doc.push_str("## API Reference\n\n");
    if analysis.is_empty() {
        doc.push_str("*No code elements found.*\n\n");
        return;
    }

    for (file, elements) in analysis.elements_by_file() {
        doc.push_str(&format!(
            "### {}\n\n",
            display_path(analysis.project_path(), file)
        ));

        let mut kinds: Vec<_> = elements.iter().map(|e| e.kind()).collect();
        kinds.sort();
        kinds.dedup();

        for kind in kinds {
            doc.push_str(&format!("#### {} {}\n\n", kind.icon(), kind.description()));
            for element in elements.iter().filter(|e| e.kind() == kind) {
                doc.push_str(&format!(
                    "- **{}** - `{}`\n",
                    element.name(),
                    element.signature()
                ));
            }
            doc.push('\n');
        }
    }
}

fn append_quick_links(doc: &mut String, analysis: &ProjectAnalysis) {
    doc.push_str("## Usage Examples\n\n");
    doc.push_str(
        "Detailed usage examples can be found in the individual element documentation files.\n\n",
    );

    let classes: Vec<_> = analysis.classes().take(QUICK_LINK_LIMIT).collect();
    if classes.is_empty() {
        return;
    }
    doc.push_str("### Quick Links\n\n");
    for class in classes {
        doc.push_str(&format!(
            "- [{}]({}/{})\n",
            class.name(),
            ELEMENTS_DIR,
            class_file_name(class.name())
        ));
    }
    doc.push('\n');
}

/// Path relative to the project root when possible
fn display_path(root: &Path, file: &str) -> String {
    Path::new(file)
        .strip_prefix(root)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| file.to_string())
}

/// README content after all stages finished.
///
/// Failed stages are listed under an error section; a failed main stage
/// replaces the overview entirely.
pub fn compose(main: &GenerationOutcome, others: &[GenerationOutcome]) -> String {
    let failures: Vec<&GenerationOutcome> = others.iter().filter(|o| !o.succeeded).collect();

    let mut doc = if main.succeeded {
        let mut doc = main.content.clone();
        if !failures.is_empty() {
            if !doc.ends_with('\n') {
                doc.push('\n');
            }
            doc.push_str("\n## Error Generating Documentation\n\n");
        }
        doc
    } else {
        let mut doc = String::from("# Error Generating Documentation\n\n");
        doc.push_str(&format!(
            "There was an error generating the main documentation: {}\n",
            diagnostic_of(main)
        ));
        if !failures.is_empty() {
            doc.push('\n');
        }
        doc
    };

    for failure in failures {
        doc.push_str(&format!("- **{}**: {}\n", failure.stage, diagnostic_of(failure)));
    }
    doc
}

fn diagnostic_of(outcome: &GenerationOutcome) -> &str {
    outcome.diagnostic.as_deref().unwrap_or("unknown error")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CodeElement, ElementKind};

    fn analysis() -> ProjectAnalysis {
        ProjectAnalysis::new(
            "/work/shop",
            vec![
                CodeElement::new(ElementKind::Class, "Cart", "Cart", "/work/shop/src/Cart.java", 1, "public class Cart"),
                CodeElement::new(ElementKind::Method, "add", "Cart.add", "/work/shop/src/Cart.java", 3, "public void add(Item item)"),
                CodeElement::new(ElementKind::Field, "MAX", "MAX", "/work/shop/util.py", 1, "MAX = 10"),
            ],
        )
    }

    #[test]
    fn test_render_sections() {
        let doc = render(&analysis(), "2026-01-01 10:00:00");

        assert!(doc.starts_with("# shop - Code Documentation\n\nGenerated on: 2026-01-01 10:00:00\n"));
        assert!(doc.contains(
            "Analysis Summary: 3 total elements (1 classes, 1 methods, 1 fields) across 2 files"
        ));
        assert!(doc.contains("| Classes | 1 |"));
        assert!(doc.contains("### src/Cart.java\n\n#### 🏛️ Class/Interface\n\n- **Cart** - `public class Cart`\n"));
        assert!(doc.contains("#### ⚙️ Method/Function\n\n- **add** - `public void add(Item item)`\n"));
        assert!(doc.contains("### util.py\n"));
        assert!(doc.contains("### Quick Links\n\n- [Cart](elements/class-Cart.md)\n"));
    }

    #[test]
    fn test_render_empty_project() {
        let doc = render(&ProjectAnalysis::new("/work/empty", vec![]), "now");
        assert!(doc.contains("Analysis Summary: 0 total elements"));
        assert!(doc.contains("*No code elements found.*"));
        assert!(!doc.contains("Quick Links"));
    }

    #[test]
    fn test_quick_links_limited() {
        let classes = (0..8)
            .map(|i| {
                CodeElement::new(ElementKind::Class, format!("C{}", i), format!("C{}", i), "A.java", i + 1, "class C")
            })
            .collect();
        let doc = render(&ProjectAnalysis::new("/p", classes), "now");
        assert_eq!(doc.matches("](elements/class-").count(), QUICK_LINK_LIMIT);
    }

    #[test]
    fn test_compose_appends_failures() {
        let main = GenerationOutcome::success("main documentation", "# shop\n");
        let others = [
            GenerationOutcome::success("element documentation", "ok"),
            GenerationOutcome::failure("diagrams", "Timeout after 1s: diagrams"),
        ];
        let doc = compose(&main, &others);
        assert_eq!(
            doc,
            "# shop\n\n## Error Generating Documentation\n\n- **diagrams**: Timeout after 1s: diagrams\n"
        );
    }

    #[test]
    fn test_compose_all_succeeded() {
        let main = GenerationOutcome::success("main documentation", "# shop\n");
        let others = [GenerationOutcome::skipped("unit tests", "disabled")];
        assert_eq!(compose(&main, &others), "# shop\n");
    }

    #[test]
    fn test_compose_main_failed() {
        let main = GenerationOutcome::failure("main documentation", "boom");
        let others = [GenerationOutcome::failure("unit tests", "down")];
        assert_eq!(
            compose(&main, &others),
            "# Error Generating Documentation\n\nThere was an error generating the main documentation: boom\n\n- **unit tests**: down\n"
        );
    }
}
