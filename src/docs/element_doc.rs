//! Per-class documents under `elements/`
//!
//! Each class gets one file holding its own documentation plus that of its
//! direct fields and methods. Members without a class are collected in
//! `standalone-methods.md` and `standalone-fields.md`.

use std::collections::HashSet;

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::ai::Purpose;
use crate::analyzer::parser::detect_language_or_text;
use crate::constants::output::ELEMENTS_DIR;
use crate::diagram::naming::sanitize_identifier;
use crate::types::{CodeElement, DocumentorError, ElementKind, ProjectAnalysis, Result};

use super::GenerationContext;

/// `class-<Name>.md`
pub fn class_file_name(class_name: &str) -> String {
    format!("class-{}.md", sanitize_identifier(class_name))
}

/// One output file's worth of elements
#[derive(Debug)]
pub struct ElementGroup<'a> {
    pub class: Option<&'a CodeElement>,
    pub fields: Vec<&'a CodeElement>,
    pub methods: Vec<&'a CodeElement>,
    pub file_name: String,
}

impl<'a> ElementGroup<'a> {
    fn elements(&self) -> impl Iterator<Item = &'a CodeElement> + '_ {
        self.class
            .into_iter()
            .chain(self.fields.iter().copied())
            .chain(self.methods.iter().copied())
    }
}

/// Classes with their direct members, then the standalone groups
pub fn group_by_class(analysis: &ProjectAnalysis) -> Vec<ElementGroup<'_>> {
    let mut attached = HashSet::new();
    let mut groups = Vec::new();

    for class in analysis.classes() {
        let members: Vec<&CodeElement> = analysis
            .elements()
            .iter()
            .filter(|e| e.is_member_of(class))
            .collect();
        attached.extend(members.iter().map(|m| m.id()));
        let (fields, methods) = members
            .into_iter()
            .partition(|e| e.kind() == ElementKind::Field);
        groups.push(ElementGroup {
            class: Some(class),
            fields,
            methods,
            file_name: class_file_name(class.name()),
        });
    }

    let standalone = |kind: ElementKind| -> Vec<&CodeElement> {
        analysis
            .of_kind(kind)
            .filter(|e| !attached.contains(&e.id()))
            .collect()
    };
    let methods = standalone(ElementKind::Method);
    let fields = standalone(ElementKind::Field);

    if !methods.is_empty() {
        groups.push(ElementGroup {
            class: None,
            fields: Vec::new(),
            methods,
            file_name: "standalone-methods.md".to_string(),
        });
    }
    if !fields.is_empty() {
        groups.push(ElementGroup {
            class: None,
            fields,
            methods: Vec::new(),
            file_name: "standalone-fields.md".to_string(),
        });
    }
    groups
}

/// Documentation and usage examples for one element
#[derive(Debug, Clone, Default)]
struct ElementTexts {
    documentation: String,
    examples: String,
}

/// Generate and write every element document; returns a short summary.
pub async fn generate(ctx: &GenerationContext, analysis: &ProjectAnalysis) -> Result<String> {
    let groups = group_by_class(analysis);
    let elements: Vec<&CodeElement> = groups.iter().flat_map(|g| g.elements()).collect();

    let requests: Vec<(usize, Purpose)> = (0..elements.len())
        .flat_map(|i| [(i, Purpose::Documentation), (i, Purpose::UsageExamples)])
        .collect();
    debug!(
        "Generating element documentation: {} groups, {} model requests",
        groups.len(),
        requests.len()
    );

    let backends = Some(ctx.config.llm_models.as_slice());
    let responses: Vec<(usize, Purpose, String)> = stream::iter(requests)
        .map(|(i, purpose)| {
            let element = elements[i];
            async move {
                let text = ctx.models.generate(backends, element, purpose).await;
                (i, purpose, text)
            }
        })
        .buffer_unordered(ctx.config.output.concurrency.max(1))
        .collect()
        .await;

    let mut texts = vec![ElementTexts::default(); elements.len()];
    for (i, purpose, text) in responses {
        match purpose {
            Purpose::Documentation => texts[i].documentation = text,
            _ => texts[i].examples = text,
        }
    }

    let output_dir = ctx.config.output.output_directory.join(ELEMENTS_DIR);
    let mut offset = 0;
    let mut written = 0;
    let mut failures = Vec::new();

    for group in &groups {
        let count = group.elements().count();
        let content = render_group(group, &texts[offset..offset + count]);
        offset += count;

        let path = output_dir.join(&group.file_name);
        match ctx.sink.write(&path, &content).await {
            Ok(_) => written += 1,
            Err(e) => {
                warn!("Failed to write {}: {}", group.file_name, e);
                failures.push(format!("{}: {}", group.file_name, e));
            }
        }
    }

    if !failures.is_empty() {
        return Err(DocumentorError::Output(format!(
            "{} of {} element documents failed ({})",
            failures.len(),
            groups.len(),
            failures.join("; ")
        )));
    }
    Ok(format!("{} element documents written", written))
}

/// `texts` follows `group.elements()` order
fn render_group(group: &ElementGroup<'_>, texts: &[ElementTexts]) -> String {
    let mut content = String::new();
    let mut texts = texts.iter();

    match group.class {
        Some(class) => {
            let class_texts = texts.next().cloned().unwrap_or_default();
            append_class_header(&mut content, class, &class_texts, group);
        }
        None => {
            let title = if group.methods.is_empty() {
                "Standalone Fields"
            } else {
                "Standalone Methods"
            };
            content.push_str(&format!("# {}\n\n", title));
            content.push_str("Elements that are not declared inside a class.\n\n---\n\n");
        }
    }

    let field_texts: Vec<&ElementTexts> = texts.by_ref().take(group.fields.len()).collect();
    let method_texts: Vec<&ElementTexts> = texts.collect();

    append_members(&mut content, "Fields", &group.fields, &field_texts);
    append_members(&mut content, "Methods", &group.methods, &method_texts);
    content
}

fn append_class_header(
    content: &mut String,
    class: &CodeElement,
    texts: &ElementTexts,
    group: &ElementGroup<'_>,
) {
    content.push_str(&format!("# {} {}\n\n", class.kind().icon(), class.name()));
    let package = class.owner_name().unwrap_or("(default package)");
    content.push_str(&format!("> **Package:** `{}`\n\n---\n\n", package));

    content.push_str("## Class Documentation\n\n");
    content.push_str(&format!("{}\n\n---\n\n", texts.documentation.trim()));

    content.push_str("## Class Usage Examples\n\n");
    content.push_str(&format!("{}\n\n---\n\n", texts.examples.trim()));

    content.push_str("## Class Signature\n\n");
    content.push_str(&fenced(class));

    if group.fields.is_empty() && group.methods.is_empty() {
        return;
    }
    content.push_str("## Table of Contents\n\n");
    for member in group.fields.iter().chain(&group.methods) {
        content.push_str(&format!(
            "- [{} {}](#{})\n",
            member.kind().icon(),
            member.name(),
            anchor(member.name())
        ));
    }
    content.push_str("\n---\n\n");
}

fn append_members(
    content: &mut String,
    title: &str,
    members: &[&CodeElement],
    texts: &[&ElementTexts],
) {
    if members.is_empty() {
        return;
    }
    content.push_str(&format!("## {}\n\n", title));
    for (member, text) in members.iter().zip(texts) {
        content.push_str(&format!("### {}\n\n", member.name()));
        content.push_str(&format!("**Documentation:**\n\n{}\n\n", text.documentation.trim()));
        content.push_str(&format!("**Usage Examples:**\n\n{}\n\n", text.examples.trim()));
        content.push_str("**Signature:**\n\n");
        content.push_str(&fenced(member));
        content.push_str("---\n\n");
    }
}

fn fenced(element: &CodeElement) -> String {
    format!(
        "```{}\n{}\n```\n\n",
        detect_language_or_text(element.file_path()),
        element.signature()
    )
}

/// GitHub-style heading anchor
fn anchor(name: &str) -> String {
    name.chars()
        .filter_map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                Some(c.to_ascii_lowercase())
            } else if c.is_whitespace() {
                Some('-')
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ProjectAnalysis {
        ProjectAnalysis::new(
            "/p",
            vec![
                CodeElement::new(ElementKind::Class, "Cart", "shop.Cart", "Cart.java", 1, "public class Cart"),
                CodeElement::new(ElementKind::Field, "items", "shop.Cart.items", "Cart.java", 2, "protected List<Item> items"),
                CodeElement::new(ElementKind::Method, "add", "shop.Cart.add", "Cart.java", 3, "public void add(Item item)"),
                CodeElement::new(ElementKind::Method, "main", "main", "run.py", 1, "def main():"),
                CodeElement::new(ElementKind::Field, "DEBUG", "DEBUG", "run.py", 5, "DEBUG = False"),
            ],
        )
    }

    #[test]
    fn test_group_by_class() {
        let analysis = sample();
        let groups = group_by_class(&analysis);
        let files: Vec<_> = groups.iter().map(|g| g.file_name.as_str()).collect();
        assert_eq!(
            files,
            ["class-Cart.md", "standalone-methods.md", "standalone-fields.md"]
        );
        assert_eq!(groups[0].fields.len(), 1);
        assert_eq!(groups[0].methods[0].name(), "add");
        assert_eq!(groups[1].methods[0].name(), "main");
        assert_eq!(groups[2].fields[0].name(), "DEBUG");
    }

    #[test]
    fn test_render_class_group_order() {
        let analysis = sample();
        let groups = group_by_class(&analysis);
        let texts: Vec<ElementTexts> = ["cart", "items", "add"]
            .iter()
            .map(|n| ElementTexts {
                documentation: format!("{} docs", n),
                examples: format!("{} examples", n),
            })
            .collect();

        let content = render_group(&groups[0], &texts);

        let positions: Vec<usize> = [
            "# 🏛️ Cart",
            "> **Package:** `shop`",
            "cart docs",
            "cart examples",
            "```java\npublic class Cart\n```",
            "## Table of Contents",
            "- [📊 items](#items)",
            "## Fields",
            "items docs",
            "## Methods",
            "add examples",
            "```java\npublic void add(Item item)\n```",
        ]
        .iter()
        .map(|needle| content.find(needle).unwrap_or_else(|| panic!("missing {needle}")))
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_render_standalone() {
        let analysis = sample();
        let groups = group_by_class(&analysis);
        let texts = vec![ElementTexts::default()];
        let content = render_group(&groups[1], &texts);
        assert!(content.starts_with("# Standalone Methods\n"));
        assert!(content.contains("```python\ndef main():\n```"));
        assert!(!content.contains("## Fields"));
    }

    #[test]
    fn test_class_file_name() {
        assert_eq!(class_file_name("Cart"), "class-Cart.md");
        assert_eq!(class_file_name("Box$Entry"), "class-Box_Entry.md");
    }

    #[test]
    fn test_anchor() {
        assert_eq!(anchor("getName"), "getname");
        assert_eq!(anchor("__init__"), "__init__");
    }
}
