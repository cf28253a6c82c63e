//! PlantUML class diagram

use super::filter::ClassView;
use super::graph::{RelationshipGraph, contains_word};
use super::naming::{sanitize_identifier, shorten, strip_generics, strip_qualifiers};
use crate::types::{CodeElement, ElementKind};

/// Words that precede a declared type without being one
const MODIFIERS: &[&str] = &[
    "public",
    "private",
    "protected",
    "static",
    "final",
    "abstract",
    "synchronized",
    "native",
    "transient",
    "volatile",
    "strictfp",
    "default",
    "sealed",
    "non-sealed",
    "def",
    "async",
];

pub fn render(view: &ClassView<'_>, graph: &RelationshipGraph) -> String {
    let name = view.class.name();
    let id = sanitize_identifier(name);

    let mut out = String::new();
    out.push_str(&format!("@startuml {}\n", name));
    out.push_str("!theme plain\n");
    out.push_str(&format!("title {} Class Diagram\n\n", name));

    out.push_str(&format!("{} {} {{\n", class_keyword(view.class), id));
    for field in &view.fields {
        out.push_str(&format!(
            "  {} {} {}\n",
            field.visibility().uml_symbol(),
            member_type(field),
            field.name()
        ));
    }
    if !view.fields.is_empty() && !view.methods.is_empty() {
        out.push_str("  --\n");
    }
    for method in &view.methods {
        out.push_str(&format!(
            "  {} {} {}({})\n",
            method.visibility().uml_symbol(),
            member_type(method),
            method.name(),
            shorten(&method.parameters().join(", "))
        ));
    }
    out.push_str("}\n\n");

    for target in graph.uses_of(view.class.qualified_name()) {
        out.push_str(&format!("{} ..> {} : uses\n", id, sanitize_identifier(target)));
    }

    out.push_str("\n@enduml\n");
    out
}

/// `interface`, `abstract class`, `enum` or `class`
pub fn class_keyword(class: &CodeElement) -> &'static str {
    let signature = class.signature().to_lowercase();
    if contains_word(&signature, "interface") {
        "interface"
    } else if contains_word(&signature, "abstract") {
        "abstract class"
    } else if contains_word(&signature, "enum") {
        "enum"
    } else {
        "class"
    }
}

/// Declared type of a field, or return type of a method
pub fn member_type(member: &CodeElement) -> String {
    let fallback = match member.kind() {
        ElementKind::Method => "void",
        _ => "Object",
    };
    let signature = member.signature();

    // Python annotations: `def f() -> T:` and `name: T = value`
    if let Some((_, ret)) = signature.rsplit_once("->") {
        let ret = ret.trim().trim_end_matches(':').trim();
        return simplify_type(ret).unwrap_or_else(|| fallback.to_string());
    }
    if let Some(annotated) = signature
        .strip_prefix(member.name())
        .and_then(|rest| rest.trim_start().strip_prefix(':'))
    {
        let ty = annotated.split('=').next().unwrap_or_default();
        return simplify_type(ty).unwrap_or_else(|| fallback.to_string());
    }

    // Java: the last non-modifier word before the member name
    let head = signature.split('(').next().unwrap_or_default();
    let head = strip_qualifiers(&strip_generics(head));
    let words: Vec<&str> = head.split_whitespace().collect();
    let Some(name_pos) = words.iter().rposition(|w| *w == member.name()) else {
        return fallback.to_string();
    };
    words[..name_pos]
        .iter()
        .rev()
        .find(|w| !w.starts_with('@') && !MODIFIERS.contains(w))
        .map(|w| w.to_string())
        .unwrap_or_else(|| fallback.to_string())
}

fn simplify_type(text: &str) -> Option<String> {
    let simplified = strip_qualifiers(&strip_generics(text));
    let simplified = simplified.split_whitespace().collect::<Vec<_>>().join(" ");
    (!simplified.is_empty()).then_some(simplified)
}
