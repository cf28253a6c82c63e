use std::ops::Range;

use super::{
    Language, Parser, children_of_kind, collapse_whitespace, execute_query, get_node_text,
    node_line, parse_clean_tree, text_without,
};
use crate::types::{CodeElement, ElementKind, Result};

const TYPE_DECLARATIONS: &[&str] = &[
    "class_declaration",
    "interface_declaration",
    "enum_declaration",
    "record_declaration",
    "annotation_type_declaration",
];

pub struct JavaParser;

impl JavaParser {
    pub fn new() -> Result<Self> {
        // Validate that the language is available
        let _ = super::create_ts_parser(tree_sitter_java::LANGUAGE, "Java")?;
        Ok(Self)
    }
}

impl Parser for JavaParser {
    fn parse(&self, path: &str, content: &str) -> Result<Vec<CodeElement>> {
        let tree = parse_clean_tree(tree_sitter_java::LANGUAGE, "Java", path, content)?;
        let root = tree.root_node();

        let ctx = JavaContext {
            path,
            content,
            package: extract_package(root, content),
        };

        let mut elements = Vec::new();
        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            if TYPE_DECLARATIONS.contains(&child.kind()) {
                ctx.visit_type(child, None, &mut elements);
            }
        }

        Ok(elements)
    }

    fn language(&self) -> Language {
        Language::Java
    }
}

fn extract_package(root: tree_sitter::Node, content: &str) -> Option<String> {
    let query_str = r#"
        (package_declaration
            [(scoped_identifier) (identifier)] @package
        )
    "#;

    let mut package = None;
    execute_query(
        &tree_sitter_java::LANGUAGE.into(),
        query_str,
        root,
        content.as_bytes(),
        |_, text| {
            if package.is_none() && !text.is_empty() {
                package = Some(text.to_string());
            }
        },
    );
    package
}

struct JavaContext<'a> {
    path: &'a str,
    content: &'a str,
    package: Option<String>,
}

impl JavaContext<'_> {
    fn text(&self, node: tree_sitter::Node) -> &str {
        get_node_text(node, self.content.as_bytes())
    }

    fn qualify(&self, owner: Option<&str>, name: &str) -> String {
        match (owner, &self.package) {
            (Some(owner), _) => format!("{}.{}", owner, name),
            (None, Some(pkg)) => format!("{}.{}", pkg, name),
            (None, None) => name.to_string(),
        }
    }

    fn visit_type(
        &self,
        node: tree_sitter::Node,
        owner: Option<&str>,
        out: &mut Vec<CodeElement>,
    ) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let name = self.text(name_node).to_string();
        let qualified = self.qualify(owner, &name);
        let body = node.child_by_field_name("body");

        let header_end = body.map(|b| b.start_byte()).unwrap_or(node.end_byte());
        let annotations = self.annotations(node);
        let signature = text_without(
            self.content,
            node.start_byte()..header_end,
            &annotation_ranges(&annotations),
        );

        let mut element = CodeElement::new(
            ElementKind::Class,
            name,
            qualified.clone(),
            self.path,
            node_line(node),
            signature,
        )
        .with_annotations(self.annotation_names(&annotations))
        .with_documentation(self.javadoc(node));

        // Record components behave like constructor parameters
        if node.kind() == "record_declaration"
            && let Some(params) = node.child_by_field_name("parameters")
        {
            element = element.with_parameters(self.parameters(params));
        }
        out.push(element);

        let Some(body) = body else { return };
        self.visit_body(body, &qualified, out);
    }

    fn visit_body(&self, body: tree_sitter::Node, owner: &str, out: &mut Vec<CodeElement>) {
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            match member.kind() {
                "method_declaration" | "constructor_declaration" => {
                    self.visit_method(member, owner, out);
                }
                "field_declaration" | "constant_declaration" => {
                    self.visit_field(member, owner, out);
                }
                // Enum members live one level further down
                "enum_body_declarations" => self.visit_body(member, owner, out),
                kind if TYPE_DECLARATIONS.contains(&kind) => {
                    self.visit_type(member, Some(owner), out);
                }
                _ => {}
            }
        }
    }

    fn visit_method(&self, node: tree_sitter::Node, owner: &str, out: &mut Vec<CodeElement>) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let name = self.text(name_node).to_string();

        let header_end = node
            .child_by_field_name("body")
            .map(|b| b.start_byte())
            .unwrap_or(node.end_byte());
        let annotations = self.annotations(node);
        let signature = text_without(
            self.content,
            node.start_byte()..header_end,
            &annotation_ranges(&annotations),
        );
        let signature = signature.trim_end_matches(';').trim_end().to_string();

        let parameters = node
            .child_by_field_name("parameters")
            .map(|p| self.parameters(p))
            .unwrap_or_default();

        out.push(
            CodeElement::new(
                ElementKind::Method,
                name.clone(),
                format!("{}.{}", owner, name),
                self.path,
                node_line(node),
                signature,
            )
            .with_parameters(parameters)
            .with_annotations(self.annotation_names(&annotations))
            .with_documentation(self.javadoc(node)),
        );
    }

    fn visit_field(&self, node: tree_sitter::Node, owner: &str, out: &mut Vec<CodeElement>) {
        let modifiers = self.modifier_keywords(node);
        let field_type = node
            .child_by_field_name("type")
            .map(|t| collapse_whitespace(self.text(t)))
            .unwrap_or_default();
        let annotations = self.annotations(node);
        let documentation = self.javadoc(node);

        for declarator in children_of_kind(node, "variable_declarator") {
            let Some(name_node) = declarator.child_by_field_name("name") else {
                continue;
            };
            let name = self.text(name_node).to_string();
            let signature = [modifiers.as_str(), field_type.as_str(), name.as_str()]
                .iter()
                .filter(|part| !part.is_empty())
                .copied()
                .collect::<Vec<_>>()
                .join(" ");

            out.push(
                CodeElement::new(
                    ElementKind::Field,
                    name.clone(),
                    format!("{}.{}", owner, name),
                    self.path,
                    node_line(declarator),
                    signature,
                )
                .with_annotations(self.annotation_names(&annotations))
                .with_documentation(documentation.clone()),
            );
        }
    }

    /// `Type name` for each formal parameter
    fn parameters(&self, params: tree_sitter::Node) -> Vec<String> {
        let mut cursor = params.walk();
        params
            .named_children(&mut cursor)
            .filter_map(|param| match param.kind() {
                "formal_parameter" => {
                    let ty = param.child_by_field_name("type").map(|t| self.text(t));
                    let name = param.child_by_field_name("name").map(|n| self.text(n));
                    match (ty, name) {
                        (Some(ty), Some(name)) => {
                            Some(format!("{} {}", collapse_whitespace(ty), name))
                        }
                        _ => Some(collapse_whitespace(self.text(param))),
                    }
                }
                "spread_parameter" => {
                    let skip = annotation_ranges(&self.annotations(param));
                    Some(text_without(
                        self.content,
                        param.start_byte()..param.end_byte(),
                        &skip,
                    ))
                }
                _ => None,
            })
            .collect()
    }

    fn modifiers_node<'t>(&self, node: tree_sitter::Node<'t>) -> Option<tree_sitter::Node<'t>> {
        children_of_kind(node, "modifiers").into_iter().next()
    }

    /// Annotation nodes attached through the `modifiers` child
    fn annotations<'t>(&self, node: tree_sitter::Node<'t>) -> Vec<tree_sitter::Node<'t>> {
        let Some(modifiers) = self.modifiers_node(node) else {
            return Vec::new();
        };
        let mut cursor = modifiers.walk();
        modifiers
            .named_children(&mut cursor)
            .filter(|m| matches!(m.kind(), "marker_annotation" | "annotation"))
            .collect()
    }

    fn annotation_names(&self, annotations: &[tree_sitter::Node]) -> Vec<String> {
        annotations
            .iter()
            .filter_map(|a| a.child_by_field_name("name"))
            .map(|n| format!("@{}", self.text(n)))
            .collect()
    }

    /// Modifier keywords without annotations, e.g. `private static final`
    fn modifier_keywords(&self, node: tree_sitter::Node) -> String {
        let Some(modifiers) = self.modifiers_node(node) else {
            return String::new();
        };
        let skip = annotation_ranges(&self.annotations(node));
        text_without(
            self.content,
            modifiers.start_byte()..modifiers.end_byte(),
            &skip,
        )
    }

    /// Javadoc block immediately preceding a declaration
    fn javadoc(&self, node: tree_sitter::Node) -> String {
        let Some(prev) = node.prev_sibling() else {
            return String::new();
        };
        if prev.kind() != "block_comment" {
            return String::new();
        }
        let text = self.text(prev);
        if !text.starts_with("/**") {
            return String::new();
        }
        clean_javadoc(text)
    }
}

fn annotation_ranges(annotations: &[tree_sitter::Node]) -> Vec<Range<usize>> {
    annotations
        .iter()
        .map(|a| a.start_byte()..a.end_byte())
        .collect()
}

/// Strip comment markers and leading asterisks from a Javadoc block
pub(crate) fn clean_javadoc(raw: &str) -> String {
    let inner = raw
        .trim_start_matches("/**")
        .trim_end_matches("*/");
    let lines: Vec<&str> = inner
        .lines()
        .map(|line| line.trim().trim_start_matches('*').trim())
        .filter(|line| !line.is_empty())
        .collect();
    lines.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"
package com.shop.orders;

import java.util.List;

/**
 * Coordinates order placement.
 */
@Service
public class OrderService {
    private final OrderRepository repository;
    protected int retries = 3, limit;

    public OrderService(OrderRepository repository) {
        this.repository = repository;
    }

    /** Places an order. */
    @Transactional
    public Order place(Customer customer, List<Item> items) throws OrderException {
        return null;
    }

    private void audit(String message) {}

    static class Audit {
        void log() {}
    }
}

interface Notifier {
    void send(String text);
}

enum Status {
    OPEN, CLOSED;

    public boolean isFinal() { return this == CLOSED; }
}
"#;

    fn parse() -> Vec<CodeElement> {
        JavaParser::new()
            .unwrap()
            .parse("src/OrderService.java", SOURCE)
            .unwrap()
    }

    fn find<'a>(elements: &'a [CodeElement], qualified: &str) -> &'a CodeElement {
        elements
            .iter()
            .find(|e| e.qualified_name() == qualified)
            .unwrap_or_else(|| panic!("missing {}", qualified))
    }

    #[test]
    fn test_class_signature_and_annotations() {
        let elements = parse();
        let class = find(&elements, "com.shop.orders.OrderService");
        assert_eq!(class.kind(), ElementKind::Class);
        assert_eq!(class.signature(), "public class OrderService");
        assert_eq!(class.annotations(), ["@Service"]);
        assert_eq!(class.documentation(), "Coordinates order placement.");
        assert_eq!(class.line_number(), 9);
    }

    #[test]
    fn test_methods() {
        let elements = parse();
        let place = find(&elements, "com.shop.orders.OrderService.place");
        assert_eq!(
            place.signature(),
            "public Order place(Customer customer, List<Item> items) throws OrderException"
        );
        assert_eq!(place.parameters(), ["Customer customer", "List<Item> items"]);
        assert_eq!(place.annotations(), ["@Transactional"]);
        assert_eq!(place.documentation(), "Places an order.");

        let ctor = find(&elements, "com.shop.orders.OrderService.OrderService");
        assert_eq!(ctor.kind(), ElementKind::Method);

        let audit = find(&elements, "com.shop.orders.OrderService.audit");
        assert!(!audit.visibility().should_include(false));
    }

    #[test]
    fn test_fields_one_per_declarator() {
        let elements = parse();
        let repo = find(&elements, "com.shop.orders.OrderService.repository");
        assert_eq!(repo.signature(), "private final OrderRepository repository");

        let retries = find(&elements, "com.shop.orders.OrderService.retries");
        let limit = find(&elements, "com.shop.orders.OrderService.limit");
        assert_eq!(retries.signature(), "protected int retries");
        assert_eq!(limit.signature(), "protected int limit");
    }

    #[test]
    fn test_nested_interface_and_enum() {
        let elements = parse();
        find(&elements, "com.shop.orders.OrderService.Audit");
        find(&elements, "com.shop.orders.OrderService.Audit.log");

        let notifier = find(&elements, "com.shop.orders.Notifier");
        assert_eq!(notifier.signature(), "interface Notifier");
        let send = find(&elements, "com.shop.orders.Notifier.send");
        assert_eq!(send.signature(), "void send(String text)");

        find(&elements, "com.shop.orders.Status");
        find(&elements, "com.shop.orders.Status.isFinal");
    }

    #[test]
    fn test_all_elements_carry_path() {
        assert!(parse().iter().all(|e| e.file_path() == "src/OrderService.java"));
    }

    #[test]
    fn test_malformed_source_is_parse_error() {
        let result = JavaParser::new()
            .unwrap()
            .parse("Broken.java", "public class Broken { void x( }");
        assert!(result.is_err());
    }

    #[test]
    fn test_clean_javadoc() {
        assert_eq!(
            clean_javadoc("/**\n * First line.\n * Second line.\n */"),
            "First line. Second line."
        );
    }
}
