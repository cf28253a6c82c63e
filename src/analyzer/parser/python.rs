use super::{
    Language, Parser, children_of_kind, collapse_whitespace, get_node_text, node_line,
    parse_clean_tree,
};
use crate::types::{CodeElement, ElementKind, Result};

/// Assigned values longer than this are elided in field signatures
const MAX_VALUE_LENGTH: usize = 60;

pub struct PythonParser;

impl PythonParser {
    pub fn new() -> Result<Self> {
        // Validate that the language is available
        let _ = super::create_ts_parser(tree_sitter_python::LANGUAGE, "Python")?;
        Ok(Self)
    }
}

impl Parser for PythonParser {
    fn parse(&self, path: &str, content: &str) -> Result<Vec<CodeElement>> {
        let tree = parse_clean_tree(tree_sitter_python::LANGUAGE, "Python", path, content)?;
        let ctx = PythonContext { path, content };

        let mut elements = Vec::new();
        ctx.visit_block(tree.root_node(), None, &mut elements);
        Ok(elements)
    }

    fn language(&self) -> Language {
        Language::Python
    }
}

struct PythonContext<'a> {
    path: &'a str,
    content: &'a str,
}

impl PythonContext<'_> {
    fn text(&self, node: tree_sitter::Node) -> &str {
        get_node_text(node, self.content.as_bytes())
    }

    fn qualify(owner: Option<&str>, name: &str) -> String {
        match owner {
            Some(owner) => format!("{}.{}", owner, name),
            None => name.to_string(),
        }
    }

    /// Visit a module or class body. Function bodies are not descended into.
    fn visit_block(&self, block: tree_sitter::Node, owner: Option<&str>, out: &mut Vec<CodeElement>) {
        let mut cursor = block.walk();
        for child in block.named_children(&mut cursor) {
            match child.kind() {
                "class_definition" => self.visit_class(child, child, owner, out),
                "function_definition" => self.visit_function(child, child, owner, out),
                "decorated_definition" => {
                    let Some(definition) = child.child_by_field_name("definition") else {
                        continue;
                    };
                    match definition.kind() {
                        "class_definition" => self.visit_class(child, definition, owner, out),
                        "function_definition" => {
                            self.visit_function(child, definition, owner, out)
                        }
                        _ => {}
                    }
                }
                "expression_statement" => self.visit_assignment(child, owner, out),
                _ => {}
            }
        }
    }

    /// `outer` is the decorated wrapper when present, otherwise the definition itself
    fn visit_class(
        &self,
        outer: tree_sitter::Node,
        node: tree_sitter::Node,
        owner: Option<&str>,
        out: &mut Vec<CodeElement>,
    ) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let name = self.text(name_node).to_string();
        let qualified = Self::qualify(owner, &name);

        let bases = node
            .child_by_field_name("superclasses")
            .map(|b| collapse_whitespace(self.text(b)))
            .filter(|b| b != "()")
            .unwrap_or_default();
        let body = node.child_by_field_name("body");

        out.push(
            CodeElement::new(
                ElementKind::Class,
                name.clone(),
                qualified.clone(),
                self.path,
                node_line(outer),
                format!("class {}{}:", name, bases),
            )
            .with_documentation(body.map(|b| self.docstring(b)).unwrap_or_default())
            .with_annotations(self.decorators(outer)),
        );

        if let Some(body) = body {
            self.visit_block(body, Some(&qualified), out);
        }
    }

    fn visit_function(
        &self,
        outer: tree_sitter::Node,
        node: tree_sitter::Node,
        owner: Option<&str>,
        out: &mut Vec<CodeElement>,
    ) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let name = self.text(name_node).to_string();

        let params = node
            .child_by_field_name("parameters")
            .map(|p| collapse_whitespace(self.text(p)))
            .unwrap_or_else(|| "()".to_string());
        let return_type = node
            .child_by_field_name("return_type")
            .map(|r| format!(" -> {}", collapse_whitespace(self.text(r))))
            .unwrap_or_default();
        let is_async = node.child(0).is_some_and(|first| first.kind() == "async");
        let keyword = if is_async { "async def" } else { "def" };

        let parameters = node
            .child_by_field_name("parameters")
            .map(|p| self.parameters(p))
            .unwrap_or_default();

        out.push(
            CodeElement::new(
                ElementKind::Method,
                name.clone(),
                Self::qualify(owner, &name),
                self.path,
                node_line(outer),
                format!("{} {}{}{}:", keyword, name, params, return_type),
            )
            .with_parameters(parameters)
            .with_documentation(
                node.child_by_field_name("body")
                    .map(|b| self.docstring(b))
                    .unwrap_or_default(),
            )
            .with_annotations(self.decorators(outer)),
        );
    }

    fn visit_assignment(
        &self,
        statement: tree_sitter::Node,
        owner: Option<&str>,
        out: &mut Vec<CodeElement>,
    ) {
        for assignment in children_of_kind(statement, "assignment") {
            let Some(left) = assignment.child_by_field_name("left") else {
                continue;
            };
            // Tuple unpacking and attribute targets are not declarations
            if left.kind() != "identifier" {
                continue;
            }
            let name = self.text(left).to_string();

            let mut signature = name.clone();
            if let Some(ty) = assignment.child_by_field_name("type") {
                signature.push_str(&format!(": {}", collapse_whitespace(self.text(ty))));
            }
            if let Some(right) = assignment.child_by_field_name("right") {
                signature.push_str(&format!(" = {}", elide(&collapse_whitespace(self.text(right)))));
            }

            out.push(CodeElement::new(
                ElementKind::Field,
                name.clone(),
                Self::qualify(owner, &name),
                self.path,
                node_line(assignment),
                signature,
            ));
        }
    }

    /// Parameter texts without the implicit receiver
    fn parameters(&self, params: tree_sitter::Node) -> Vec<String> {
        let mut cursor = params.walk();
        params
            .named_children(&mut cursor)
            .filter(|p| p.kind() != "comment")
            .map(|p| collapse_whitespace(self.text(p)))
            .filter(|p| p != "self" && p != "cls")
            .collect()
    }

    fn decorators(&self, outer: tree_sitter::Node) -> Vec<String> {
        if outer.kind() != "decorated_definition" {
            return Vec::new();
        }
        children_of_kind(outer, "decorator")
            .into_iter()
            .filter_map(|decorator| decorator.named_child(0))
            .map(|expr| {
                // `@app.route("/")` renders as `@app.route`
                let target = if expr.kind() == "call" {
                    expr.child_by_field_name("function").unwrap_or(expr)
                } else {
                    expr
                };
                format!("@{}", self.text(target))
            })
            .collect()
    }

    /// Leading string literal of a body block
    fn docstring(&self, body: tree_sitter::Node) -> String {
        let Some(first) = body.named_child(0) else {
            return String::new();
        };
        if first.kind() != "expression_statement" {
            return String::new();
        }
        match first.named_child(0) {
            Some(string) if string.kind() == "string" => clean_docstring(self.text(string)),
            _ => String::new(),
        }
    }
}

fn elide(value: &str) -> String {
    if value.chars().count() <= MAX_VALUE_LENGTH {
        return value.to_string();
    }
    let kept: String = value.chars().take(MAX_VALUE_LENGTH - 3).collect();
    format!("{}...", kept)
}

/// Strip string prefix and quotes, then join the non-empty lines
pub(crate) fn clean_docstring(raw: &str) -> String {
    let unprefixed = raw.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    let inner = ["\"\"\"", "'''", "\"", "'"]
        .iter()
        .find(|quote| unprefixed.starts_with(*quote) && unprefixed.len() >= quote.len() * 2)
        .map(|quote| {
            unprefixed
                .strip_prefix(*quote)
                .and_then(|s| s.strip_suffix(*quote))
                .unwrap_or(unprefixed)
        })
        .unwrap_or(unprefixed);

    inner
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
