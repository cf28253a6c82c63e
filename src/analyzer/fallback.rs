//! Pattern-based element extraction.
//!
//! Line-oriented regex matching used when the structural parser rejects a file
//! or finds nothing in it. Never fails: unmatched lines are simply skipped.

use regex::Regex;

use super::parser::{Language, collapse_whitespace, java::clean_javadoc};
use crate::types::{CodeElement, DocumentorError, ElementKind, Result};

const JAVA_MODIFIERS: &[&str] = &[
    "public",
    "protected",
    "private",
    "abstract",
    "static",
    "final",
    "synchronized",
    "native",
    "default",
    "transient",
    "volatile",
    "strictfp",
];

struct PythonPatterns {
    class: Regex,
    function: Regex,
    variable: Regex,
    decorator: Regex,
}

struct JavaPatterns {
    package: Regex,
    type_decl: Regex,
    constructor: Regex,
    method: Regex,
    field: Regex,
}

pub struct FallbackExtractor {
    python: PythonPatterns,
    java: JavaPatterns,
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| DocumentorError::parse("<fallback patterns>", format!("Invalid pattern: {}", e)))
}

impl FallbackExtractor {
    pub fn new() -> Result<Self> {
        let python = PythonPatterns {
            class: compile(r"^(\s*)class\s+([A-Za-z_]\w*)\s*(?:\([^)]*\))?\s*:")?,
            function: compile(
                r"^(\s*)def\s+([A-Za-z_]\w*)\s*\(([^)]*)\)\s*(?:->\s*[^:]+)?\s*:",
            )?,
            variable: compile(r"^(\s*)([A-Za-z_]\w*)\s*(?::\s*[^=]+)?\s*=\s*(.+)")?,
            decorator: compile(r"^\s*@([A-Za-z_][\w.]*)")?,
        };

        let java = JavaPatterns {
            package: compile(r"^\s*package\s+([\w.]+)\s*;")?,
            type_decl: compile(
                r"^((?:(?:public|protected|private|abstract|static|final|sealed|non-sealed|strictfp)\s+)*)(class|interface|enum|record)\s+([A-Za-z_$][\w$]*)([^{;]*)",
            )?,
            constructor: compile(
                r"^((?:(?:public|protected|private)\s+)*)([A-Za-z_$][\w$]*)\s*\(([^)]*)\)\s*(?:throws\s+[\w$.,\s]+?)?\s*\{?",
            )?,
            method: compile(
                r"^((?:(?:public|protected|private|abstract|static|final|synchronized|native|default|strictfp)\s+)*)(?:<[^>]+>\s+)?([\w$.<>\[\],? ]+?)\s+([A-Za-z_$][\w$]*)\s*\(([^)]*)\)\s*(?:throws\s+[\w$.,\s]+?)?\s*[{;]",
            )?,
            field: compile(
                r"^((?:(?:public|protected|private|static|final|transient|volatile)\s+)*)([\w$.<>\[\],? ]+?)\s+([A-Za-z_$][\w$]*)\s*(?:=[^;]*)?;",
            )?,
        };

        Ok(Self { python, java })
    }

    /// Extract elements by pattern matching; unknown languages yield nothing
    pub fn extract(&self, path: &str, content: &str) -> Vec<CodeElement> {
        match Language::from_path(path) {
            Language::Python => self.extract_python(path, content),
            Language::Java => self.extract_java(path, content),
            Language::Unknown => Vec::new(),
        }
    }

    fn extract_python(&self, path: &str, content: &str) -> Vec<CodeElement> {
        let p = &self.python;
        let lines: Vec<&str> = content.lines().collect();
        let mut scopes: Vec<PythonScope> = Vec::new();
        let mut decorators: Vec<String> = Vec::new();
        let mut elements = Vec::new();

        let mut i = 0;
        while i < lines.len() {
            let line = lines[i];
            let line_number = i as u32 + 1;
            i += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let indent = indentation(line);
            while scopes.last().is_some_and(|s| s.indent >= indent) {
                scopes.pop();
            }
            let in_function = scopes.iter().any(|s| s.class.is_none());
            let owner = scopes.last().and_then(|s| s.class.clone());

            if let Some(caps) = p.decorator.captures(line) {
                if !in_function {
                    decorators.push(format!("@{}", &caps[1]));
                }
                continue;
            }
            let pending = std::mem::take(&mut decorators);

            if let Some(caps) = p.class.captures(line) {
                let (doc, next) = python_docstring(&lines, i);
                i = next;
                if in_function {
                    scopes.push(PythonScope { indent, class: None });
                    continue;
                }
                let name = caps[2].to_string();
                let qualified = qualify(owner.as_deref(), &name);
                elements.push(
                    CodeElement::new(
                        ElementKind::Class,
                        name,
                        qualified.clone(),
                        path,
                        line_number,
                        caps[0].trim(),
                    )
                    .with_documentation(doc)
                    .with_annotations(pending),
                );
                scopes.push(PythonScope {
                    indent,
                    class: Some(qualified),
                });
            } else if let Some(caps) = p.function.captures(line) {
                let (doc, next) = python_docstring(&lines, i);
                i = next;
                if !in_function {
                    let name = caps[2].to_string();
                    let parameters = caps[3]
                        .split(',')
                        .map(str::trim)
                        .filter(|param| !param.is_empty() && *param != "self" && *param != "cls")
                        .map(String::from)
                        .collect();
                    elements.push(
                        CodeElement::new(
                            ElementKind::Method,
                            name.clone(),
                            qualify(owner.as_deref(), &name),
                            path,
                            line_number,
                            caps[0].trim(),
                        )
                        .with_parameters(parameters)
                        .with_documentation(doc)
                        .with_annotations(pending),
                    );
                }
                scopes.push(PythonScope { indent, class: None });
            } else if !in_function && let Some(caps) = p.variable.captures(line) {
                // `x == y` is a comparison, not an assignment
                if caps[3].starts_with('=') {
                    continue;
                }
                let name = caps[2].to_string();
                elements.push(CodeElement::new(
                    ElementKind::Field,
                    name.clone(),
                    qualify(owner.as_deref(), &name),
                    path,
                    line_number,
                    caps[0].trim(),
                ));
            }
        }

        elements
    }

    fn extract_java(&self, path: &str, content: &str) -> Vec<CodeElement> {
        let p = &self.java;
        let package = content
            .lines()
            .find_map(|line| p.package.captures(line))
            .map(|caps| caps[1].to_string());

        let mut scopes: Vec<JavaScope> = Vec::new();
        let mut depth = 0usize;
        let mut annotations: Vec<String> = Vec::new();
        let mut doc = String::new();
        let mut javadoc: Option<Vec<&str>> = None;
        let mut in_block_comment = false;
        let mut elements = Vec::new();

        for (index, raw) in content.lines().enumerate() {
            let line_number = index as u32 + 1;

            if let Some(buffer) = javadoc.as_mut() {
                buffer.push(raw);
                if raw.contains("*/") {
                    doc = clean_javadoc(&buffer.join("\n"));
                    javadoc = None;
                }
                continue;
            }
            if in_block_comment {
                in_block_comment = !raw.contains("*/");
                continue;
            }

            let trimmed = raw.trim();
            if trimmed.starts_with("/**") {
                if trimmed.contains("*/") {
                    doc = clean_javadoc(trimmed);
                } else {
                    javadoc = Some(vec![raw]);
                }
                continue;
            }
            if trimmed.starts_with("/*") {
                in_block_comment = !trimmed.contains("*/");
                continue;
            }
            if trimmed.is_empty() || trimmed.starts_with("//") {
                continue;
            }

            let code = strip_line_noise(trimmed);
            let (found, rest) = split_annotations(&code);
            annotations.extend(found);
            let rest = rest.trim();
            // Annotation-only lines keep the pending Javadoc
            if rest.is_empty() {
                continue;
            }

            let pending_annotations = std::mem::take(&mut annotations);
            let pending_doc = std::mem::take(&mut doc);
            let at_member_level = scopes.last().map_or(depth == 0, |s| s.body_depth == depth);

            if at_member_level {
                if let Some(caps) = p.type_decl.captures(rest) {
                    let name = caps[3].to_string();
                    let qualified = match (scopes.last(), &package) {
                        (Some(scope), _) => format!("{}.{}", scope.qualified, name),
                        (None, Some(pkg)) => format!("{}.{}", pkg, name),
                        (None, None) => name.clone(),
                    };
                    elements.push(
                        CodeElement::new(
                            ElementKind::Class,
                            name.clone(),
                            qualified.clone(),
                            path,
                            line_number,
                            collapse_whitespace(&caps[0]),
                        )
                        .with_annotations(pending_annotations)
                        .with_documentation(pending_doc),
                    );
                    scopes.push(JavaScope {
                        qualified,
                        name,
                        body_depth: depth + 1,
                        opened: false,
                    });
                } else if let Some(scope) = scopes.last() {
                    if let Some(element) = self.java_member(rest, scope, path, line_number) {
                        elements.push(
                            element
                                .with_annotations(pending_annotations)
                                .with_documentation(pending_doc),
                        );
                    }
                }
            }

            // A scope opens when its body brace is crossed, even if it closes on the same line
            for c in rest.chars() {
                match c {
                    '{' => {
                        depth += 1;
                        if let Some(scope) = scopes.last_mut()
                            && !scope.opened
                            && depth == scope.body_depth
                        {
                            scope.opened = true;
                        }
                    }
                    '}' => depth = depth.saturating_sub(1),
                    _ => {}
                }
            }
            while scopes
                .last()
                .is_some_and(|s| s.opened && s.body_depth > depth)
            {
                scopes.pop();
            }
        }

        elements
    }

    fn java_member(
        &self,
        code: &str,
        scope: &JavaScope,
        path: &str,
        line_number: u32,
    ) -> Option<CodeElement> {
        let p = &self.java;

        if let Some(caps) = p.constructor.captures(code)
            && &caps[2] == scope.name.as_str()
        {
            return Some(
                CodeElement::new(
                    ElementKind::Method,
                    scope.name.clone(),
                    format!("{}.{}", scope.qualified, scope.name),
                    path,
                    line_number,
                    header_signature(&caps[0]),
                )
                .with_parameters(java_parameters(&caps[3])),
            );
        }

        if let Some(caps) = p.method.captures(code)
            && is_type_name(&caps[2])
        {
            let name = caps[3].to_string();
            return Some(
                CodeElement::new(
                    ElementKind::Method,
                    name.clone(),
                    format!("{}.{}", scope.qualified, name),
                    path,
                    line_number,
                    header_signature(&caps[0]),
                )
                .with_parameters(java_parameters(&caps[4])),
            );
        }

        if let Some(caps) = p.field.captures(code)
            && is_type_name(&caps[2])
        {
            let name = caps[3].to_string();
            let signature = collapse_whitespace(&format!("{} {} {}", &caps[1], &caps[2], name));
            return Some(CodeElement::new(
                ElementKind::Field,
                name.clone(),
                format!("{}.{}", scope.qualified, name),
                path,
                line_number,
                signature,
            ));
        }

        None
    }
}

struct PythonScope {
    indent: usize,
    /// Qualified class name; `None` for function bodies
    class: Option<String>,
}

struct JavaScope {
    qualified: String,
    name: String,
    body_depth: usize,
    /// Set once the opening brace has been seen
    opened: bool,
}

fn qualify(owner: Option<&str>, name: &str) -> String {
    match owner {
        Some(owner) => format!("{}.{}", owner, name),
        None => name.to_string(),
    }
}

fn indentation(line: &str) -> usize {
    line.chars()
        .take_while(|c| c.is_whitespace())
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum()
}

/// Triple-quoted docstring starting at `lines[start]`.
///
/// Returns the cleaned text and the index of the first line after it.
fn python_docstring(lines: &[&str], start: usize) -> (String, usize) {
    let Some(first) = lines.get(start) else {
        return (String::new(), start);
    };
    let trimmed = first.trim();
    let Some(quote_pos) = trimmed.find(['"', '\'']) else {
        return (String::new(), start);
    };
    let prefix = &trimmed[..quote_pos];
    if prefix.len() > 2 || !prefix.chars().all(|c| "rRuUbBfF".contains(c)) {
        return (String::new(), start);
    }

    let rest = &trimmed[quote_pos..];
    let Some(quote) = ["\"\"\"", "'''"].into_iter().find(|q| rest.starts_with(q)) else {
        return (String::new(), start);
    };
    let opening = &rest[quote.len()..];

    if let Some(end) = opening.find(quote) {
        return (join_doc_lines(&[&opening[..end]]), start + 1);
    }

    let mut parts = vec![opening];
    for (offset, line) in lines[start + 1..].iter().enumerate() {
        if let Some(end) = line.find(quote) {
            parts.push(&line[..end]);
            return (join_doc_lines(&parts), start + offset + 2);
        }
        parts.push(line);
    }

    // Unterminated: treat as code
    (String::new(), start)
}

fn join_doc_lines(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Blank out string literal contents and drop trailing `//` comments
fn strip_line_noise(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        match quote {
            Some(q) => {
                if c == '\\' {
                    chars.next();
                } else if c == q {
                    out.push(c);
                    quote = None;
                }
            }
            None => {
                if c == '/' && chars.peek() == Some(&'/') {
                    break;
                }
                if c == '"' || c == '\'' {
                    quote = Some(c);
                }
                out.push(c);
            }
        }
    }
    out
}

/// Split leading annotations off a line: `@Override public void x()` yields
/// `["@Override"]` and `public void x()`.
fn split_annotations(code: &str) -> (Vec<String>, &str) {
    let mut rest = code.trim_start();
    let mut found = Vec::new();

    while let Some(after_at) = rest.strip_prefix('@') {
        if after_at.starts_with("interface") {
            break;
        }
        let name_len = after_at
            .find(|c: char| !(c.is_alphanumeric() || matches!(c, '_' | '.' | '$')))
            .unwrap_or(after_at.len());
        if name_len == 0 {
            break;
        }
        found.push(format!("@{}", &after_at[..name_len]));

        let mut tail = after_at[name_len..].trim_start();
        if tail.starts_with('(') {
            let mut level = 0i32;
            let mut end = tail.len();
            for (i, c) in tail.char_indices() {
                match c {
                    '(' => level += 1,
                    ')' => {
                        level -= 1;
                        if level == 0 {
                            end = i + 1;
                            break;
                        }
                    }
                    _ => {}
                }
            }
            tail = &tail[end..];
        }
        rest = tail.trim_start();
    }

    (found, rest)
}

/// Split a parameter list on top-level commas (ignoring those inside generics)
fn java_parameters(raw: &str) -> Vec<String> {
    let mut params = Vec::new();
    let mut current = String::new();
    let mut angle = 0i32;

    for c in raw.chars() {
        match c {
            '<' => angle += 1,
            '>' => angle -= 1,
            ',' if angle == 0 => {
                params.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    params.push(current);

    params
        .iter()
        .map(|param| {
            let (_, rest) = split_annotations(param);
            let rest = rest.trim();
            collapse_whitespace(rest.strip_prefix("final ").unwrap_or(rest))
        })
        .filter(|param| !param.is_empty())
        .collect()
}

/// Reject statement keywords and modifiers captured as a type
fn is_type_name(candidate: &str) -> bool {
    let candidate = candidate.trim();
    !candidate.is_empty()
        && !candidate.ends_with(',')
        && !JAVA_MODIFIERS.contains(&candidate)
        && !matches!(
            candidate,
            "return" | "new" | "throw" | "else" | "case" | "package" | "import"
        )
}

fn header_signature(matched: &str) -> String {
    collapse_whitespace(matched.trim_end_matches(['{', ';']))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> FallbackExtractor {
        FallbackExtractor::new().unwrap()
    }

    fn find<'a>(elements: &'a [CodeElement], qualified: &str) -> &'a CodeElement {
        elements
            .iter()
            .find(|e| e.qualified_name() == qualified)
            .unwrap_or_else(|| panic!("missing {}", qualified))
    }

    const PYTHON: &str = r#"LIMIT = 10

@dataclass
class Order(Base):
    """An order."""
    total = 0

    def add(self, item, qty=1):
        """Add an item.

        Updates the total.
        """
        count = qty
        return count

    def _reset(self):
        pass

def broken(:
    pass

def helper(x) -> int:
    return x
"#;

    #[test]
    fn test_python_elements() {
        let elements = extractor().extract("shop/order.py", PYTHON);

        let limit = find(&elements, "LIMIT");
        assert_eq!(limit.kind(), ElementKind::Field);
        assert_eq!(limit.signature(), "LIMIT = 10");

        let order = find(&elements, "Order");
        assert_eq!(order.kind(), ElementKind::Class);
        assert_eq!(order.signature(), "class Order(Base):");
        assert_eq!(order.documentation(), "An order.");
        assert_eq!(order.annotations(), ["@dataclass"]);
        assert_eq!(order.line_number(), 4);

        find(&elements, "Order.total");

        let add = find(&elements, "Order.add");
        assert_eq!(add.parameters(), ["item", "qty=1"]);
        assert_eq!(add.documentation(), "Add an item. Updates the total.");

        find(&elements, "Order._reset");
        let helper = find(&elements, "helper");
        assert_eq!(helper.signature(), "def helper(x) -> int:");
    }

    #[test]
    fn test_python_function_locals_ignored() {
        let elements = extractor().extract("shop/order.py", PYTHON);
        assert!(elements.iter().all(|e| e.name() != "count"));
        assert!(elements.iter().all(|e| e.name() != "broken"));
    }

    const JAVA: &str = r#"package com.shop;

/**
 * Order aggregate.
 */
@Entity
public class Order {
    private static final int LIMIT = 10;
    private Map<String, Integer> counts = new HashMap<>();

    public Order(String id) {
        this.id = id;
    }

    @Override
    public String toString() {
        String local = "x; y";
        return local;
    }

    protected <T> List<T> items(final List<T> source, int max) throws IOException {
        return source;
    }

    static class Line {
        int qty;
    }

    enum State {
        OPEN, CLOSED;
    }
}
"#;

    #[test]
    fn test_java_elements() {
        let elements = extractor().extract("src/Order.java", JAVA);

        let order = find(&elements, "com.shop.Order");
        assert_eq!(order.signature(), "public class Order");
        assert_eq!(order.annotations(), ["@Entity"]);
        assert_eq!(order.documentation(), "Order aggregate.");
        assert_eq!(order.line_number(), 7);

        let limit = find(&elements, "com.shop.Order.LIMIT");
        assert_eq!(limit.signature(), "private static final int LIMIT");
        find(&elements, "com.shop.Order.counts");

        let ctor = find(&elements, "com.shop.Order.Order");
        assert_eq!(ctor.kind(), ElementKind::Method);
        assert_eq!(ctor.parameters(), ["String id"]);

        let to_string = find(&elements, "com.shop.Order.toString");
        assert_eq!(to_string.annotations(), ["@Override"]);
        assert_eq!(to_string.signature(), "public String toString()");

        let items = find(&elements, "com.shop.Order.items");
        assert_eq!(items.parameters(), ["List<T> source", "int max"]);

        find(&elements, "com.shop.Order.Line");
        find(&elements, "com.shop.Order.Line.qty");
        find(&elements, "com.shop.Order.State");
    }

    #[test]
    fn test_java_method_bodies_ignored() {
        let elements = extractor().extract("src/Order.java", JAVA);
        assert!(elements.iter().all(|e| e.name() != "local"));
        assert!(elements.iter().all(|e| e.name() != "CLOSED"));
    }

    #[test]
    fn test_java_single_line_class_body() {
        let source = "public class Marker {}\n\npublic class Service {\n    public void run() {\n    }\n}\n";
        let elements = extractor().extract("src/Service.java", source);

        find(&elements, "Marker");
        find(&elements, "Service");
        assert_eq!(find(&elements, "Service.run").kind(), ElementKind::Method);
        assert!(elements.iter().all(|e| e.qualified_name() != "Marker.run"));
    }

    #[test]
    fn test_unknown_language_yields_nothing() {
        assert!(extractor().extract("notes.txt", "class A:").is_empty());
    }

    #[test]
    fn test_split_annotations() {
        let (found, rest) = split_annotations("@Override @SuppressWarnings(\"x\") public void run()");
        assert_eq!(found, ["@Override", "@SuppressWarnings"]);
        assert_eq!(rest, "public void run()");
    }

    #[test]
    fn test_strip_line_noise() {
        assert_eq!(strip_line_noise(r#"String s = "a{b}"; // {"#), r#"String s = ""; "#);
    }
}
