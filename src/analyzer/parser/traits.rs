use std::ops::Range;

use tree_sitter::{Query, QueryCursor, StreamingIterator};

use crate::types::{CodeElement, DocumentorError, Result};

/// Primary (structural) analysis strategy for one language.
///
/// Returns `Err(DocumentorError::Parse)` when the source cannot be turned into a
/// clean syntax tree; callers fall back to pattern matching in that case.
pub trait Parser: Send + Sync {
    fn parse(&self, path: &str, content: &str) -> Result<Vec<CodeElement>>;
    fn language(&self) -> super::Language;
}

/// Extract text content from a tree-sitter node.
/// Returns empty string if extraction fails (with debug logging).
#[inline]
pub fn get_node_text<'a>(node: tree_sitter::Node, content: &'a [u8]) -> &'a str {
    node.utf8_text(content).unwrap_or_else(|e| {
        tracing::debug!(
            "UTF-8 extraction failed at {}:{}-{}:{}: {}",
            node.start_position().row + 1,
            node.start_position().column,
            node.end_position().row + 1,
            node.end_position().column,
            e
        );
        ""
    })
}

/// 1-based line of a node's first character
#[inline]
pub fn node_line(node: tree_sitter::Node) -> u32 {
    node.start_position().row as u32 + 1
}

/// Create a tree-sitter parser for the given language.
pub fn create_ts_parser<L: Into<tree_sitter::Language>>(
    language: L,
    lang_name: &str,
) -> Result<tree_sitter::Parser> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&language.into())
        .map_err(|e| DocumentorError::Parse {
            message: format!("Failed to set {} language: {}", lang_name, e),
            path: String::new(),
        })?;
    Ok(parser)
}

/// Parse `content` and reject trees containing syntax errors.
pub fn parse_clean_tree<L: Into<tree_sitter::Language>>(
    language: L,
    lang_name: &str,
    path: &str,
    content: &str,
) -> Result<tree_sitter::Tree> {
    let mut parser = create_ts_parser(language, lang_name).map_err(|e| match e {
        DocumentorError::Parse { message, .. } => DocumentorError::parse(path, message),
        other => other,
    })?;

    let tree = parser
        .parse(content, None)
        .ok_or_else(|| DocumentorError::parse(path, format!("Failed to parse {} file", lang_name)))?;

    let root = tree.root_node();
    if root.has_error() {
        let line = first_error_line(root).unwrap_or(1);
        return Err(DocumentorError::parse(
            path,
            format!("{} syntax error near line {}", lang_name, line),
        ));
    }

    Ok(tree)
}

fn first_error_line(node: tree_sitter::Node) -> Option<u32> {
    if node.is_error() || node.is_missing() {
        return Some(node_line(node));
    }
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|child| child.has_error())
        .find_map(first_error_line)
}

/// Execute a tree-sitter query and process captures with a callback.
pub fn execute_query<F>(
    language: &tree_sitter::Language,
    query_str: &str,
    root: tree_sitter::Node,
    content: &[u8],
    mut callback: F,
) where
    F: FnMut(tree_sitter::Node, &str),
{
    match Query::new(language, query_str) {
        Ok(query) => {
            let mut cursor = QueryCursor::new();
            let mut matches = cursor.matches(&query, root, content);

            while let Some(m) = matches.next() {
                for cap in m.captures.iter() {
                    let text = get_node_text(cap.node, content);
                    callback(cap.node, text);
                }
            }
        }
        Err(e) => tracing::debug!("Invalid tree-sitter query: {}", e),
    }
}

/// Collapse all whitespace runs to single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Source text of `range` with the `skip` sub-ranges cut out, whitespace-collapsed.
///
/// Used to render declaration headers without their annotations.
pub fn text_without(content: &str, range: Range<usize>, skip: &[Range<usize>]) -> String {
    let mut out = String::new();
    let mut cursor = range.start;
    let mut skip: Vec<&Range<usize>> = skip
        .iter()
        .filter(|r| r.start >= range.start && r.end <= range.end)
        .collect();
    skip.sort_by_key(|r| r.start);

    for r in skip {
        if r.start > cursor {
            out.push_str(content.get(cursor..r.start).unwrap_or(""));
            out.push(' ');
        }
        cursor = cursor.max(r.end);
    }
    if cursor < range.end {
        out.push_str(content.get(cursor..range.end).unwrap_or(""));
    }
    collapse_whitespace(&out)
}

/// Named children of `node` with the given kind
pub fn children_of_kind<'t>(node: tree_sitter::Node<'t>, kind: &str) -> Vec<tree_sitter::Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() == kind)
        .collect()
}
