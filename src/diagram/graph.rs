//! "Uses" relationships between eligible classes
//!
//! A class uses another when one of its member signatures or parameters
//! mentions the other class's name as a whole word.

use std::collections::{BTreeMap, BTreeSet};

use super::filter::ClassView;

/// Directed edges keyed by qualified name. Rebuilt per diagram run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationshipGraph {
    names: BTreeMap<String, String>,
    edges: BTreeMap<String, BTreeSet<String>>,
}

impl RelationshipGraph {
    pub fn build(views: &[ClassView<'_>]) -> Self {
        let mut graph = Self::default();
        for view in views {
            graph.names.insert(
                view.class.qualified_name().to_string(),
                view.class.name().to_string(),
            );
        }

        for view in views {
            let source = view.class;
            let text: Vec<String> = view
                .members()
                .map(|m| format!("{} {}", m.signature(), m.parameters().join(" ")))
                .collect();

            for target in views.iter().map(|v| v.class) {
                if target.qualified_name() == source.qualified_name()
                    || target.name() == source.name()
                {
                    continue;
                }
                if text.iter().any(|t| contains_word(t, target.name())) {
                    graph.add_edge(source.qualified_name(), target.qualified_name());
                }
            }
        }
        graph
    }

    fn add_edge(&mut self, from: &str, to: &str) {
        if self.names.contains_key(from) && self.names.contains_key(to) {
            self.edges
                .entry(from.to_string())
                .or_default()
                .insert(to.to_string());
        }
    }

    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.edges.get(from).is_some_and(|targets| targets.contains(to))
    }

    /// Simple names of the classes `from` uses, sorted by qualified name
    pub fn uses_of(&self, from: &str) -> Vec<&str> {
        self.edges
            .get(from)
            .into_iter()
            .flatten()
            .filter_map(|to| self.names.get(to).map(String::as_str))
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.names.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeSet::len).sum()
    }
}

/// Whole-word occurrence of `word` in `text`
pub fn contains_word(text: &str, word: &str) -> bool {
    if word.is_empty() {
        return false;
    }
    text.match_indices(word).any(|(idx, _)| {
        let before = text[..idx].chars().next_back();
        let after = text[idx + word.len()..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    })
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
