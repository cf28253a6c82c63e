//! Mermaid class diagram wrapped in markdown

use super::filter::ClassView;
use super::graph::RelationshipGraph;
use super::naming::{sanitize_identifier, shorten};

pub fn render(view: &ClassView<'_>, graph: &RelationshipGraph, generated_on: &str) -> String {
    let name = view.class.name();
    let id = sanitize_identifier(name);

    let mut out = String::new();
    out.push_str(&format!("# {} Class Diagram\n\n", name));
    out.push_str("```mermaid\n");
    out.push_str("classDiagram\n");

    out.push_str(&format!("    class {} {{\n", id));
    for member in view.members() {
        out.push_str(&format!("        {}\n", shorten(member.signature())));
    }
    out.push_str("    }\n\n");

    for target in graph.uses_of(view.class.qualified_name()) {
        out.push_str(&format!("    {} --> {} : uses\n", id, sanitize_identifier(target)));
    }

    out.push_str("```\n\n");
    out.push_str(&format!("Generated on: {}\n", generated_on));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::filter::eligible_classes;
    use crate::types::{CodeElement, ElementKind, ProjectAnalysis};

    #[test]
    fn test_render() {
        let analysis = ProjectAnalysis::new(
            "/repo",
            vec![
                CodeElement::new(ElementKind::Class, "Cart", "shop.Cart", "Cart.java", 1, "public class Cart"),
                CodeElement::new(ElementKind::Field, "items", "shop.Cart.items", "Cart.java", 2, "protected java.util.List<Item> items"),
                CodeElement::new(ElementKind::Method, "add", "shop.Cart.add", "Cart.java", 3, "public void add(Item item)"),
                CodeElement::new(ElementKind::Method, "clear", "shop.Cart.clear", "Cart.java", 4, "private void clear()"),
                CodeElement::new(ElementKind::Class, "Item", "shop.Item", "Item.java", 1, "public class Item"),
            ],
        );
        let views = eligible_classes(&analysis).unwrap();
        let graph = RelationshipGraph::build(&views);

        let text = render(&views[0], &graph, "2026-01-01 00:00:00");

        assert!(text.starts_with("# Cart Class Diagram\n\n```mermaid\nclassDiagram\n"));
        assert!(text.contains("    class Cart {\n"));
        assert!(text.contains("        protected List items\n"));
        assert!(text.contains("        public void add(Item item)\n"));
        assert!(!text.contains("clear"));
        assert!(text.contains("    Cart --> Item : uses\n"));
        assert!(text.ends_with("```\n\nGenerated on: 2026-01-01 00:00:00\n"));
    }
}
