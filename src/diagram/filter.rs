//! Eligible classes and their direct members

use crate::types::{CodeElement, DocumentorError, ElementKind, ProjectAnalysis, Result, Visibility};

/// One eligible class with its non-private direct members
#[derive(Debug, Clone)]
pub struct ClassView<'a> {
    pub class: &'a CodeElement,
    pub fields: Vec<&'a CodeElement>,
    pub methods: Vec<&'a CodeElement>,
}

impl<'a> ClassView<'a> {
    pub fn members(&self) -> impl Iterator<Item = &'a CodeElement> + '_ {
        self.fields.iter().chain(self.methods.iter()).copied()
    }
}

fn is_eligible(element: &CodeElement) -> bool {
    element.visibility() != Visibility::Private
}

/// Non-private classes in analysis order, each with its direct members.
///
/// A class without a qualified name makes the whole set unusable.
pub fn eligible_classes(analysis: &ProjectAnalysis) -> Result<Vec<ClassView<'_>>> {
    let classes: Vec<&CodeElement> = analysis.classes().filter(|c| is_eligible(c)).collect();

    if let Some(bad) = classes.iter().find(|c| c.qualified_name().trim().is_empty()) {
        return Err(DocumentorError::Diagram(format!(
            "Class {} in {} has no qualified name",
            bad.name(),
            bad.file_path()
        )));
    }

    let views = classes
        .into_iter()
        .map(|class| {
            let members = analysis
                .elements()
                .iter()
                .filter(|e| e.is_member_of(class) && is_eligible(e));
            let (fields, methods) = members.partition(|e| e.kind() == ElementKind::Field);
            ClassView {
                class,
                fields,
                methods,
            }
        })
        .collect();

    Ok(views)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(kind: ElementKind, name: &str, qname: &str, sig: &str) -> CodeElement {
        CodeElement::new(kind, name, qname, "Shop.java", 1, sig)
    }

    #[test]
    fn test_groups_direct_non_private_members() {
        let analysis = ProjectAnalysis::new(
            "/repo",
            vec![
                element(ElementKind::Class, "Shop", "app.Shop", "public class Shop"),
                element(ElementKind::Field, "name", "app.Shop.name", "protected String name"),
                element(ElementKind::Field, "secret", "app.Shop.secret", "private String secret"),
                element(ElementKind::Method, "open", "app.Shop.open", "public void open()"),
                element(ElementKind::Class, "Inner", "app.Shop.Inner", "static class Inner"),
                element(ElementKind::Method, "run", "app.Shop.Inner.run", "void run()"),
                element(ElementKind::Class, "Hidden", "app.Hidden", "private class Hidden"),
            ],
        );

        let views = eligible_classes(&analysis).unwrap();
        let names: Vec<_> = views.iter().map(|v| v.class.name()).collect();
        assert_eq!(names, ["Shop", "Inner"]);

        let shop = &views[0];
        assert_eq!(shop.fields.len(), 1);
        assert_eq!(shop.fields[0].name(), "name");
        assert_eq!(shop.methods.len(), 1);
        assert_eq!(shop.methods[0].name(), "open");

        assert_eq!(views[1].methods[0].name(), "run");
    }

    #[test]
    fn test_members_in_other_file_not_attached() {
        let analysis = ProjectAnalysis::new(
            "/repo",
            vec![
                element(ElementKind::Class, "Shop", "Shop", "public class Shop"),
                CodeElement::new(ElementKind::Method, "open", "Shop.open", "Other.java", 3, "public void open()"),
            ],
        );
        let views = eligible_classes(&analysis).unwrap();
        assert!(views[0].methods.is_empty());
    }

    #[test]
    fn test_empty_qualified_name_is_error() {
        let analysis = ProjectAnalysis::new(
            "/repo",
            vec![element(ElementKind::Class, "Broken", "", "public class Broken")],
        );
        assert!(matches!(
            eligible_classes(&analysis),
            Err(DocumentorError::Diagram(_))
        ));
    }
}
