//! Code Element Model
//!
//! One structural declaration (class, method or field) extracted from a source file.
//! Elements are immutable once built: fields are private and only the consuming
//! `with_*` builders can set the optional parts.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of declaration an element represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Class,
    Method,
    Field,
}

impl ElementKind {
    /// Human-readable description used in prompts and documents
    pub fn description(&self) -> &'static str {
        match self {
            Self::Class => "Class/Interface",
            Self::Method => "Method/Function",
            Self::Field => "Field/Variable",
        }
    }

    /// Icon used in generated markdown
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Class => "🏛️",
            Self::Method => "⚙️",
            Self::Field => "📊",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class => write!(f, "class"),
            Self::Method => write!(f, "method"),
            Self::Field => write!(f, "field"),
        }
    }
}

/// Visibility derived from modifier keywords and naming conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    Protected,
    PackagePrivate,
    Private,
}

impl Visibility {
    /// Derive visibility from a declaration signature and its name.
    ///
    /// Explicit keywords win (`private`, then `protected`, then `public`);
    /// otherwise a leading underscore marks a private name; otherwise the
    /// declaration is package-visible.
    pub fn from_signature_and_name(signature: &str, name: &str) -> Self {
        let lower = signature.to_lowercase();
        if contains_keyword(&lower, "private") {
            Self::Private
        } else if contains_keyword(&lower, "protected") {
            Self::Protected
        } else if contains_keyword(&lower, "public") {
            Self::Public
        } else if name.starts_with('_') {
            Self::Private
        } else {
            Self::PackagePrivate
        }
    }

    /// Whether an element with this visibility passes the private-member filter
    pub fn should_include(&self, include_private: bool) -> bool {
        include_private || *self != Self::Private
    }

    /// PlantUML visibility marker
    pub fn uml_symbol(&self) -> &'static str {
        match self {
            Self::Public => "+",
            Self::Protected => "#",
            Self::PackagePrivate => "~",
            Self::Private => "-",
        }
    }
}

/// Keyword test on whole words so identifiers like `privateKey` do not count
fn contains_keyword(haystack: &str, keyword: &str) -> bool {
    haystack.match_indices(keyword).any(|(idx, _)| {
        let before = haystack[..idx].chars().next_back();
        let after = haystack[idx + keyword.len()..].chars().next();
        !before.is_some_and(is_ident_char) && !after.is_some_and(is_ident_char)
    })
}

#[inline]
fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Quick public check on a bare signature
pub fn is_public(signature: &str) -> bool {
    Visibility::from_signature_and_name(signature, "") == Visibility::Public
}

/// One extracted declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeElement {
    kind: ElementKind,
    name: String,
    qualified_name: String,
    file_path: String,
    line_number: u32,
    signature: String,
    documentation: String,
    parameters: Vec<String>,
    annotations: Vec<String>,
}

impl CodeElement {
    /// Create an element. Line numbers are 1-based; 0 is clamped to 1.
    pub fn new(
        kind: ElementKind,
        name: impl Into<String>,
        qualified_name: impl Into<String>,
        file_path: impl Into<String>,
        line_number: u32,
        signature: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            qualified_name: qualified_name.into(),
            file_path: file_path.into(),
            line_number: line_number.max(1),
            signature: signature.into(),
            documentation: String::new(),
            parameters: Vec::new(),
            annotations: Vec::new(),
        }
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = documentation.into();
        self
    }

    pub fn with_parameters(mut self, parameters: Vec<String>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_annotations(mut self, annotations: Vec<String>) -> Self {
        self.annotations = annotations;
        self
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn line_number(&self) -> u32 {
        self.line_number
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn documentation(&self) -> &str {
        &self.documentation
    }

    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    pub fn annotations(&self) -> &[String] {
        &self.annotations
    }

    /// Identity string: `file:qualified_name:line`
    pub fn id(&self) -> String {
        format!(
            "{}:{}:{}",
            self.file_path, self.qualified_name, self.line_number
        )
    }

    pub fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.kind.description())
    }

    pub fn visibility(&self) -> Visibility {
        Visibility::from_signature_and_name(&self.signature, &self.name)
    }

    pub fn is_public(&self) -> bool {
        self.visibility() == Visibility::Public
    }

    /// Qualified name of the enclosing declaration, if any
    pub fn owner_name(&self) -> Option<&str> {
        self.qualified_name
            .rsplit_once('.')
            .map(|(owner, _)| owner)
            .filter(|owner| !owner.is_empty())
    }

    /// Whether `self` is a direct member of `class` (same file, one level down)
    pub fn is_member_of(&self, class: &CodeElement) -> bool {
        self.kind != ElementKind::Class
            && self.file_path == class.file_path
            && self.owner_name() == Some(class.qualified_name())
    }

    /// Text block describing this element to a language model
    pub fn analysis_context(&self) -> String {
        let mut context = format!(
            "Type: {}\nName: {}\nSignature: {}\n",
            self.kind.description(),
            self.name,
            self.signature
        );
        if !self.parameters.is_empty() {
            context.push_str(&format!("Parameters: {}\n", self.parameters.join(", ")));
        }
        if !self.documentation.is_empty() {
            context.push_str(&format!("Documentation: {}\n", self.documentation));
        }
        if !self.annotations.is_empty() {
            context.push_str(&format!("Annotations: {}\n", self.annotations.join(", ")));
        }
        context
    }
}
