//! Structural component model produced by analysis.
//!
//! A [`ComponentModel`] is built fresh per analysis call from immutable
//! source text, feeds synthesis exactly once, and is discarded afterwards.
//! Nothing here is persisted.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Declaration style of the analyzed component.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    Functional,
    Class,
}

/// Literal source text of a prop type annotation.
///
/// No type resolution happens here; the descriptor carries exactly what the
/// source said and answers shape questions by inspecting that text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct TypeDescriptor(String);

impl TypeDescriptor {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into().trim().to_string())
    }

    /// The literal annotation text.
    pub fn raw(&self) -> &str {
        &self.0
    }

    pub fn is_boolean(&self) -> bool {
        self.0 == "boolean"
    }

    pub fn is_string(&self) -> bool {
        self.0 == "string"
    }

    pub fn is_numeric(&self) -> bool {
        self.0 == "number"
    }

    /// Whether the annotation denotes a callback (any arrow-function type).
    pub fn is_callback(&self) -> bool {
        self.0.contains("=>")
    }

    /// Whether the annotation denotes a zero-argument callback.
    pub fn is_zero_arg_callback(&self) -> bool {
        let Some((params, _)) = self.0.split_once("=>") else {
            return false;
        };
        let params = params.trim();
        params == "()" || params == "( )"
    }

    pub fn is_union(&self) -> bool {
        self.0.contains('|')
    }

    /// The `|`-split, trimmed, quote-stripped literal alternatives.
    ///
    /// Non-empty whenever [`is_union`](Self::is_union) holds: even a
    /// degenerate union text yields at least one alternative.
    pub fn alternatives(&self) -> Vec<String> {
        self.0
            .split('|')
            .map(|alt| alt.trim().trim_matches(|c| c == '\'' || c == '"').to_string())
            .filter(|alt| !alt.is_empty())
            .collect()
    }
}

/// One configurable input from a component's props contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PropSpec {
    /// Prop name as declared.
    pub name: String,

    /// Literal type annotation text.
    pub ty: TypeDescriptor,

    /// Whether the member was declared optional (`?`).
    pub optional: bool,

    /// Leading doc comment, when one was attached.
    pub description: Option<String>,
}

impl PropSpec {
    pub fn new(name: impl Into<String>, ty: impl Into<String>, optional: bool) -> Self {
        Self {
            name: name.into(),
            ty: TypeDescriptor::new(ty),
            optional,
            description: None,
        }
    }

    /// Whether this prop names an event handler or is a zero-arg callback.
    pub fn is_handler(&self) -> bool {
        self.name.starts_with("on") || self.ty.is_zero_arg_callback()
    }
}

/// One import declaration from the component source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportRecord {
    /// Module specifier text.
    pub source: String,

    /// Imported symbol names.
    pub imports: Vec<String>,

    /// Whether the first symbol is a default import.
    pub is_default: bool,
}

/// Structural summary of one component source file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentModel {
    /// Component name; empty when no qualifying declaration was found.
    pub name: String,

    /// Declaration style.
    pub kind: ComponentKind,

    /// Props in declaration order. Multiple qualifying contract
    /// declarations append without de-duplication.
    pub props: Vec<PropSpec>,

    /// Import declarations in source order.
    pub imports: Vec<ImportRecord>,

    /// Exported identifiers.
    pub exports: BTreeSet<String>,

    /// Whether the file default-exports an identifier.
    pub has_default_export: bool,

    /// Path the source was read from.
    pub source_path: PathBuf,
}

impl ComponentModel {
    /// An empty model for a source file, used when analysis degrades.
    pub fn empty(source_path: impl Into<PathBuf>) -> Self {
        Self {
            name: String::new(),
            kind: ComponentKind::Functional,
            props: Vec::new(),
            imports: Vec::new(),
            exports: BTreeSet::new(),
            has_default_export: false,
            source_path: source_path.into(),
        }
    }

    /// Required (non-optional) props in declaration order.
    pub fn required_props(&self) -> impl Iterator<Item = &PropSpec> {
        self.props.iter().filter(|p| !p.optional)
    }

    /// Look up a prop by name.
    pub fn prop(&self, name: &str) -> Option<&PropSpec> {
        self.props.iter().find(|p| p.name == name)
    }

    /// Whether any prop has the given name.
    pub fn has_prop(&self, name: &str) -> bool {
        self.prop(name).is_some()
    }
}
