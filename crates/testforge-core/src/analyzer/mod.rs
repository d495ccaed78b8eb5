//! Structural analysis of component source into a [`ComponentModel`].
//!
//! One parse, one pre-order depth-first walk. Analysis never fails:
//! malformed input degrades to a best-effort (possibly empty) model.

mod backend;

pub use backend::{ParserBackend, TsxBackend};

use std::path::Path;

use tracing::debug;
use tree_sitter::{Node, TreeCursor};

use crate::domain::{ComponentKind, ComponentModel, ImportRecord, PropSpec};

/// Interface/type-alias names ending with this suffix contribute props.
const PROPS_CONTRACT_SUFFIX: &str = "Props";

const MAX_WALK_DEPTH: usize = 50;

/// Analyzes component source text into a structural model.
pub struct SourceAnalyzer {
    backend: Box<dyn ParserBackend>,
}

impl SourceAnalyzer {
    pub fn new() -> Self {
        Self::with_backend(Box::new(TsxBackend::new()))
    }

    /// Use a specific grammar backend.
    pub fn with_backend(backend: Box<dyn ParserBackend>) -> Self {
        Self { backend }
    }

    /// Build a [`ComponentModel`] for one source file.
    ///
    /// Always returns a model; when the backend cannot produce a tree the
    /// model is empty apart from `source_path`.
    pub fn analyze(&mut self, source: &str, source_path: &Path) -> ComponentModel {
        let mut model = ComponentModel::empty(source_path);

        let Some(tree) = self.backend.parse(source) else {
            debug!(path = %source_path.display(), "parser produced no tree; returning empty model");
            return model;
        };

        let bytes = source.as_bytes();
        let mut cursor = tree.root_node().walk();
        visit(&mut model, &mut cursor, bytes, 0);
        model
    }
}

impl Default for SourceAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Pre-order depth-first visit; every node exactly once.
fn visit(model: &mut ComponentModel, cursor: &mut TreeCursor, source: &[u8], depth: usize) {
    let node = cursor.node();

    match node.kind() {
        "import_statement" => {
            if let Some(import) = extract_import(node, source) {
                model.imports.push(import);
            }
        }
        "interface_declaration" | "type_alias_declaration" => {
            extract_props_contract(model, node, source);
        }
        "function_declaration" => {
            if let Some(name) = node
                .child_by_field_name("name")
                .map(|n| node_text(n, source))
            {
                record_component(model, &name, ComponentKind::Functional);
            }
        }
        "variable_declarator" => {
            let is_function_value = node
                .child_by_field_name("value")
                .is_some_and(|v| matches!(v.kind(), "arrow_function" | "function_expression"));
            if is_function_value {
                if let Some(name) = node
                    .child_by_field_name("name")
                    .map(|n| node_text(n, source))
                {
                    record_component(model, &name, ComponentKind::Functional);
                }
            }
        }
        "class_declaration" => {
            if let Some(name) = node
                .child_by_field_name("name")
                .map(|n| node_text(n, source))
            {
                record_component(model, &name, ComponentKind::Class);
            }
        }
        "export_statement" => {
            extract_default_export(model, node, source);
        }
        _ => {}
    }

    if depth < MAX_WALK_DEPTH && cursor.goto_first_child() {
        loop {
            visit(model, cursor, source, depth + 1);
            if !cursor.goto_next_sibling() {
                break;
            }
        }
        cursor.goto_parent();
    }
}

/// Record a qualifying component declaration. Later declarations overwrite
/// earlier ones (traversal order, last one visited wins).
fn record_component(model: &mut ComponentModel, name: &str, kind: ComponentKind) {
    if !name.chars().next().is_some_and(|c| c.is_uppercase()) {
        return;
    }
    if !model.name.is_empty() && model.name != name {
        debug!(previous = %model.name, next = %name, "component identification overwrites earlier match");
    }
    model.name = name.to_string();
    model.kind = kind;
    model.exports.insert(name.to_string());
}

fn extract_import(node: Node, source: &[u8]) -> Option<ImportRecord> {
    let module = node
        .child_by_field_name("source")
        .map(|n| strip_quotes(&node_text(n, source)))?;

    let mut imports = Vec::new();
    let mut is_default = false;

    for i in 0..node.child_count() {
        let Some(child) = node.child(i) else { continue };
        if child.kind() != "import_clause" {
            continue;
        }
        for j in 0..child.child_count() {
            let Some(part) = child.child(j) else { continue };
            match part.kind() {
                "identifier" => {
                    is_default = true;
                    imports.push(node_text(part, source));
                }
                "named_imports" => {
                    for k in 0..part.child_count() {
                        let Some(spec) = part.child(k) else { continue };
                        if spec.kind() == "import_specifier" {
                            if let Some(name) = spec.child_by_field_name("name") {
                                imports.push(node_text(name, source));
                            }
                        }
                    }
                }
                _ => {}
            }
        }
    }

    Some(ImportRecord {
        source: module,
        imports,
        is_default,
    })
}

/// Append one `PropSpec` per member of a qualifying props contract.
///
/// Multiple qualifying declarations in one file append without
/// de-duplication.
fn extract_props_contract(model: &mut ComponentModel, node: Node, source: &[u8]) {
    let Some(name) = node
        .child_by_field_name("name")
        .map(|n| node_text(n, source))
    else {
        return;
    };
    if !name.ends_with(PROPS_CONTRACT_SUFFIX) {
        return;
    }

    // interface_declaration keeps members under `body`; type_alias under `value`
    let Some(body) = node
        .child_by_field_name("body")
        .or_else(|| node.child_by_field_name("value"))
    else {
        return;
    };

    for i in 0..body.child_count() {
        let Some(member) = body.child(i) else { continue };
        if member.kind() != "property_signature" {
            continue;
        }
        let Some(prop_name) = member
            .child_by_field_name("name")
            .map(|n| node_text(n, source))
        else {
            continue;
        };

        let optional = (0..member.child_count())
            .any(|j| member.child(j).is_some_and(|c| c.kind() == "?"));

        // type field is the annotation node; its text carries a leading ':'
        let ty = member
            .child_by_field_name("type")
            .map(|t| node_text(t, source))
            .map(|t| t.trim_start_matches(':').trim().to_string())
            .unwrap_or_default();

        let mut prop = PropSpec::new(prop_name, ty, optional);
        prop.description = doc_comment_before(member, source);
        model.props.push(prop);
    }
}

fn extract_default_export(model: &mut ComponentModel, node: Node, source: &[u8]) {
    let has_default = (0..node.child_count())
        .any(|i| node.child(i).is_some_and(|c| c.kind() == "default"));
    if !has_default {
        return;
    }
    for i in 0..node.child_count() {
        let Some(child) = node.child(i) else { continue };
        if child.kind() == "identifier" {
            model.has_default_export = true;
            model.exports.insert(node_text(child, source));
        }
    }
}

/// Doc comment from the immediately preceding sibling, cleaned of markers.
fn doc_comment_before(node: Node, source: &[u8]) -> Option<String> {
    let prev = node.prev_named_sibling()?;
    if prev.kind() != "comment" {
        return None;
    }
    let raw = node_text(prev, source);
    if !raw.starts_with("/**") && !raw.starts_with("//") {
        return None;
    }
    let cleaned = raw
        .trim_start_matches("/**")
        .trim_end_matches("*/")
        .lines()
        .map(|l| l.trim().trim_start_matches('*').trim_start_matches('/').trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

fn node_text(node: Node, source: &[u8]) -> String {
    node.utf8_text(source).unwrap_or("").to_string()
}

fn strip_quotes(text: &str) -> String {
    text.trim_matches(|c| c == '"' || c == '\'' || c == '`').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn analyze(source: &str) -> ComponentModel {
        SourceAnalyzer::new().analyze(source, &PathBuf::from("src/components/Button.tsx"))
    }

    const BUTTON: &str = r#"
import React from 'react';
import { clsx } from 'clsx';

interface ButtonProps {
  /** Visible button text */
  label: string;
  onClick: (e: React.MouseEvent) => void;
  disabled?: boolean;
  size?: 'small' | 'medium' | 'large';
}

const Button = ({ label, onClick, disabled, size }: ButtonProps) => {
  return <button onClick={onClick} disabled={disabled}>{label}</button>;
};

export default Button;
"#;

    #[test]
    fn test_analyze_imports() {
        let model = analyze(BUTTON);
        assert_eq!(model.imports.len(), 2);
        assert_eq!(model.imports[0].source, "react");
        assert!(model.imports[0].is_default);
        assert_eq!(model.imports[1].imports, vec!["clsx"]);
        assert!(!model.imports[1].is_default);
    }

    #[test]
    fn test_analyze_props_contract() {
        let model = analyze(BUTTON);
        let names: Vec<_> = model.props.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["label", "onClick", "disabled", "size"]);

        assert!(!model.props[0].optional);
        assert!(model.props[2].optional);
        assert!(model.props[1].ty.is_callback());
        assert!(model.props[3].ty.is_union());
        assert_eq!(
            model.props[0].description.as_deref(),
            Some("Visible button text")
        );
    }

    #[test]
    fn test_analyze_component_identity_and_default_export() {
        let model = analyze(BUTTON);
        assert_eq!(model.name, "Button");
        assert_eq!(model.kind, ComponentKind::Functional);
        assert!(model.has_default_export);
        assert!(model.exports.contains("Button"));
    }

    #[test]
    fn test_type_alias_contract_also_qualifies() {
        let model = analyze(
            "type CardProps = { title: string; elevated?: boolean };\n\
             export function Card(props: CardProps) { return <div/>; }",
        );
        assert_eq!(model.props.len(), 2);
        assert_eq!(model.name, "Card");
    }

    #[test]
    fn test_multiple_contracts_append_without_dedup() {
        let model = analyze(
            "interface BaseProps { id: string }\n\
             interface ExtraProps { id: string; extra?: boolean }\n\
             const Widget = () => <div/>;",
        );
        let ids = model.props.iter().filter(|p| p.name == "id").count();
        assert_eq!(ids, 2);
        assert_eq!(model.props.len(), 3);
    }

    #[test]
    fn test_last_visited_component_wins() {
        let model = analyze(
            "const First = () => <div/>;\n\
             const Second = () => <span/>;",
        );
        assert_eq!(model.name, "Second");
        assert!(model.exports.contains("First"));
        assert!(model.exports.contains("Second"));
    }

    #[test]
    fn test_lowercase_functions_ignored() {
        let model = analyze("const helper = () => 1;\nfunction format(v) { return v; }");
        assert!(model.name.is_empty());
    }

    #[test]
    fn test_class_component_kind() {
        let model = analyze(
            "class Toggle extends React.Component { render() { return <div/>; } }",
        );
        assert_eq!(model.name, "Toggle");
        assert_eq!(model.kind, ComponentKind::Class);
    }

    #[test]
    fn test_malformed_source_degrades_to_partial_model() {
        let model = analyze("const = => {{{ nonsense");
        // no panic, no error; best-effort model
        assert!(model.props.is_empty());
    }
}
