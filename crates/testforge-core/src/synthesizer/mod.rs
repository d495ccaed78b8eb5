//! Deterministic synthesis of a test suite from a [`ComponentModel`].
//!
//! [`generate`] is a pure function: identical models yield byte-identical
//! output. The repair loop depends on this for diffing, so nothing here may
//! consult clocks, randomness, or the filesystem.

pub mod cases;
pub mod defaults;
pub mod roles;

pub use cases::TestCase;
pub use defaults::{default_attribute, default_value, DefaultValue};
pub use roles::infer_role;

use crate::domain::ComponentModel;

/// Name used when analysis found no qualifying component declaration.
const FALLBACK_COMPONENT_NAME: &str = "Component";

/// Generate the full test-suite source for a model.
pub fn generate(model: &ComponentModel) -> String {
    let component = if model.name.is_empty() {
        FALLBACK_COMPONENT_NAME
    } else {
        &model.name
    };

    let mut out = String::new();
    out.push_str(&header(model, component));
    out.push('\n');
    out.push_str(&format!("describe('{component}', () => {{\n"));

    let battery = cases::build_cases(model, component);
    for (i, case) in battery.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&case.source_fragment);
    }

    out.push_str("});\n");
    out
}

/// File header: generated-file banner, testing-library imports, and the
/// component import derived from the analyzed source path.
fn header(model: &ComponentModel, component: &str) -> String {
    let module = component_module(model);
    let component_import = if model.has_default_export {
        format!("import {component} from '{module}';")
    } else {
        format!("import {{ {component} }} from '{module}';")
    };

    format!(
        "// Generated by testforge. Regenerate instead of editing by hand.\n\
         import React from 'react';\n\
         import {{ render, screen, fireEvent }} from '@testing-library/react';\n\
         import '@testing-library/jest-dom';\n\
         {component_import}\n"
    )
}

/// Canonical relative import path for the component under test.
///
/// The generated suite lives in `__tests__/` next to the component, so the
/// module specifier always points one directory up.
pub fn component_module(model: &ComponentModel) -> String {
    let stem = model
        .source_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| FALLBACK_COMPONENT_NAME.to_string());
    format!("../{stem}")
}
