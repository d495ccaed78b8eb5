//! Textual repair of generated test source.
//!
//! An ordered table of independent rewrite rules, each dispatched by a
//! [`FailureSignal`] variant. Every rule is a scoped find/replace confined
//! to the test source; the component source is never touched. More than one
//! rule may fire per call.
//!
//! Convergence contract: output identical to input means "no further
//! progress possible" — the caller must not treat it as success.

mod signals;

pub use signals::{classify, AssertionFamily, FailureSignal};

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::domain::{ComponentModel, PropSpec};
use crate::synthesizer::{component_module, default_attribute};

/// Apply every fired rule, in table order, to the test source.
pub fn repair(test_source: &str, signals: &[FailureSignal], model: &ComponentModel) -> String {
    let mut source = test_source.to_string();
    for signal in signals {
        let revised = apply_rule(&source, signal, model);
        if revised != source {
            debug!(?signal, "repair rule fired");
            source = revised;
        }
    }
    source
}

/// Classify diagnostics and repair in one step.
pub fn repair_with_diagnostics(
    test_source: &str,
    diagnostics: &str,
    model: &ComponentModel,
) -> String {
    let signals = classify(diagnostics);
    repair(test_source, &signals, model)
}

fn apply_rule(source: &str, signal: &FailureSignal, model: &ComponentModel) -> String {
    match signal {
        FailureSignal::StrayQuoting => strip_stray_quoting(source),
        FailureSignal::MalformedClosure => normalize_closures(source),
        FailureSignal::UnresolvedImport { path } => rewrite_import_path(source, path, model),
        FailureSignal::NamedImportMissing { symbol } => named_to_default_import(source, symbol),
        FailureSignal::RoleNotFound { role } => role_to_fallback_query(source, role),
        FailureSignal::StatusRoleNotFound => {
            source.replace("screen.getByRole('status')", "screen.getByTestId('loading')")
        }
        FailureSignal::ImageRoleNotFound => {
            source.replace("screen.getByRole('img')", "screen.getByTestId('icon')")
        }
        FailureSignal::MissingRequiredProp { prop } => inject_required_prop(source, prop, model),
        FailureSignal::ClassAssertionMismatch { family } => {
            rewrite_class_assertions(source, *family)
        }
        FailureSignal::TextNotFound { text } => text_to_testid_query(source, text, model),
    }
}

macro_rules! cached_regex {
    ($name:ident, $pattern:expr) => {
        fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| Regex::new($pattern).expect("static pattern"))
        }
    };
}

cached_regex!(doubled_quote_re, r#"=""([^"]*)"""#);
cached_regex!(doubled_single_quote_re, r#"=''([^']*)''"#);
cached_regex!(inner_single_quote_re, r#"="'([^"']*)'""#);
cached_regex!(broken_closure_src_re, r"\(\)\s*=\s*>\s*\{\s*\}");
cached_regex!(class_contains_re, r"expect\(element\.className\)\.toContain\('([^']+)'\);");

/// Strip extraneous quoting from attribute literals. Covers every shape
/// the classifier's gate fires on: doubled double quotes, doubled single
/// quotes, and single quotes nested inside double quotes.
fn strip_stray_quoting(source: &str) -> String {
    let pass = doubled_quote_re().replace_all(source, "=\"$1\"");
    let pass = doubled_single_quote_re().replace_all(&pass, "=\"$1\"");
    inner_single_quote_re().replace_all(&pass, "=\"$1\"").to_string()
}

/// Normalize any malformed zero-arg closure to the canonical literal.
fn normalize_closures(source: &str) -> String {
    broken_closure_src_re()
        .replace_all(source, "() => {}")
        .to_string()
}

/// Rewrite a broken relative import to the analyzer-derived canonical path.
fn rewrite_import_path(source: &str, broken: &str, model: &ComponentModel) -> String {
    let canonical = component_module(model);
    if broken == canonical {
        return source.to_string();
    }
    source.replace(&format!("'{broken}'"), &format!("'{canonical}'"))
}

/// Convert `import { X } from ...` to a default import of `X`.
fn named_to_default_import(source: &str, symbol: &str) -> String {
    source.replace(
        &format!("import {{ {symbol} }} from"),
        &format!("import {symbol} from"),
    )
}

/// Replace a failed role query with the fixed fallback test-id query.
fn role_to_fallback_query(source: &str, role: &str) -> String {
    source.replace(
        &format!("screen.getByRole('{role}')"),
        "screen.getByTestId('root')",
    )
}

/// Inject a missing required prop, with its synthesized default, into every
/// instantiation site that lacks it.
fn inject_required_prop(source: &str, prop: &str, model: &ComponentModel) -> String {
    let attr = match model.prop(prop) {
        Some(spec) => default_attribute(spec),
        // Prop unknown to the model: fall back to the placeholder rule.
        None => default_attribute(&PropSpec::new(prop, "string", false)),
    };

    let component = if model.name.is_empty() {
        return source.to_string();
    } else {
        model.name.as_str()
    };

    let opening = format!("<{component}");
    let mut out = String::with_capacity(source.len());
    let mut rest = source;
    while let Some(start) = rest.find(&opening) {
        let after = start + opening.len();
        // must be a real tag boundary, not a longer identifier
        let boundary = rest[after..]
            .chars()
            .next()
            .is_some_and(|c| c == ' ' || c == '/' || c == '>');
        let end = rest[after..].find("/>").map(|i| after + i);
        match (boundary, end) {
            (true, Some(end)) if !rest[start..end].contains(&format!("{prop}=")) && !has_flag(&rest[start..end], prop) => {
                out.push_str(&rest[..after]);
                out.push(' ');
                out.push_str(&attr);
                out.push_str(&rest[after..end]);
                rest = &rest[end..];
            }
            _ => {
                out.push_str(&rest[..after]);
                rest = &rest[after..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Whether an instantiation snippet already carries `prop` as a bare flag.
fn has_flag(snippet: &str, prop: &str) -> bool {
    snippet
        .split_whitespace()
        .any(|token| token == prop || token.trim_end_matches("/>") == prop)
}

/// Documented family mapping: replace brittle class-containment assertions
/// with the robust form for the family.
///
/// disabled → `toBeDisabled()`; loading → `aria-busy` attribute; size and
/// variant literals → case-insensitive class containment.
fn rewrite_class_assertions(source: &str, family: AssertionFamily) -> String {
    class_contains_re()
        .replace_all(source, |caps: &regex::Captures| {
            let literal = &caps[1];
            if family_of(literal) == Some(family) {
                match family {
                    AssertionFamily::Disabled => "expect(element).toBeDisabled();".to_string(),
                    AssertionFamily::Loading => {
                        "expect(element).toHaveAttribute('aria-busy', 'true');".to_string()
                    }
                    AssertionFamily::Size | AssertionFamily::Variant => format!(
                        "expect(element.className.toLowerCase()).toContain('{}');",
                        literal.to_lowercase()
                    ),
                }
            } else {
                caps[0].to_string()
            }
        })
        .to_string()
}

fn family_of(literal: &str) -> Option<AssertionFamily> {
    match literal {
        "disabled" => Some(AssertionFamily::Disabled),
        "loading" => Some(AssertionFamily::Loading),
        "small" | "medium" | "large" => Some(AssertionFamily::Size),
        "primary" | "secondary" | "variant" => Some(AssertionFamily::Variant),
        _ => None,
    }
}

/// Replace a failed text query with a test-id query derived from the prop
/// whose synthesized default produced that text.
fn text_to_testid_query(source: &str, text: &str, model: &ComponentModel) -> String {
    let prop = model.props.iter().find(|p| {
        crate::synthesizer::default_value(p)
            .literal()
            .is_some_and(|lit| lit == text)
    });
    let Some(prop) = prop else {
        return source.to_string();
    };
    source.replace(
        &format!("screen.getByText('{text}')"),
        &format!("screen.getByTestId('{}')", prop.name),
    )
}
