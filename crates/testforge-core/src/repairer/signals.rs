//! Classification of runner diagnostics into tagged failure signals.
//!
//! Detection is decoupled from rewriting: free-form diagnostic text is
//! parsed here into [`FailureSignal`] variants, and the rewrite table
//! dispatches purely on variants. Each rewrite rule is therefore
//! unit-testable with a constructed signal instead of captured output.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Assertion families with a documented robust-rewrite mapping.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AssertionFamily {
    Disabled,
    Loading,
    Size,
    Variant,
}

/// A classified diagnostic cause.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureSignal {
    /// Malformed quoted literal attribute value.
    StrayQuoting,
    /// Malformed zero-arg closure attribute syntax.
    MalformedClosure,
    /// Unresolved relative import of the component module.
    UnresolvedImport { path: String },
    /// Named import not exported by the module.
    NamedImportMissing { symbol: String },
    /// Role-based query found no element.
    RoleNotFound { role: String },
    /// Status-role query found no element.
    StatusRoleNotFound,
    /// Image-role query found no element.
    ImageRoleNotFound,
    /// Required prop missing at an instantiation site.
    MissingRequiredProp { prop: String },
    /// Class assertion mismatch within a known family.
    ClassAssertionMismatch { family: AssertionFamily },
    /// Text-based query found no element.
    TextNotFound { text: String },
}

macro_rules! cached_regex {
    ($name:ident, $pattern:expr) => {
        fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| Regex::new($pattern).expect("static pattern"))
        }
    };
}

cached_regex!(stray_quote_re, r#"=["']{2}|Unterminated string"#);
cached_regex!(broken_closure_re, r"\(\)\s*=\s+>|\(\)\s*=\s*>\s*\{;");
cached_regex!(
    unresolved_import_re,
    r"Cannot (?:find|resolve) module '(\.{1,2}/[^']*)'"
);
cached_regex!(
    named_import_re,
    r"(?:has no exported member '([A-Za-z_][A-Za-z0-9_]*)'|export '([A-Za-z_][A-Za-z0-9_]*)'[^\n]*was not found)"
);
cached_regex!(role_re, r#"with the role "([a-z]+)""#);
cached_regex!(
    required_prop_re,
    r"[Tt]he prop `([A-Za-z_][A-Za-z0-9_]*)` is marked as required"
);
cached_regex!(class_mismatch_re, r"className\b[^\n]*toContain|toContain[^\n]*className");
cached_regex!(text_query_re, r"with the text:?\s*([^\n]+)");

/// Parse diagnostic text into the ordered set of failure signals.
///
/// Order matches the rewrite table; duplicates are collapsed.
pub fn classify(diagnostics: &str) -> Vec<FailureSignal> {
    let mut signals = Vec::new();
    let mut push = |signal: FailureSignal| {
        if !signals.contains(&signal) {
            signals.push(signal);
        }
    };

    if stray_quote_re().is_match(diagnostics) {
        push(FailureSignal::StrayQuoting);
    }
    if broken_closure_re().is_match(diagnostics) {
        push(FailureSignal::MalformedClosure);
    }
    for caps in unresolved_import_re().captures_iter(diagnostics) {
        push(FailureSignal::UnresolvedImport {
            path: caps[1].to_string(),
        });
    }
    for caps in named_import_re().captures_iter(diagnostics) {
        let symbol = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().to_string());
        if let Some(symbol) = symbol {
            push(FailureSignal::NamedImportMissing { symbol });
        }
    }
    for caps in role_re().captures_iter(diagnostics) {
        match &caps[1] {
            "status" => push(FailureSignal::StatusRoleNotFound),
            "img" => push(FailureSignal::ImageRoleNotFound),
            role => push(FailureSignal::RoleNotFound {
                role: role.to_string(),
            }),
        }
    }
    for caps in required_prop_re().captures_iter(diagnostics) {
        push(FailureSignal::MissingRequiredProp {
            prop: caps[1].to_string(),
        });
    }
    if class_mismatch_re().is_match(diagnostics) {
        for family in families_mentioned(diagnostics) {
            push(FailureSignal::ClassAssertionMismatch { family });
        }
    }
    for caps in text_query_re().captures_iter(diagnostics) {
        // the literal may itself contain periods; only the sentence's
        // trailing one is punctuation
        let text = caps[1].trim().trim_end_matches('.').trim_end();
        push(FailureSignal::TextNotFound {
            text: text.to_string(),
        });
    }

    signals
}

fn families_mentioned(diagnostics: &str) -> Vec<AssertionFamily> {
    let mut families = Vec::new();
    let mut push = |family| {
        if !families.contains(&family) {
            families.push(family);
        }
    };
    if diagnostics.contains("disabled") {
        push(AssertionFamily::Disabled);
    }
    if diagnostics.contains("loading") {
        push(AssertionFamily::Loading);
    }
    for size in ["small", "medium", "large"] {
        if diagnostics.contains(size) {
            push(AssertionFamily::Size);
        }
    }
    for variant in ["variant", "primary", "secondary"] {
        if diagnostics.contains(variant) {
            push(AssertionFamily::Variant);
        }
    }
    families
}
