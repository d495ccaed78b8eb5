//! Deterministic default values for props.
//!
//! Used wherever a prop must be supplied: the basic-render instantiation,
//! per-prop cases, and repair-time injection of missing required props.

use crate::domain::PropSpec;

/// Fixed human-readable literal for `label`/`text` props.
pub const HUMAN_READABLE_LITERAL: &str = "Click me";

/// A synthesized default value for one prop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    /// Bare presence flag (`disabled`).
    Flag,
    /// No-op closure (`onClick={() => {}}`).
    Closure,
    /// Numeric zero (`count={0}`).
    Zero,
    /// String literal (`label="Click me"`).
    Literal(String),
}

impl DefaultValue {
    /// Render as a JSX attribute.
    pub fn attribute(&self, name: &str) -> String {
        match self {
            DefaultValue::Flag => name.to_string(),
            DefaultValue::Closure => format!("{name}={{() => {{}}}}"),
            DefaultValue::Zero => format!("{name}={{0}}"),
            DefaultValue::Literal(value) => format!("{name}=\"{value}\""),
        }
    }

    /// The string literal value, when the default is one.
    pub fn literal(&self) -> Option<&str> {
        match self {
            DefaultValue::Literal(value) => Some(value),
            _ => None,
        }
    }
}

/// Default-value rule, in fixed precedence order.
pub fn default_value(prop: &PropSpec) -> DefaultValue {
    if prop.ty.is_callback() {
        return DefaultValue::Closure;
    }
    if prop.ty.is_boolean() {
        return DefaultValue::Flag;
    }
    if prop.ty.is_numeric() {
        return DefaultValue::Zero;
    }
    if prop.ty.is_union() {
        let alternatives = prop.ty.alternatives();
        if let Some(first) = alternatives.first() {
            return DefaultValue::Literal(first.clone());
        }
    }
    if prop.name == "label" || prop.name == "text" {
        return DefaultValue::Literal(HUMAN_READABLE_LITERAL.to_string());
    }
    DefaultValue::Literal(format!("test-{}", prop.name))
}

/// Rendered JSX attribute for a prop's synthesized default.
pub fn default_attribute(prop: &PropSpec) -> String {
    default_value(prop).attribute(&prop.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_default_is_noop_closure() {
        let prop = PropSpec::new("onClick", "(e: MouseEvent) => void", false);
        assert_eq!(default_attribute(&prop), "onClick={() => {}}");
    }

    #[test]
    fn test_boolean_default_is_bare_flag() {
        let prop = PropSpec::new("disabled", "boolean", true);
        assert_eq!(default_attribute(&prop), "disabled");
    }

    #[test]
    fn test_numeric_default_is_zero() {
        let prop = PropSpec::new("count", "number", false);
        assert_eq!(default_attribute(&prop), "count={0}");
    }

    #[test]
    fn test_union_default_is_first_literal() {
        let prop = PropSpec::new("size", "'small' | 'medium' | 'large'", true);
        assert_eq!(default_attribute(&prop), "size=\"small\"");
    }

    #[test]
    fn test_label_gets_human_readable_literal() {
        let prop = PropSpec::new("label", "string", false);
        assert_eq!(default_attribute(&prop), "label=\"Click me\"");

        let text = PropSpec::new("text", "string", false);
        assert_eq!(default_attribute(&text), "text=\"Click me\"");
    }

    #[test]
    fn test_fallback_placeholder_derived_from_name() {
        let prop = PropSpec::new("placeholder", "string", true);
        assert_eq!(default_attribute(&prop), "placeholder=\"test-placeholder\"");
    }

    #[test]
    fn test_callback_precedence_over_name_rules() {
        // a prop named `text` with a callback type is still a closure
        let prop = PropSpec::new("text", "() => string", false);
        assert_eq!(default_attribute(&prop), "text={() => {}}");
    }
}
