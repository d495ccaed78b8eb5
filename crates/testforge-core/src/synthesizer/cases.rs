//! The fixed, ordered battery of test case generators.
//!
//! Case generators run in a fixed order over the model so that identical
//! models always produce an identical case list. Each case carries its
//! source fragment; the synthesizer concatenates the fragments.

use crate::domain::{ComponentModel, PropSpec};

use super::defaults::{default_attribute, default_value};
use super::roles::infer_role;

/// One generated test case. Ephemeral: exists only during synthesis.
#[derive(Debug, Clone)]
pub struct TestCase {
    pub name: String,
    pub description: String,
    pub source_fragment: String,
}

impl TestCase {
    fn new(name: &str, description: &str, source_fragment: String) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            source_fragment,
        }
    }
}

/// Run the full battery in its fixed order.
pub fn build_cases(model: &ComponentModel, component: &str) -> Vec<TestCase> {
    let role = infer_role(component);
    let mut cases = Vec::new();

    cases.push(basic_render_case(model, component, role));
    per_prop_cases(model, component, role, &mut cases);
    handler_cases(model, component, role, &mut cases);
    conditional_render_cases(model, component, &mut cases);
    accessibility_cases(model, component, role, &mut cases);

    cases
}

/// `<Name attr attr />` with required props supplied via the default-value
/// rule, plus any extra attributes not already covering a required prop.
fn instantiation(model: &ComponentModel, component: &str, extras: &[(&str, String)]) -> String {
    let mut attrs: Vec<String> = Vec::new();
    for prop in model.required_props() {
        match extras.iter().find(|(name, _)| *name == prop.name) {
            Some((_, attr)) => attrs.push(attr.clone()),
            None => attrs.push(default_attribute(prop)),
        }
    }
    for (name, attr) in extras {
        if !model.required_props().any(|p| p.name == *name) {
            attrs.push(attr.clone());
        }
    }
    if attrs.is_empty() {
        format!("<{component} />")
    } else {
        format!("<{component} {} />", attrs.join(" "))
    }
}

fn basic_render_case(model: &ComponentModel, component: &str, role: &str) -> TestCase {
    let jsx = instantiation(model, component, &[]);
    TestCase::new(
        "renders with required props",
        "basic render resolves the component's semantic role",
        format!(
            "  it('renders with required props', () => {{\n\
             \x20   render({jsx});\n\
             \x20   expect(screen.getByRole('{role}')).toBeInTheDocument();\n\
             \x20 }});\n"
        ),
    )
}

/// Per-prop cases by type descriptor: boolean toggle, string display,
/// one case per union literal.
fn per_prop_cases(model: &ComponentModel, component: &str, role: &str, cases: &mut Vec<TestCase>) {
    for prop in &model.props {
        if prop.ty.is_boolean() {
            cases.push(boolean_toggle_case(model, component, role, prop));
        } else if prop.ty.is_union() {
            for literal in prop.ty.alternatives() {
                cases.push(union_literal_case(model, component, role, prop, &literal));
            }
        } else if prop.ty.is_string() {
            cases.push(string_display_case(model, component, prop));
        }
    }
}

fn boolean_toggle_case(
    model: &ComponentModel,
    component: &str,
    role: &str,
    prop: &PropSpec,
) -> TestCase {
    let name = format!("applies the {} state", prop.name);
    let jsx = instantiation(model, component, &[(&prop.name, prop.name.clone())]);
    let fragment = format!(
        "  it('{name}', () => {{\n\
         \x20   render({jsx});\n\
         \x20   const element = screen.getByRole('{role}');\n\
         \x20   expect(element.className).toContain('{}');\n\
         \x20 }});\n",
        prop.name
    );
    TestCase::new(&name, "boolean prop toggles a class", fragment)
}

fn string_display_case(model: &ComponentModel, component: &str, prop: &PropSpec) -> TestCase {
    let value = default_value(prop);
    let literal = value.literal().unwrap_or_default().to_string();
    let name = format!("displays the {} value", prop.name);
    let jsx = instantiation(model, component, &[(&prop.name, value.attribute(&prop.name))]);
    let fragment = format!(
        "  it('{name}', () => {{\n\
         \x20   render({jsx});\n\
         \x20   expect(screen.getByText('{literal}')).toBeInTheDocument();\n\
         \x20 }});\n"
    );
    TestCase::new(&name, "string prop value is rendered", fragment)
}

fn union_literal_case(
    model: &ComponentModel,
    component: &str,
    role: &str,
    prop: &PropSpec,
    literal: &str,
) -> TestCase {
    let name = format!("applies the {literal} {}", prop.name);
    let attr = format!("{}=\"{literal}\"", prop.name);
    let jsx = instantiation(model, component, &[(&prop.name, attr)]);
    let fragment = format!(
        "  it('{name}', () => {{\n\
         \x20   render({jsx});\n\
         \x20   const element = screen.getByRole('{role}');\n\
         \x20   expect(element.className).toContain('{literal}');\n\
         \x20 }});\n"
    );
    TestCase::new(&name, "union literal derives a class name", fragment)
}

/// Invocation case per handler prop; a suppression case when `disabled`
/// coexists.
fn handler_cases(model: &ComponentModel, component: &str, role: &str, cases: &mut Vec<TestCase>) {
    let has_disabled = model.has_prop("disabled");
    for prop in &model.props {
        if !prop.is_handler() {
            continue;
        }

        let name = format!("invokes {} when activated", prop.name);
        let handler_attr = format!("{}={{handler}}", prop.name);
        let jsx = instantiation(model, component, &[(&prop.name, handler_attr.clone())]);
        cases.push(TestCase::new(
            &name,
            "handler fires exactly once per activation",
            format!(
                "  it('{name}', () => {{\n\
                 \x20   const handler = jest.fn();\n\
                 \x20   render({jsx});\n\
                 \x20   fireEvent.click(screen.getByRole('{role}'));\n\
                 \x20   expect(handler).toHaveBeenCalledTimes(1);\n\
                 \x20 }});\n"
            ),
        ));

        if has_disabled {
            let name = format!("does not invoke {} while disabled", prop.name);
            let jsx = instantiation(
                model,
                component,
                &[(&prop.name, handler_attr), ("disabled", "disabled".to_string())],
            );
            cases.push(TestCase::new(
                &name,
                "disabled suppresses the handler",
                format!(
                    "  it('{name}', () => {{\n\
                     \x20   const handler = jest.fn();\n\
                     \x20   render({jsx});\n\
                     \x20   fireEvent.click(screen.getByRole('{role}'));\n\
                     \x20   expect(handler).not.toHaveBeenCalled();\n\
                     \x20 }});\n"
                ),
            ));
        }
    }
}

/// Conditional-rendering cases gated on specific prop names.
fn conditional_render_cases(model: &ComponentModel, component: &str, cases: &mut Vec<TestCase>) {
    if let Some(prop) = model.prop("loading") {
        let jsx = instantiation(model, component, &[("loading", default_attribute(prop))]);
        cases.push(TestCase::new(
            "shows a status indicator while loading",
            "loading renders a status-role element",
            format!(
                "  it('shows a status indicator while loading', () => {{\n\
                 \x20   render({jsx});\n\
                 \x20   expect(screen.getByRole('status')).toBeInTheDocument();\n\
                 \x20 }});\n"
            ),
        ));
    }

    if let Some(prop) = model.prop("icon") {
        let jsx = instantiation(model, component, &[("icon", default_attribute(prop))]);
        cases.push(TestCase::new(
            "renders the icon element when provided",
            "icon renders an icon-identified element",
            format!(
                "  it('renders the icon element when provided', () => {{\n\
                 \x20   render({jsx});\n\
                 \x20   expect(screen.getByTestId('icon')).toBeInTheDocument();\n\
                 \x20 }});\n"
            ),
        ));
    }
}

/// Keyboard focusability always; aria-disabled only when the prop exists.
fn accessibility_cases(model: &ComponentModel, component: &str, role: &str, cases: &mut Vec<TestCase>) {
    let jsx = instantiation(model, component, &[]);
    cases.push(TestCase::new(
        "is keyboard focusable",
        "element accepts programmatic focus",
        format!(
            "  it('is keyboard focusable', () => {{\n\
             \x20   render({jsx});\n\
             \x20   const element = screen.getByRole('{role}');\n\
             \x20   element.focus();\n\
             \x20   expect(element).toHaveFocus();\n\
             \x20 }});\n"
        ),
    ));

    if model.has_prop("disabled") {
        let jsx = instantiation(model, component, &[("disabled", "disabled".to_string())]);
        cases.push(TestCase::new(
            "exposes aria-disabled when disabled",
            "disabled surfaces through aria-disabled",
            format!(
                "  it('exposes aria-disabled when disabled', () => {{\n\
                 \x20   render({jsx});\n\
                 \x20   expect(screen.getByRole('{role}')).toHaveAttribute('aria-disabled');\n\
                 \x20 }});\n"
            ),
        ));
    }
}
