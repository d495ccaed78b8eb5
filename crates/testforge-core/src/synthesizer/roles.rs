//! Semantic role inference from component names.

/// Ordered keyword table; first match wins, default is `button`.
const ROLE_KEYWORDS: &[(&str, &str)] = &[
    ("button", "button"),
    ("input", "textbox"),
    ("select", "combobox"),
    ("checkbox", "checkbox"),
    ("radio", "radio"),
    ("link", "link"),
];

pub const DEFAULT_ROLE: &str = "button";

/// Infer the ARIA role the generated queries should target.
pub fn infer_role(component_name: &str) -> &'static str {
    let lower = component_name.to_lowercase();
    for (keyword, role) in ROLE_KEYWORDS {
        if lower.contains(keyword) {
            return role;
        }
    }
    DEFAULT_ROLE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_table() {
        assert_eq!(infer_role("IconButton"), "button");
        assert_eq!(infer_role("TextInput"), "textbox");
        assert_eq!(infer_role("Select"), "combobox");
        assert_eq!(infer_role("CheckboxGroup"), "checkbox");
        assert_eq!(infer_role("RadioOption"), "radio");
        assert_eq!(infer_role("NavLink"), "link");
    }

    #[test]
    fn test_default_role() {
        assert_eq!(infer_role("Card"), "button");
        assert_eq!(infer_role(""), "button");
    }
}
