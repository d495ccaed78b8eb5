//! End-to-end generation over realistic component sources.

use std::path::PathBuf;

use testforge_core::{generate, SourceAnalyzer};

const BUTTON: &str = r#"
import React from 'react';

interface ButtonProps {
  /** Visible button text */
  label: string;
  onClick: (e: React.MouseEvent) => void;
  disabled?: boolean;
}

const Button = ({ label, onClick, disabled }: ButtonProps) => {
  return (
    <button className={disabled ? 'btn disabled' : 'btn'} onClick={onClick} disabled={disabled}>
      {label}
    </button>
  );
};

export default Button;
"#;

const SELECT: &str = r#"
import React from 'react';

interface SelectProps {
  options: string[];
  onChange: (value: string) => void;
  size?: 'small' | 'medium' | 'large';
  disabled?: boolean;
}

export const Select = ({ options, onChange, size, disabled }: SelectProps) => {
  return <select className={size} disabled={disabled} />;
};
"#;

fn suite_for(source: &str, path: &str) -> String {
    let model = SourceAnalyzer::new().analyze(source, &PathBuf::from(path));
    generate(&model)
}

#[test]
fn test_button_suite_covers_the_full_battery() {
    let suite = suite_for(BUTTON, "src/components/Button.tsx");

    assert!(suite.contains("import Button from '../Button';"));
    assert!(suite.contains("describe('Button', () => {"));

    assert!(suite.contains("it('renders with required props'"));
    assert!(suite.contains("screen.getByRole('button')"));
    assert!(suite.contains("it('applies the disabled state'"));
    assert!(suite.contains("it('invokes onClick when activated'"));
    assert!(suite.contains("fireEvent.click"));
    assert!(suite.contains("expect(handler).toHaveBeenCalledTimes(1);"));
    assert!(suite.contains("it('does not invoke onClick while disabled'"));
    assert!(suite.contains("expect(handler).not.toHaveBeenCalled();"));
    assert!(suite.contains("it('is keyboard focusable'"));
    assert!(suite.contains("it('exposes aria-disabled when disabled'"));
}

#[test]
fn test_button_required_props_are_always_bound() {
    let suite = suite_for(BUTTON, "src/components/Button.tsx");
    for line in suite.lines().filter(|l| l.contains("render(<Button")) {
        assert!(line.contains("label="), "missing label in: {line}");
        assert!(line.contains("onClick="), "missing onClick in: {line}");
    }
}

#[test]
fn test_select_suite_uses_combobox_role() {
    let suite = suite_for(SELECT, "src/components/Select.tsx");
    assert!(suite.contains("import { Select } from '../Select';"));
    assert!(suite.contains("screen.getByRole('combobox')"));
    assert!(!suite.contains("getByRole('button')"));
}

#[test]
fn test_select_union_yields_one_case_per_literal() {
    let suite = suite_for(SELECT, "src/components/Select.tsx");
    assert!(suite.contains("it('applies the small size'"));
    assert!(suite.contains("it('applies the medium size'"));
    assert!(suite.contains("it('applies the large size'"));
    assert!(suite.contains("size=\"small\""));
    assert!(suite.contains(".toContain('large')"));
}

#[test]
fn test_generation_is_deterministic() {
    let first = suite_for(BUTTON, "src/components/Button.tsx");
    let second = suite_for(BUTTON, "src/components/Button.tsx");
    assert_eq!(first, second);
}

#[test]
fn test_unidentifiable_source_still_yields_a_suite() {
    let suite = suite_for("const helper = () => 1;", "src/util.tsx");
    assert!(suite.contains("describe('Component'"));
    assert!(suite.contains("it('is keyboard focusable'"));
}
