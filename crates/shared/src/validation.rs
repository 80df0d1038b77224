//! Declarative field rules for submitted forms.
//!
//! A rule names a field, a predicate over its submitted text and the message
//! reported when the predicate fails. Running a rule set never short-circuits:
//! every failing field gets its own [`FieldError`], in rule order.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub message: &'static str,
    check: fn(&str) -> bool,
}

impl FieldRule {
    pub const fn new(field: &'static str, message: &'static str, check: fn(&str) -> bool) -> Self {
        Self {
            field,
            message,
            check,
        }
    }

    /// Fails on missing values and on values that are only whitespace.
    pub const fn not_empty(field: &'static str, message: &'static str) -> Self {
        Self::new(field, message, not_blank)
    }

    pub fn passes(&self, value: Option<&str>) -> bool {
        value.is_some_and(|value| (self.check)(value))
    }
}

fn not_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Anything whose fields can be looked up by name.
pub trait FieldSource {
    fn field(&self, name: &str) -> Option<&str>;
}

pub fn validate(rules: &[FieldRule], source: &impl FieldSource) -> Vec<FieldError> {
    rules
        .iter()
        .filter(|rule| !rule.passes(source.field(rule.field)))
        .map(|rule| FieldError::new(rule.field, rule.message))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    struct Fields(HashMap<&'static str, &'static str>);

    impl FieldSource for Fields {
        fn field(&self, name: &str) -> Option<&str> {
            self.0.get(name).copied()
        }
    }

    const RULES: [FieldRule; 2] = [
        FieldRule::not_empty("name", "Name is required"),
        FieldRule::not_empty("email", "Email is required"),
    ];

    #[test]
    fn reports_every_failing_field_in_rule_order() {
        let fields = Fields(HashMap::from([("name", "  ")]));
        let errors = validate(&RULES, &fields);
        assert_eq!(
            errors,
            vec![
                FieldError::new("name", "Name is required"),
                FieldError::new("email", "Email is required"),
            ]
        );
    }

    #[test]
    fn passing_fields_produce_no_errors() {
        let fields = Fields(HashMap::from([("name", "ada"), ("email", "ada@example.com")]));
        assert!(validate(&RULES, &fields).is_empty());
    }

    #[test]
    fn custom_predicates_are_honored() {
        let rule = FieldRule::new("code", "Code must be numeric", |value| {
            value.chars().all(|c| c.is_ascii_digit())
        });
        assert!(rule.passes(Some("123")));
        assert!(!rule.passes(Some("12a")));
        assert!(!rule.passes(None));
    }
}
