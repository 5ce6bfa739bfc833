//! Declarative entity validation.
//!
//! Each entity registers one rule per field (by field name) plus an optional
//! whole-object rule at definition time, through its [`Validated`] impl.
//! Rules run before every persist operation unless disabled through the
//! [`ValidationConfig`] the caller threads in; there is no process-wide
//! mutable switch.
//!
//! All field-rule violations are collected (not short-circuited) into a
//! single [`ValidationErrors`] keyed by field name; the object rule's
//! violations merge into the same structure, and the aggregate is returned
//! once. Callers such as API layers need every violation in one pass.

use std::collections::BTreeMap;

use serde::Serialize;

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    code: &'static str,
    message: String,
}

impl Violation {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// A value that is present but not acceptable.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new("invalid", message)
    }

    /// A value that must be provided but is missing.
    pub fn required(message: impl Into<String>) -> Self {
        Self::new("required", message)
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Aggregate of all violations found while validating one entity.
///
/// Field violations are keyed by field name; object-level violations are
/// kept separately. Recoverable: the caller corrects the input and retries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    field_errors: BTreeMap<&'static str, Vec<Violation>>,
    object_errors: Vec<Violation>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.field_errors.is_empty() && self.object_errors.is_empty()
    }

    pub fn push_field(&mut self, field: &'static str, violation: Violation) {
        self.field_errors.entry(field).or_default().push(violation);
    }

    pub fn push_object(&mut self, violation: Violation) {
        self.object_errors.push(violation);
    }

    pub fn field_errors(&self) -> &BTreeMap<&'static str, Vec<Violation>> {
        &self.field_errors
    }

    pub fn object_errors(&self) -> &[Violation] {
        &self.object_errors
    }

    /// Violations recorded against a specific field.
    pub fn for_field(&self, field: &str) -> &[Violation] {
        self.field_errors
            .get(field)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl core::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "validation failed")?;
        for (field, violations) in &self.field_errors {
            for violation in violations {
                write!(f, "; {}: {}", field, violation.message())?;
            }
        }
        for violation in &self.object_errors {
            write!(f, "; {}", violation.message())?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Validation behavior, passed explicitly to whatever runs the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Master switch. Disabling skips validation entirely; use with caution,
    /// invalid instances can then be persisted.
    pub enabled: bool,
    /// Also run rules registered for non-editable fields (`created_by`,
    /// `updated_by`).
    pub include_non_editable: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            include_non_editable: false,
        }
    }
}

/// A per-field rule, registered under the field's name.
pub struct FieldRule<T> {
    field: &'static str,
    editable: bool,
    check: fn(&T) -> Result<(), Violation>,
}

/// Table of an entity's validation rules.
///
/// At most one rule per field plus one whole-object rule, built once in the
/// entity's [`Validated::validator`].
pub struct Validator<T> {
    field_rules: Vec<FieldRule<T>>,
    object_rule: Option<fn(&T) -> Vec<Violation>>,
}

impl<T> Validator<T> {
    pub fn new() -> Self {
        Self {
            field_rules: Vec::new(),
            object_rule: None,
        }
    }

    /// Register a rule for a user-editable field.
    pub fn field(mut self, field: &'static str, check: fn(&T) -> Result<(), Violation>) -> Self {
        self.field_rules.push(FieldRule {
            field,
            editable: true,
            check,
        });
        self
    }

    /// Register a rule for a non-editable field.
    ///
    /// These only fire when [`ValidationConfig::include_non_editable`] is set.
    pub fn non_editable_field(
        mut self,
        field: &'static str,
        check: fn(&T) -> Result<(), Violation>,
    ) -> Self {
        self.field_rules.push(FieldRule {
            field,
            editable: false,
            check,
        });
        self
    }

    /// Register the whole-object rule, run after field rules.
    pub fn object(mut self, check: fn(&T) -> Vec<Violation>) -> Self {
        self.object_rule = Some(check);
        self
    }

    /// Run the rules, collecting every violation before reporting.
    pub fn validate(
        &self,
        value: &T,
        config: &ValidationConfig,
        exclude: &[&str],
    ) -> Result<(), ValidationErrors> {
        if !config.enabled {
            return Ok(());
        }

        let mut errors = ValidationErrors::default();

        for rule in &self.field_rules {
            if exclude.contains(&rule.field) {
                continue;
            }
            if !rule.editable && !config.include_non_editable {
                continue;
            }
            if let Err(violation) = (rule.check)(value) {
                errors.push_field(rule.field, violation);
            }
        }

        if let Some(object_rule) = self.object_rule {
            for violation in object_rule(value) {
                errors.push_object(violation);
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl<T> Default for Validator<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// An entity with registered validation rules.
pub trait Validated: Sized {
    /// Build this entity's rule table.
    fn validator() -> Validator<Self>;

    /// Validate this instance under the given configuration.
    fn validate(&self, config: &ValidationConfig, exclude: &[&str]) -> Result<(), ValidationErrors> {
        Self::validator().validate(self, config, exclude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Person {
        name: String,
        age: i64,
    }

    impl Validated for Person {
        fn validator() -> Validator<Self> {
            Validator::new()
                .field("name", |p: &Person| {
                    if p.name.len() < 3 {
                        Err(Violation::invalid("a valid name has at least 3 characters"))
                    } else {
                        Ok(())
                    }
                })
                .field("age", |p: &Person| {
                    if p.age < 0 {
                        Err(Violation::invalid("age cannot be negative"))
                    } else {
                        Ok(())
                    }
                })
                .non_editable_field("created_by", |_| {
                    Err(Violation::invalid("always fails, for the config tests"))
                })
                .object(|p: &Person| {
                    if p.name == "root" && p.age == 0 {
                        vec![Violation::invalid("root must have an age")]
                    } else {
                        Vec::new()
                    }
                })
        }
    }

    #[test]
    fn collects_all_field_violations_in_one_error() {
        let person = Person {
            name: "ab".into(),
            age: -1,
        };

        let errors = person
            .validate(&ValidationConfig::default(), &[])
            .unwrap_err();

        assert_eq!(errors.for_field("name").len(), 1);
        assert_eq!(errors.for_field("age").len(), 1);
    }

    #[test]
    fn object_rule_violations_merge_into_the_same_error() {
        let person = Person {
            name: "root".into(),
            age: 0,
        };

        let errors = person
            .validate(&ValidationConfig::default(), &[])
            .unwrap_err();

        assert!(errors.for_field("name").is_empty());
        assert_eq!(errors.object_errors().len(), 1);
    }

    #[test]
    fn excluded_fields_are_skipped() {
        let person = Person {
            name: "ab".into(),
            age: 30,
        };

        assert!(
            person
                .validate(&ValidationConfig::default(), &["name"])
                .is_ok()
        );
    }

    #[test]
    fn non_editable_rules_fire_only_when_configured() {
        let person = Person {
            name: "alice".into(),
            age: 30,
        };

        assert!(person.validate(&ValidationConfig::default(), &[]).is_ok());

        let config = ValidationConfig {
            include_non_editable: true,
            ..ValidationConfig::default()
        };
        let errors = person.validate(&config, &[]).unwrap_err();
        assert_eq!(errors.for_field("created_by").len(), 1);
    }

    #[test]
    fn disabled_validation_skips_everything() {
        let person = Person {
            name: "".into(),
            age: -5,
        };

        let config = ValidationConfig {
            enabled: false,
            ..ValidationConfig::default()
        };
        assert!(person.validate(&config, &[]).is_ok());
    }
}
