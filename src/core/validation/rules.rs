//! Declarative rule sets
//!
//! A [`RuleSet`] lists, per field, whether the field must be present and the
//! validators to run on its value. Validation never stops at the first
//! failing field: every field is checked so the caller gets the full picture.
//! Within a field, checks stop at the first failure.

use super::validators::{self, Validator};
use crate::config::AttributeLabels;
use crate::core::error::ValidationErrors;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Presence {
    /// Missing, `null` or blank values are rejected
    Required,
    /// Missing or `null` values skip the field's validators
    Optional,
}

struct FieldRules {
    field: &'static str,
    presence: Presence,
    validators: Vec<Validator>,
}

impl FieldRules {
    fn check(&self, label: &str, value: &Value) -> Result<(), String> {
        match self.presence {
            Presence::Required => validators::required()(label, value)?,
            Presence::Optional if value.is_null() => return Ok(()),
            Presence::Optional => {}
        }
        self.validators
            .iter()
            .try_for_each(|validate| validate(label, value))
    }
}

/// Ordered collection of field rules
#[derive(Default)]
pub struct RuleSet {
    fields: Vec<FieldRules>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mandatory field
    pub fn required(mut self, field: &'static str, validators: Vec<Validator>) -> Self {
        self.fields.push(FieldRules {
            field,
            presence: Presence::Required,
            validators,
        });
        self
    }

    /// Add a field that is only checked when sent
    pub fn optional(mut self, field: &'static str, validators: Vec<Validator>) -> Self {
        self.fields.push(FieldRules {
            field,
            presence: Presence::Optional,
            validators,
        });
        self
    }

    /// Check a JSON body against every rule
    ///
    /// A body that is not an object is treated as if every field were missing.
    pub fn validate(&self, payload: &Value, labels: &AttributeLabels) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for rules in &self.fields {
            let value = payload.get(rules.field).unwrap_or(&Value::Null);
            let label = labels.label_for(rules.field);
            if let Err(message) = rules.check(&label, value) {
                errors.add(rules.field, message);
            }
        }
        errors.into_result()
    }
}

/// Box a validator closure into the shared [`Validator`] type
pub fn rule<F>(validator: F) -> Validator
where
    F: Fn(&str, &Value) -> Result<(), String> + Send + Sync + 'static,
{
    Arc::new(validator)
}
