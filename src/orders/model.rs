//! Order input rules

use crate::core::entity::{DATE_FORMAT, OrderInput};
use crate::core::error::ValidationErrors;
use crate::core::validation::validators::{
    date_format, integer_id, numeric, parse_id, string, string_length,
};
use crate::core::validation::{RuleSet, ValidatableEntity, rule};
use chrono::NaiveDate;
use serde_json::Value;
use std::sync::OnceLock;

static ORDER_RULES: OnceLock<RuleSet> = OnceLock::new();

/// Rules shared by create and update
pub fn order_rules() -> &'static RuleSet {
    ORDER_RULES.get_or_init(|| {
        RuleSet::new()
            .required(
                "legalization_date",
                vec![rule(date_format(DATE_FORMAT, "Y-m-d"))],
            )
            .required("address", vec![rule(string()), rule(string_length(3, 50))])
            .required("city", vec![rule(string()), rule(string_length(3, 50))])
            .optional("observation_id", vec![rule(numeric()), rule(integer_id())])
            .optional("causal_id", vec![rule(numeric()), rule(integer_id())])
    })
}

/// Fields a body that passed [`order_rules`] is guaranteed to carry
fn missing(field: &'static str) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(field, format!("El campo {} es obligatorio.", field.replace('_', " ")));
    errors
}

fn required_str<'a>(payload: &'a Value, field: &'static str) -> Result<&'a str, ValidationErrors> {
    payload
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| missing(field))
}

/// `None` when absent, `Some(None)` when `null`
fn foreign_key(payload: &Value, field: &'static str) -> Result<Option<Option<i64>>, ValidationErrors> {
    match payload.get(field) {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(None)),
        Some(value) => parse_id(value).map(|id| Some(Some(id))).ok_or_else(|| missing(field)),
    }
}

impl ValidatableEntity for OrderInput {
    fn rules() -> &'static RuleSet {
        order_rules()
    }

    /// Only reached once [`order_rules`] accepted the body, so the error
    /// paths here cannot be hit through the extractor.
    fn from_payload(payload: &Value) -> Result<Self, ValidationErrors> {
        let legalization_date = required_str(payload, "legalization_date")?;
        let legalization_date = NaiveDate::parse_from_str(legalization_date, DATE_FORMAT)
            .map_err(|_| missing("legalization_date"))?;

        Ok(OrderInput {
            legalization_date,
            address: required_str(payload, "address")?.to_string(),
            city: required_str(payload, "city")?.to_string(),
            observation_id: foreign_key(payload, "observation_id")?,
            causal_id: foreign_key(payload, "causal_id")?,
        })
    }
}
