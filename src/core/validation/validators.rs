//! Reusable field validators
//!
//! Each validator receives the field's display label and its raw JSON value,
//! and returns the message to report when the value is rejected.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Signature shared by every validator
pub type Validator = std::sync::Arc<dyn Fn(&str, &Value) -> Result<(), String> + Send + Sync>;

static NUMERIC_REGEX: OnceLock<Regex> = OnceLock::new();

fn numeric_regex() -> &'static Regex {
    NUMERIC_REGEX.get_or_init(|| {
        Regex::new(r"^\s*[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?\s*$")
            .expect("numeric pattern is valid")
    })
}

/// Read a JSON number or numeric string as `f64`
pub fn parse_numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if numeric_regex().is_match(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Read a numeric value as an integer id, truncating any fraction
pub fn parse_id(value: &Value) -> Option<i64> {
    if let Some(id) = value.as_i64() {
        return Some(id);
    }
    if let Value::String(s) = value {
        if let Ok(id) = s.trim().parse::<i64>() {
            return Some(id);
        }
    }
    parse_numeric(value)
        .filter(|n| n.is_finite() && *n >= i64::MIN as f64 && *n < i64::MAX as f64)
        .map(|n| n.trunc() as i64)
}

/// Validator: field is present and not blank
pub fn required() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |label: &str, value: &Value| {
        let blank = match value {
            Value::Null => true,
            Value::String(s) => s.trim().is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        };
        if blank {
            Err(format!("El campo {} es obligatorio.", label))
        } else {
            Ok(())
        }
    }
}

/// Validator: value is a JSON string
pub fn string() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |label: &str, value: &Value| {
        if value.is_string() {
            Ok(())
        } else {
            Err(format!("El campo {} debe ser una cadena de caracteres.", label))
        }
    }
}

/// Validator: string length (in characters) must be within range
pub fn string_length(
    min: usize,
    max: usize,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |label: &str, value: &Value| {
        if let Some(s) = value.as_str() {
            let len = s.chars().count();
            if len < min {
                Err(format!(
                    "El campo {} debe tener al menos {} caracteres.",
                    label, min
                ))
            } else if len > max {
                Err(format!(
                    "El campo {} no debe ser mayor que {} caracteres.",
                    label, max
                ))
            } else {
                Ok(())
            }
        } else {
            Ok(())
        }
    }
}

/// Validator: string is a date written exactly in `format`
///
/// The parsed date is formatted back and compared with the input, so
/// `2024-1-5` and `2024-02-30` are both rejected for `%Y-%m-%d`.
/// `display` is the layout shown to the caller.
pub fn date_format(
    format: &'static str,
    display: &'static str,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |label: &str, value: &Value| {
        let matches = value.as_str().is_some_and(|s| {
            chrono::NaiveDate::parse_from_str(s, format)
                .is_ok_and(|date| date.format(format).to_string() == s)
        });
        if matches {
            Ok(())
        } else {
            Err(format!(
                "El campo {} debe coincidir con el formato {}.",
                label, display
            ))
        }
    }
}

/// Validator: number or numeric string
pub fn numeric() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |label: &str, value: &Value| {
        if parse_numeric(value).is_some() {
            Ok(())
        } else {
            Err(format!("El campo {} debe ser un número.", label))
        }
    }
}

/// Validator: value can be stored as a 64-bit record id
pub fn integer_id() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |label: &str, value: &Value| {
        if parse_id(value).is_some() {
            Ok(())
        } else {
            Err(format!("El campo {} debe ser un número entero válido.", label))
        }
    }
}
