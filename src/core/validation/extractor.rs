//! Axum extractor for validated request bodies
//!
//! `Validated<T>` reads the JSON body, checks it against `T`'s rule set and
//! converts it into `T`. Any failure is rejected with a 400 carrying every
//! field error and the submitted body, before the handler runs.

use super::rules::RuleSet;
use crate::config::AttributeLabels;
use crate::core::error::{ApiError, ValidationErrors};
use axum::{
    Json,
    extract::{FromRef, FromRequest, Request},
};
use serde_json::Value;
use std::sync::Arc;

/// Trait for inputs built from a validated JSON body
pub trait ValidatableEntity: Sized {
    /// Rules the raw body must satisfy
    fn rules() -> &'static RuleSet;

    /// Convert a body that already passed [`ValidatableEntity::rules`]
    fn from_payload(payload: &Value) -> Result<Self, ValidationErrors>;
}

/// Axum extractor that validates and converts the request body
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn store(
///     State(state): State<OrderAppState>,
///     Validated { value }: Validated<OrderInput>,
/// ) -> Result<impl IntoResponse, ApiError> {
///     // value is already validated
/// }
/// ```
#[derive(Debug)]
pub struct Validated<T> {
    pub value: T,
}

impl<T> Validated<T> {
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: ValidatableEntity + Send,
    Arc<AttributeLabels>: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload): Json<Value> = match Json::from_request(req, state).await {
            Ok(json) => json,
            Err(rejection) => {
                tracing::debug!(error = %rejection.body_text(), "malformed request body");
                let mut errors = ValidationErrors::new();
                errors.add("body", rejection.body_text());
                return Err(ApiError::validation(errors, Value::Null));
            }
        };

        let labels = Arc::<AttributeLabels>::from_ref(state);

        let checked = T::rules()
            .validate(&payload, &labels)
            .and_then(|()| T::from_payload(&payload));

        match checked {
            Ok(value) => Ok(Validated { value }),
            Err(errors) => {
                tracing::debug!(fields = ?errors.fields().collect::<Vec<_>>(), "request body rejected");
                Err(ApiError::validation(errors, payload))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::validation::rule;
    use crate::core::validation::validators::string;
    use axum::body::Body;
    use serde_json::json;
    use std::sync::OnceLock;

    #[derive(Debug)]
    struct Name(String);

    impl ValidatableEntity for Name {
        fn rules() -> &'static RuleSet {
            static RULES: OnceLock<RuleSet> = OnceLock::new();
            RULES.get_or_init(|| RuleSet::new().required("name", vec![rule(string())]))
        }

        fn from_payload(payload: &Value) -> Result<Self, ValidationErrors> {
            Ok(Name(payload["name"].as_str().unwrap_or_default().to_string()))
        }
    }

    fn json_request(body: &'static str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn extract(body: &'static str) -> Result<Validated<Name>, ApiError> {
        let labels = Arc::new(AttributeLabels::from_pairs([("name", "nombre")]));
        Validated::<Name>::from_request(json_request(body), &labels).await
    }

    #[tokio::test]
    async fn test_valid_body_yields_converted_value() {
        let Validated { value } = extract(r#"{"name": "abc"}"#).await.unwrap();
        assert_eq!(value.0, "abc");
    }

    #[tokio::test]
    async fn test_rule_failure_echoes_submitted_body() {
        match extract(r#"{"name": 5}"#).await.unwrap_err() {
            ApiError::Validation { errors, data } => {
                assert!(errors.get("name").unwrap()[0].contains("nombre"));
                assert_eq!(data, json!({"name": 5}));
            }
            other => panic!("expected a validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_reported_on_body() {
        match extract(r#"{"name": "#).await.unwrap_err() {
            ApiError::Validation { errors, data } => {
                assert!(errors.get("body").is_some());
                assert!(data.is_null());
            }
            other => panic!("expected a validation error, got {:?}", other),
        }
    }
}
