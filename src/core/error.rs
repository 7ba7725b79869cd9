//! Typed error handling for the order resource
//!
//! Handlers return [`ApiError`], which knows its HTTP status and renders
//! itself as a JSON body:
//!
//! - [`ApiError::Validation`]: 400, `{ "errors": {field: [messages]}, "data": <request body> }`
//! - [`ApiError::NotFound`]: 404, `{ "code", "message", "details" }`
//! - [`ApiError::Storage`]: 500, `{ "code", "message" }`
//!
//! # Example
//!
//! ```rust,ignore
//! let order = store
//!     .get(id)
//!     .await?
//!     .ok_or_else(|| ApiError::not_found("order", id))?;
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Per-field validation messages, in rule-set order
#[derive(Debug, Clone, Default, PartialEq, Serialize, thiserror::Error)]
#[serde(transparent)]
#[error("{} field(s) failed validation", .0.len())]
pub struct ValidationErrors(IndexMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for a field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Messages recorded for a field, if any
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Names of the failing fields
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// `Ok(())` when nothing was recorded
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// The error type returned by order handlers
#[derive(Debug)]
pub enum ApiError {
    /// The request body broke the rule set; nothing was written
    Validation {
        errors: ValidationErrors,
        /// The submitted body, echoed back to the caller
        data: Value,
    },

    /// A referenced record does not exist
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Any failure raised by the store
    Storage(anyhow::Error),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation { errors, .. } => write!(f, "Validation failed: {}", errors),
            ApiError::NotFound { entity_type, id } => {
                write!(f, "{} with id '{}' not found", entity_type, id)
            }
            ApiError::Storage(e) => write!(f, "Storage error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Validation { errors, .. } => Some(errors),
            ApiError::NotFound { .. } => None,
            ApiError::Storage(e) => Some(&**e),
        }
    }
}

/// Body used for every non-validation error
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Body of a 400 response
#[derive(Debug, Serialize)]
pub struct ValidationResponse {
    pub errors: ValidationErrors,
    pub data: Value,
}

impl ApiError {
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        ApiError::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    pub fn validation(errors: ValidationErrors, data: Value) -> Self {
        ApiError::Validation { errors, data }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "VALIDATION_ERROR",
            ApiError::NotFound { .. } => "ENTITY_NOT_FOUND",
            ApiError::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Convert to the generic error body
    pub fn to_response(&self) -> ErrorResponse {
        let details = match self {
            ApiError::NotFound { entity_type, id } => Some(serde_json::json!({
                "entity_type": entity_type,
                "id": id,
            })),
            _ => None,
        };

        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details,
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Storage(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            ApiError::Validation { errors, data } => {
                (status, Json(ValidationResponse { errors, data })).into_response()
            }
            other => {
                if let ApiError::Storage(e) = &other {
                    tracing::error!(error = %e, "store operation failed");
                }
                (status, Json(other.to_response())).into_response()
            }
        }
    }
}
