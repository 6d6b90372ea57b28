// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Map, Value};

use crate::database::StoreError;
use crate::validation::taken_message;

/// Request failure taxonomy. Every variant is recovered at the handler
/// boundary and rendered through the uniform envelope; raw errors never reach
/// the caller.
///
/// For compatibility with existing clients, not-found, validation and auth
/// failures all respond with HTTP 404 - callers distinguish error kinds by the
/// message shape, not the status code.
#[derive(Debug)]
pub enum ApiError {
    /// Bad credentials or missing/invalid bearer token
    Unauthorized,
    /// Field name -> ordered list of violated-rule messages
    Validation(Map<String, Value>),
    /// Referenced entity or route-bound id absent
    NotFound(String),
    /// Store failure; logged server-side, generic message to the client
    Internal(String),
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }

    /// Validation error for a single field
    pub fn field_error(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Map::new();
        errors.insert(field.to_string(), json!([message.into()]));
        ApiError::Validation(errors)
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::NOT_FOUND,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convert to the failure envelope body
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::Unauthorized => json!({
                "success": false,
                "data": { "error": "Unauthorised" },
                "message": "Unauthorised"
            }),
            ApiError::Validation(errors) => json!({
                "success": false,
                "message": errors
            }),
            ApiError::NotFound(message) => json!({
                "success": false,
                "message": message
            }),
            ApiError::Internal(_) => json!({
                "success": false,
                "message": "Server Error"
            }),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            // The storage unique index is the authoritative guard; a violation
            // that slipped past the validator pre-check renders as the same
            // validation error the pre-check would have produced.
            StoreError::Duplicate { field } => ApiError::field_error(field, taken_message(field)),
            StoreError::Db(e) => ApiError::internal(e.to_string()),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Unauthorized => write!(f, "Unauthorised"),
            ApiError::Validation(errors) => write!(f, "validation failed: {:?}", errors),
            ApiError::NotFound(message) => write!(f, "{}", message),
            ApiError::Internal(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        if let ApiError::Internal(detail) = &self {
            tracing::error!("internal error: {}", detail);
        }
        (self.status_code(), Json(self.to_json())).into_response()
    }
}
