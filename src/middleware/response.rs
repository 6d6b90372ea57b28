use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;

use crate::error::ApiError;

/// Wrapper for successful results that adds the uniform envelope:
/// `{"success": true, "data": <payload>, "message": <string>}`. Success is
/// always HTTP 200.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub message: &'static str,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T, message: &'static str) -> Self {
        Self { data, message }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let data = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("failed to serialize response data: {}", e);
                return ApiError::internal(e.to_string()).into_response();
            }
        };

        let envelope = json!({
            "success": true,
            "data": data,
            "message": self.message
        });

        (StatusCode::OK, Json(envelope)).into_response()
    }
}

/// Handler return type: success envelope or a recovered failure
pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;
