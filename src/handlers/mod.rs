use serde_json::{Map, Value};

use crate::error::ApiError;

pub mod auth;
pub mod categories;
pub mod comments;
pub mod posts;

/// Treat any non-object body as an empty field map; the validator reports the
/// missing fields.
pub(crate) fn object(body: Value) -> Map<String, Value> {
    match body {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Route-bound ids behave like model lookups: anything that is not a known id,
/// including a non-numeric path segment, is the entity's not-found error.
pub(crate) fn parse_id(raw: &str, missing: &'static str) -> Result<i64, ApiError> {
    raw.parse().map_err(|_| ApiError::not_found(missing))
}
