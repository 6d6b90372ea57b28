use serde_json::{Map, Value};

use crate::database::{Store, UniqueColumn};
use crate::error::ApiError;

/// Per-field validation rules. Each endpoint declares an ordered rule table;
/// one generic validator consumes it.
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// Field must be present and non-blank
    Required,
    /// Field must be present once the named field is
    RequiredWith(&'static str),
    /// No existing row may hold this value in the given column. On update the
    /// row's own id is excluded so a record can keep its current value.
    Unique(UniqueColumn),
    /// JSON number or numeric string
    Numeric,
    Email,
    /// Must equal the named field
    Same(&'static str),
}

/// Ordered request schema: fields evaluate in declaration order, rules in
/// per-field declaration order.
pub struct Schema {
    pub fields: &'static [(&'static str, &'static [Rule])],
}

impl Schema {
    pub const fn new(fields: &'static [(&'static str, &'static [Rule])]) -> Self {
        Self { fields }
    }
}

/// Validate raw input against a schema. Every violated rule is reported, not
/// just the first; the result maps field -> ordered list of messages.
pub async fn validate(
    store: &dyn Store,
    input: &Map<String, Value>,
    schema: &Schema,
    exclude_id: Option<i64>,
) -> Result<(), ApiError> {
    let mut errors = Map::new();

    for (field, rules) in schema.fields {
        let value = input.get(*field);
        let mut messages: Vec<Value> = Vec::new();

        for rule in *rules {
            let message = match rule {
                Rule::Required => is_blank(value).then(|| required_message(field)),
                Rule::RequiredWith(other) => (!is_blank(input.get(*other)) && is_blank(value))
                    .then(|| required_message(field)),
                Rule::Numeric => value
                    .filter(|_| !is_blank(value))
                    .and_then(|v| as_number(v).is_none().then(|| numeric_message(field))),
                Rule::Email => value
                    .filter(|_| !is_blank(value))
                    .and_then(|v| (!is_email(v)).then(|| email_message(field))),
                Rule::Unique(column) => match value.and_then(Value::as_str) {
                    Some(s) if !s.is_empty() => store
                        .value_taken(*column, s, exclude_id)
                        .await?
                        .then(|| taken_message(field)),
                    _ => None,
                },
                Rule::Same(other) => (!is_blank(value) && input.get(*other) != value)
                    .then(|| same_message(field, other)),
            };

            if let Some(message) = message {
                messages.push(Value::String(message));
            }
        }

        if !messages.is_empty() {
            errors.insert(field.to_string(), Value::Array(messages));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}

/// Absent, null or empty-string values all count as missing
fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn is_email(value: &Value) -> bool {
    let Some(s) = value.as_str() else {
        return false;
    };
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

/// "confirm_password" -> "confirm password"
fn humanize(field: &str) -> String {
    field.replace('_', " ")
}

fn required_message(field: &str) -> String {
    format!("The {} field is required.", humanize(field))
}

fn numeric_message(field: &str) -> String {
    format!("The {} must be a number.", humanize(field))
}

fn email_message(field: &str) -> String {
    format!("The {} must be a valid email address.", humanize(field))
}

pub fn taken_message(field: &str) -> String {
    format!("The {} has already been taken.", humanize(field))
}

fn same_message(field: &str, other: &str) -> String {
    format!("The {} and {} must match.", humanize(field), humanize(other))
}

// Typed accessors for fields the schema has already validated. A miss here is
// a programming error (schema out of sync with extraction), reported as an
// internal failure rather than a panic.

pub fn str_field(input: &Map<String, Value>, field: &str) -> Result<String, ApiError> {
    match input.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(ApiError::internal(format!(
            "field '{}' missing after validation",
            field
        ))),
    }
}

pub fn opt_str_field(input: &Map<String, Value>, field: &str) -> Option<String> {
    match input.get(field) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

pub fn i64_field(input: &Map<String, Value>, field: &str) -> Result<i64, ApiError> {
    input
        .get(field)
        .and_then(as_number)
        .map(|n| n as i64)
        .ok_or_else(|| {
            ApiError::internal(format!("field '{}' missing after validation", field))
        })
}

pub fn opt_f64_field(input: &Map<String, Value>, field: &str) -> Option<f64> {
    input.get(field).and_then(as_number)
}
