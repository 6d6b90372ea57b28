use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::auth;
use crate::database::models::NewUser;
use crate::database::UniqueColumn;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::validation::{self, str_field, Rule, Schema};
use crate::AppState;

use super::object;

const REGISTER_RULES: Schema = Schema::new(&[
    ("name", &[Rule::Required, Rule::Unique(UniqueColumn::UserName)]),
    ("email", &[Rule::Required, Rule::Email]),
    ("password", &[Rule::Required]),
    (
        "confirm_password",
        &[Rule::RequiredWith("password"), Rule::Same("password")],
    ),
]);

/// POST /api/login - exchange credentials for a bearer token. Any failure
/// (unknown email, wrong password, missing fields) is the same Unauthorised
/// envelope; nothing about which part failed is leaked.
pub async fn login(State(state): State<AppState>, Json(body): Json<Value>) -> ApiResult<Value> {
    let input = object(body);
    let email = input.get("email").and_then(Value::as_str).unwrap_or_default();
    let password = input
        .get("password")
        .and_then(Value::as_str)
        .unwrap_or_default();

    let user = state
        .store
        .user_by_email(email)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    if !auth::verify_password(password, &user.password) {
        return Err(ApiError::Unauthorized);
    }

    let token = auth::issue_token(user.id, &user.name)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(ApiResponse::new(
        json!({ "token": token, "name": user.name }),
        "User signed in",
    ))
}

/// POST /api/register - create an account and sign the new user in. The
/// password is stored only as a one-way hash.
pub async fn register(State(state): State<AppState>, Json(body): Json<Value>) -> ApiResult<Value> {
    let input = object(body);
    validation::validate(state.store.as_ref(), &input, &REGISTER_RULES, None).await?;

    let password = auth::hash_password(&str_field(&input, "password")?)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let user = state
        .store
        .create_user(NewUser {
            name: str_field(&input, "name")?,
            email: str_field(&input, "email")?,
            password,
        })
        .await?;

    let token = auth::issue_token(user.id, &user.name)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(ApiResponse::new(
        json!({ "token": token, "name": user.name }),
        "User created successfully.",
    ))
}
