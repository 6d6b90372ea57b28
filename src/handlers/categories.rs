use axum::extract::{Path, State};
use axum::Json;
use serde_json::Value;

use crate::database::models::{Category, CategoryChanges, NewCategory};
use crate::database::UniqueColumn;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::validation::{self, opt_str_field, str_field, Rule, Schema};
use crate::AppState;

use super::{object, parse_id};

const MISSING: &str = "Category does not exist";

const CREATE_RULES: Schema = Schema::new(&[(
    "name",
    &[Rule::Required, Rule::Unique(UniqueColumn::CategoryName)],
)]);

// Update writes the same canonical field set the create accepts
const UPDATE_RULES: Schema = CREATE_RULES;

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Category>> {
    let categories = state.store.list_categories().await?;
    Ok(ApiResponse::new(categories, "Categories fetched."))
}

pub async fn create(State(state): State<AppState>, Json(body): Json<Value>) -> ApiResult<Category> {
    let input = object(body);
    validation::validate(state.store.as_ref(), &input, &CREATE_RULES, None).await?;

    let category = state
        .store
        .create_category(NewCategory {
            name: str_field(&input, "name")?,
            content: opt_str_field(&input, "content"),
        })
        .await?;

    Ok(ApiResponse::new(category, "Category created."))
}

pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Category> {
    let id = parse_id(&id, MISSING)?;
    let category = state
        .store
        .category_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(MISSING))?;

    Ok(ApiResponse::new(category, "Category fetched."))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<Category> {
    let id = parse_id(&id, MISSING)?;
    // Bind the route id before validating, like a model lookup
    state
        .store
        .category_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(MISSING))?;

    let input = object(body);
    validation::validate(state.store.as_ref(), &input, &UPDATE_RULES, Some(id)).await?;

    let category = state
        .store
        .update_category(
            id,
            CategoryChanges {
                name: str_field(&input, "name")?,
                content: opt_str_field(&input, "content"),
            },
        )
        .await?
        .ok_or_else(|| ApiError::not_found(MISSING))?;

    Ok(ApiResponse::new(category, "Category updated."))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<&'static str> {
    let id = parse_id(&id, MISSING)?;
    if !state.store.delete_category(id).await? {
        return Err(ApiError::not_found(MISSING));
    }

    Ok(ApiResponse::new("", "Category deleted."))
}
