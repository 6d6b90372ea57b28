use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde_json::Value;

use crate::database::models::{NewPost, Post, PostChanges};
use crate::database::UniqueColumn;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::validation::{self, i64_field, str_field, Rule, Schema};
use crate::AppState;

use super::{object, parse_id};

const MISSING: &str = "Post does not exist";
const MISSING_CATEGORY: &str = "Category does not exist";

const CREATE_RULES: Schema = Schema::new(&[
    (
        "title",
        &[Rule::Required, Rule::Unique(UniqueColumn::PostTitle)],
    ),
    ("category_id", &[Rule::Required, Rule::Numeric]),
    ("description", &[Rule::Required]),
]);

// Canonical editable set: title and description. The category and author are
// fixed at creation.
const UPDATE_RULES: Schema = Schema::new(&[
    (
        "title",
        &[Rule::Required, Rule::Unique(UniqueColumn::PostTitle)],
    ),
    ("description", &[Rule::Required]),
]);

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Post>> {
    let posts = state.store.list_posts().await?;
    Ok(ApiResponse::new(posts, "Posts fetched."))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<Value>,
) -> ApiResult<Post> {
    let input = object(body);
    validation::validate(state.store.as_ref(), &input, &CREATE_RULES, None).await?;

    // Cross-reference check at call time, not against a cached value
    let category_id = i64_field(&input, "category_id")?;
    state
        .store
        .category_by_id(category_id)
        .await?
        .ok_or_else(|| ApiError::not_found(MISSING_CATEGORY))?;

    let post = state
        .store
        .create_post(NewPost {
            title: str_field(&input, "title")?,
            description: str_field(&input, "description")?,
            category_id,
            user_id: user.id,
        })
        .await?;

    Ok(ApiResponse::new(post, "Post created."))
}

pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Post> {
    let id = parse_id(&id, MISSING)?;
    let post = state
        .store
        .post_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(MISSING))?;

    Ok(ApiResponse::new(post, "Post fetched."))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<Post> {
    let id = parse_id(&id, MISSING)?;
    state
        .store
        .post_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(MISSING))?;

    let input = object(body);
    validation::validate(state.store.as_ref(), &input, &UPDATE_RULES, Some(id)).await?;

    let post = state
        .store
        .update_post(
            id,
            PostChanges {
                title: str_field(&input, "title")?,
                description: str_field(&input, "description")?,
            },
        )
        .await?
        .ok_or_else(|| ApiError::not_found(MISSING))?;

    Ok(ApiResponse::new(post, "Post updated."))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<&'static str> {
    let id = parse_id(&id, MISSING)?;
    if !state.store.delete_post(id).await? {
        return Err(ApiError::not_found(MISSING));
    }

    Ok(ApiResponse::new("", "Post deleted."))
}
