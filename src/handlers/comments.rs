use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde_json::Value;

use crate::database::models::{Comment, CommentChanges, NewComment};
use crate::database::UniqueColumn;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::validation::{self, i64_field, opt_f64_field, str_field, Rule, Schema};
use crate::AppState;

use super::{object, parse_id};

const MISSING: &str = "Comment does not exist";
const MISSING_POST: &str = "Post does not exist";

const CREATE_RULES: Schema = Schema::new(&[
    (
        "title",
        &[Rule::Required, Rule::Unique(UniqueColumn::CommentTitle)],
    ),
    ("post_id", &[Rule::Required, Rule::Numeric]),
    ("description", &[Rule::Required]),
    ("rating", &[Rule::Numeric]),
]);

// Canonical editable set: title and description. Post, rating and author are
// fixed at creation.
const UPDATE_RULES: Schema = Schema::new(&[
    (
        "title",
        &[Rule::Required, Rule::Unique(UniqueColumn::CommentTitle)],
    ),
    ("description", &[Rule::Required]),
]);

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Comment>> {
    let comments = state.store.list_comments().await?;
    Ok(ApiResponse::new(comments, "Comments fetched."))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<Value>,
) -> ApiResult<Comment> {
    let input = object(body);
    validation::validate(state.store.as_ref(), &input, &CREATE_RULES, None).await?;

    // Re-validated at call time so a concurrently deleted post cannot gain a
    // stale comment
    let post_id = i64_field(&input, "post_id")?;
    state
        .store
        .post_by_id(post_id)
        .await?
        .ok_or_else(|| ApiError::not_found(MISSING_POST))?;

    let comment = state
        .store
        .create_comment(NewComment {
            title: str_field(&input, "title")?,
            description: str_field(&input, "description")?,
            rating: opt_f64_field(&input, "rating"),
            post_id,
            user_id: user.id,
        })
        .await?;

    Ok(ApiResponse::new(comment, "Comment created."))
}

pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Comment> {
    let id = parse_id(&id, MISSING)?;
    let comment = state
        .store
        .comment_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(MISSING))?;

    Ok(ApiResponse::new(comment, "Comment fetched."))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<Comment> {
    let id = parse_id(&id, MISSING)?;
    state
        .store
        .comment_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(MISSING))?;

    let input = object(body);
    validation::validate(state.store.as_ref(), &input, &UPDATE_RULES, Some(id)).await?;

    let comment = state
        .store
        .update_comment(
            id,
            CommentChanges {
                title: str_field(&input, "title")?,
                description: str_field(&input, "description")?,
            },
        )
        .await?
        .ok_or_else(|| ApiError::not_found(MISSING))?;

    Ok(ApiResponse::new(comment, "Comment updated."))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<&'static str> {
    let id = parse_id(&id, MISSING)?;
    if !state.store.delete_comment(id).await? {
        return Err(ApiError::not_found(MISSING));
    }

    Ok(ApiResponse::new("", "Comment deleted."))
}
