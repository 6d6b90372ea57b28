use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub rating: Option<f64>,
    pub post_id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub title: String,
    pub description: String,
    pub rating: Option<f64>,
    pub post_id: i64,
    /// Author, taken from the authenticated caller - never the request body
    pub user_id: i64,
}

/// Canonical editable set for comment updates; post, rating and author are fixed
#[derive(Debug, Clone)]
pub struct CommentChanges {
    pub title: String,
    pub description: String,
}
