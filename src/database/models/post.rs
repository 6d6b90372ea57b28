use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category_id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub description: String,
    pub category_id: i64,
    /// Author, taken from the authenticated caller
    pub user_id: i64,
}

/// Canonical editable set for post updates; category and author are fixed
#[derive(Debug, Clone)]
pub struct PostChanges {
    pub title: String,
    pub description: String,
}
