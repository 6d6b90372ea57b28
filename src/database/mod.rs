use async_trait::async_trait;
use thiserror::Error;

pub mod memory;
pub mod models;
pub mod postgres;

use models::{
    Category, CategoryChanges, Comment, CommentChanges, NewCategory, NewComment, NewPost, NewUser,
    Post, PostChanges, User,
};

#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique-column collision, either caught by the store's own guard or
    /// surfaced from the database unique index
    #[error("duplicate value for {field}")]
    Duplicate { field: &'static str },
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

/// Columns covered by a per-entity uniqueness constraint. The validator
/// pre-checks these; the storage layer enforces them authoritatively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueColumn {
    UserName,
    UserEmail,
    CategoryName,
    PostTitle,
    CommentTitle,
}

impl UniqueColumn {
    pub fn table(self) -> &'static str {
        match self {
            UniqueColumn::UserName | UniqueColumn::UserEmail => "users",
            UniqueColumn::CategoryName => "categories",
            UniqueColumn::PostTitle => "posts",
            UniqueColumn::CommentTitle => "comments",
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            UniqueColumn::UserName | UniqueColumn::CategoryName => "name",
            UniqueColumn::UserEmail => "email",
            UniqueColumn::PostTitle | UniqueColumn::CommentTitle => "title",
        }
    }
}

/// Resource repository contract, instantiated per entity. All list operations
/// return rows in creation order; updates are full-field overwrites of the
/// entity's editable set; deletes are hard.
#[async_trait]
pub trait Store: Send + Sync {
    // Users
    async fn create_user(&self, new: NewUser) -> Result<User, StoreError>;
    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    // Categories
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;
    async fn create_category(&self, new: NewCategory) -> Result<Category, StoreError>;
    async fn category_by_id(&self, id: i64) -> Result<Option<Category>, StoreError>;
    async fn update_category(
        &self,
        id: i64,
        changes: CategoryChanges,
    ) -> Result<Option<Category>, StoreError>;
    async fn delete_category(&self, id: i64) -> Result<bool, StoreError>;

    // Posts
    async fn list_posts(&self) -> Result<Vec<Post>, StoreError>;
    async fn create_post(&self, new: NewPost) -> Result<Post, StoreError>;
    async fn post_by_id(&self, id: i64) -> Result<Option<Post>, StoreError>;
    async fn update_post(&self, id: i64, changes: PostChanges) -> Result<Option<Post>, StoreError>;
    async fn delete_post(&self, id: i64) -> Result<bool, StoreError>;

    // Comments
    async fn list_comments(&self) -> Result<Vec<Comment>, StoreError>;
    async fn create_comment(&self, new: NewComment) -> Result<Comment, StoreError>;
    async fn comment_by_id(&self, id: i64) -> Result<Option<Comment>, StoreError>;
    async fn update_comment(
        &self,
        id: i64,
        changes: CommentChanges,
    ) -> Result<Option<Comment>, StoreError>;
    async fn delete_comment(&self, id: i64) -> Result<bool, StoreError>;

    /// Uniqueness probe for the validator pre-check. `exclude_id` skips the
    /// row being updated so a record can keep its current value.
    async fn value_taken(
        &self,
        column: UniqueColumn,
        value: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, StoreError>;
}
