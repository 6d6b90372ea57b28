use async_trait::async_trait;
use sqlx::PgPool;

use super::models::{
    Category, CategoryChanges, Comment, CommentChanges, NewCategory, NewComment, NewPost, NewUser,
    Post, PostChanges, User,
};
use super::{Store, StoreError, UniqueColumn};

/// Postgres-backed store. The unique indexes created by the migrations are the
/// authoritative uniqueness guard; violations that race past the validator
/// pre-check come back as `StoreError::Duplicate`.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map a unique-index violation back to the offending field
fn map_insert_error(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        if db.code().as_deref() == Some("23505") {
            let field = match db.constraint() {
                Some("users_name_key") => Some("name"),
                Some("users_email_key") => Some("email"),
                Some("categories_name_key") => Some("name"),
                Some("posts_title_key") => Some("title"),
                Some("comments_title_key") => Some("title"),
                _ => None,
            };
            if let Some(field) = field {
                return StoreError::Duplicate { field };
            }
        }
    }
    StoreError::Db(e)
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password, created_at, updated_at
            "#,
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.password)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(sqlx::query_as::<_, User>(
            "SELECT id, name, email, password, created_at, updated_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(sqlx::query_as::<_, Category>(
            "SELECT id, name, content, created_at, updated_at FROM categories ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn create_category(&self, new: NewCategory) -> Result<Category, StoreError> {
        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, content)
            VALUES ($1, $2)
            RETURNING id, name, content, created_at, updated_at
            "#,
        )
        .bind(&new.name)
        .bind(&new.content)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)
    }

    async fn category_by_id(&self, id: i64) -> Result<Option<Category>, StoreError> {
        Ok(sqlx::query_as::<_, Category>(
            "SELECT id, name, content, created_at, updated_at FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn update_category(
        &self,
        id: i64,
        changes: CategoryChanges,
    ) -> Result<Option<Category>, StoreError> {
        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = $2, content = $3, updated_at = now()
            WHERE id = $1
            RETURNING id, name, content, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.content)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_insert_error)
    }

    async fn delete_category(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_posts(&self) -> Result<Vec<Post>, StoreError> {
        Ok(sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, description, category_id, user_id, created_at, updated_at
            FROM posts ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn create_post(&self, new: NewPost) -> Result<Post, StoreError> {
        sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (title, description, category_id, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, description, category_id, user_id, created_at, updated_at
            "#,
        )
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.category_id)
        .bind(new.user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)
    }

    async fn post_by_id(&self, id: i64) -> Result<Option<Post>, StoreError> {
        Ok(sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, description, category_id, user_id, created_at, updated_at
            FROM posts WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn update_post(&self, id: i64, changes: PostChanges) -> Result<Option<Post>, StoreError> {
        sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET title = $2, description = $3, updated_at = now()
            WHERE id = $1
            RETURNING id, title, description, category_id, user_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_insert_error)
    }

    async fn delete_post(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_comments(&self) -> Result<Vec<Comment>, StoreError> {
        Ok(sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, title, description, rating, post_id, user_id, created_at, updated_at
            FROM comments ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn create_comment(&self, new: NewComment) -> Result<Comment, StoreError> {
        sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (title, description, rating, post_id, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, description, rating, post_id, user_id, created_at, updated_at
            "#,
        )
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.rating)
        .bind(new.post_id)
        .bind(new.user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)
    }

    async fn comment_by_id(&self, id: i64) -> Result<Option<Comment>, StoreError> {
        Ok(sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, title, description, rating, post_id, user_id, created_at, updated_at
            FROM comments WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn update_comment(
        &self,
        id: i64,
        changes: CommentChanges,
    ) -> Result<Option<Comment>, StoreError> {
        sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comments
            SET title = $2, description = $3, updated_at = now()
            WHERE id = $1
            RETURNING id, title, description, rating, post_id, user_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_insert_error)
    }

    async fn delete_comment(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn value_taken(
        &self,
        column: UniqueColumn,
        value: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, StoreError> {
        // Table and column names come from the UniqueColumn enum, never from
        // request input.
        let (table, col) = (column.table(), column.column());
        let taken: bool = match exclude_id {
            Some(id) => {
                let sql =
                    format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE {col} = $1 AND id <> $2)");
                sqlx::query_scalar(&sql)
                    .bind(value)
                    .bind(id)
                    .fetch_one(&self.pool)
                    .await?
            }
            None => {
                let sql = format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE {col} = $1)");
                sqlx::query_scalar(&sql)
                    .bind(value)
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(taken)
    }
}
