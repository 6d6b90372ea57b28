use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;

use super::models::{
    Category, CategoryChanges, Comment, CommentChanges, NewCategory, NewComment, NewPost, NewUser,
    Post, PostChanges, User,
};
use super::{Store, StoreError, UniqueColumn};

/// In-memory store. Backs the integration test suite and local experiments;
/// uniqueness is enforced under the write lock, mirroring the role the unique
/// indexes play in the Postgres store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    users: Vec<User>,
    categories: Vec<Category>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
    last_user_id: i64,
    last_category_id: i64,
    last_post_id: i64,
    last_comment_id: i64,
}

impl Inner {
    fn taken(&self, column: UniqueColumn, value: &str, exclude_id: Option<i64>) -> bool {
        let skip = |id: i64| exclude_id == Some(id);
        match column {
            UniqueColumn::UserName => self.users.iter().any(|u| u.name == value && !skip(u.id)),
            UniqueColumn::UserEmail => self.users.iter().any(|u| u.email == value && !skip(u.id)),
            UniqueColumn::CategoryName => self
                .categories
                .iter()
                .any(|c| c.name == value && !skip(c.id)),
            UniqueColumn::PostTitle => self.posts.iter().any(|p| p.title == value && !skip(p.id)),
            UniqueColumn::CommentTitle => self
                .comments
                .iter()
                .any(|c| c.title == value && !skip(c.id)),
        }
    }
}

fn next_id(last: &mut i64) -> i64 {
    *last += 1;
    *last
}

impl MemoryStore {
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        let mut inner = self.write();
        if inner.taken(UniqueColumn::UserName, &new.name, None) {
            return Err(StoreError::Duplicate { field: "name" });
        }
        if inner.taken(UniqueColumn::UserEmail, &new.email, None) {
            return Err(StoreError::Duplicate { field: "email" });
        }

        let now = Utc::now();
        let user = User {
            id: next_id(&mut inner.last_user_id),
            name: new.name,
            email: new.email,
            password: new.password,
            created_at: now,
            updated_at: now,
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.read().users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(self.read().categories.clone())
    }

    async fn create_category(&self, new: NewCategory) -> Result<Category, StoreError> {
        let mut inner = self.write();
        if inner.taken(UniqueColumn::CategoryName, &new.name, None) {
            return Err(StoreError::Duplicate { field: "name" });
        }

        let now = Utc::now();
        let category = Category {
            id: next_id(&mut inner.last_category_id),
            name: new.name,
            content: new.content,
            created_at: now,
            updated_at: now,
        };
        inner.categories.push(category.clone());
        Ok(category)
    }

    async fn category_by_id(&self, id: i64) -> Result<Option<Category>, StoreError> {
        Ok(self.read().categories.iter().find(|c| c.id == id).cloned())
    }

    async fn update_category(
        &self,
        id: i64,
        changes: CategoryChanges,
    ) -> Result<Option<Category>, StoreError> {
        let mut inner = self.write();
        if inner.taken(UniqueColumn::CategoryName, &changes.name, Some(id)) {
            return Err(StoreError::Duplicate { field: "name" });
        }

        let Some(category) = inner.categories.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        category.name = changes.name;
        category.content = changes.content;
        category.updated_at = Utc::now();
        Ok(Some(category.clone()))
    }

    async fn delete_category(&self, id: i64) -> Result<bool, StoreError> {
        let mut inner = self.write();
        let before = inner.categories.len();
        inner.categories.retain(|c| c.id != id);
        Ok(inner.categories.len() < before)
    }

    async fn list_posts(&self) -> Result<Vec<Post>, StoreError> {
        Ok(self.read().posts.clone())
    }

    async fn create_post(&self, new: NewPost) -> Result<Post, StoreError> {
        let mut inner = self.write();
        if inner.taken(UniqueColumn::PostTitle, &new.title, None) {
            return Err(StoreError::Duplicate { field: "title" });
        }

        let now = Utc::now();
        let post = Post {
            id: next_id(&mut inner.last_post_id),
            title: new.title,
            description: new.description,
            category_id: new.category_id,
            user_id: new.user_id,
            created_at: now,
            updated_at: now,
        };
        inner.posts.push(post.clone());
        Ok(post)
    }

    async fn post_by_id(&self, id: i64) -> Result<Option<Post>, StoreError> {
        Ok(self.read().posts.iter().find(|p| p.id == id).cloned())
    }

    async fn update_post(&self, id: i64, changes: PostChanges) -> Result<Option<Post>, StoreError> {
        let mut inner = self.write();
        if inner.taken(UniqueColumn::PostTitle, &changes.title, Some(id)) {
            return Err(StoreError::Duplicate { field: "title" });
        }

        let Some(post) = inner.posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        post.title = changes.title;
        post.description = changes.description;
        post.updated_at = Utc::now();
        Ok(Some(post.clone()))
    }

    async fn delete_post(&self, id: i64) -> Result<bool, StoreError> {
        let mut inner = self.write();
        let before = inner.posts.len();
        inner.posts.retain(|p| p.id != id);
        Ok(inner.posts.len() < before)
    }

    async fn list_comments(&self) -> Result<Vec<Comment>, StoreError> {
        Ok(self.read().comments.clone())
    }

    async fn create_comment(&self, new: NewComment) -> Result<Comment, StoreError> {
        let mut inner = self.write();
        if inner.taken(UniqueColumn::CommentTitle, &new.title, None) {
            return Err(StoreError::Duplicate { field: "title" });
        }

        let now = Utc::now();
        let comment = Comment {
            id: next_id(&mut inner.last_comment_id),
            title: new.title,
            description: new.description,
            rating: new.rating,
            post_id: new.post_id,
            user_id: new.user_id,
            created_at: now,
            updated_at: now,
        };
        inner.comments.push(comment.clone());
        Ok(comment)
    }

    async fn comment_by_id(&self, id: i64) -> Result<Option<Comment>, StoreError> {
        Ok(self.read().comments.iter().find(|c| c.id == id).cloned())
    }

    async fn update_comment(
        &self,
        id: i64,
        changes: CommentChanges,
    ) -> Result<Option<Comment>, StoreError> {
        let mut inner = self.write();
        if inner.taken(UniqueColumn::CommentTitle, &changes.title, Some(id)) {
            return Err(StoreError::Duplicate { field: "title" });
        }

        let Some(comment) = inner.comments.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        comment.title = changes.title;
        comment.description = changes.description;
        comment.updated_at = Utc::now();
        Ok(Some(comment.clone()))
    }

    async fn delete_comment(&self, id: i64) -> Result<bool, StoreError> {
        let mut inner = self.write();
        let before = inner.comments.len();
        inner.comments.retain(|c| c.id != id);
        Ok(inner.comments.len() < before)
    }

    async fn value_taken(
        &self,
        column: UniqueColumn,
        value: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, StoreError> {
        Ok(self.read().taken(column, value, exclude_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(name: &str) -> NewCategory {
        NewCategory {
            name: name.to_string(),
            content: None,
        }
    }

    #[tokio::test]
    async fn assigns_ids_in_creation_order() {
        let store = MemoryStore::default();
        let a = store.create_category(category("Food")).await.unwrap();
        let b = store.create_category(category("Travel")).await.unwrap();
        let c = store.create_category(category("Tech")).await.unwrap();
        assert_eq!((a.id, b.id, c.id), (1, 2, 3));

        let listed = store.list_categories().await.unwrap();
        let names: Vec<&str> = listed.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Food", "Travel", "Tech"]);
    }

    #[tokio::test]
    async fn rejects_duplicate_unique_values() {
        let store = MemoryStore::default();
        store.create_category(category("Food")).await.unwrap();

        let err = store.create_category(category("Food")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { field: "name" }));
        assert_eq!(store.list_categories().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_excludes_own_row_from_uniqueness() {
        let store = MemoryStore::default();
        let food = store.create_category(category("Food")).await.unwrap();
        store.create_category(category("Travel")).await.unwrap();

        // Keeping its own name is fine
        let updated = store
            .update_category(
                food.id,
                CategoryChanges {
                    name: "Food".to_string(),
                    content: Some("still food".to_string()),
                },
            )
            .await
            .unwrap()
            .expect("category exists");
        assert_eq!(updated.content.as_deref(), Some("still food"));

        // Taking another row's name is not
        let err = store
            .update_category(
                food.id,
                CategoryChanges {
                    name: "Travel".to_string(),
                    content: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { field: "name" }));
    }

    #[tokio::test]
    async fn delete_is_hard_and_reports_absence() {
        let store = MemoryStore::default();
        let food = store.create_category(category("Food")).await.unwrap();

        assert!(store.delete_category(food.id).await.unwrap());
        assert!(store.category_by_id(food.id).await.unwrap().is_none());
        assert!(!store.delete_category(food.id).await.unwrap());
    }

    #[tokio::test]
    async fn value_taken_probes_each_column() {
        let store = MemoryStore::default();
        store
            .create_user(NewUser {
                name: "admin".to_string(),
                email: "admin@admin.com".to_string(),
                password: "hash".to_string(),
            })
            .await
            .unwrap();

        assert!(store
            .value_taken(UniqueColumn::UserName, "admin", None)
            .await
            .unwrap());
        assert!(store
            .value_taken(UniqueColumn::UserEmail, "admin@admin.com", None)
            .await
            .unwrap());
        assert!(!store
            .value_taken(UniqueColumn::UserName, "other", None)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn updating_missing_row_returns_none() {
        let store = MemoryStore::default();
        let updated = store
            .update_post(
                99,
                PostChanges {
                    title: "x".to_string(),
                    description: "y".to_string(),
                },
            )
            .await
            .unwrap();
        assert!(updated.is_none());
    }
}
