//! In-memory post store for handler and command tests

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use super::{PostStore, StoreError};
use crate::content::{NewPost, Post, PostUpdate};

#[derive(Default)]
pub(crate) struct MemoryPostStore {
    posts: Mutex<Vec<Post>>,
}

impl MemoryPostStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn list_published(&self) -> Result<Vec<Post>, StoreError> {
        let posts = self.posts.lock().unwrap();
        let mut published: Vec<Post> = posts.iter().filter(|p| p.published).cloned().collect();
        published.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(published)
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Post, StoreError> {
        let posts = self.posts.lock().unwrap();
        posts
            .iter()
            .find(|p| p.slug == slug)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create(&self, post: NewPost) -> Result<Post, StoreError> {
        let mut posts = self.posts.lock().unwrap();
        if posts.iter().any(|p| p.slug == post.slug) {
            return Err(StoreError::DuplicateSlug(post.slug));
        }

        let now = Utc::now();
        let id = posts.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let stored = Post {
            id,
            title: post.title,
            tagline: post.tagline,
            body: post.body,
            slug: post.slug,
            published: post.published,
            created_at: now,
            updated_at: now,
        };
        posts.push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: i64, changes: PostUpdate) -> Result<Post, StoreError> {
        let mut posts = self.posts.lock().unwrap();
        let post = posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::NotFound)?;

        post.title = changes.title;
        post.tagline = changes.tagline;
        post.body = changes.body;
        post.published = changes.published;
        post.updated_at = Utc::now();
        Ok(post.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.posts.lock().unwrap().retain(|p| p.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_post(title: &str, slug: &str, published: bool) -> NewPost {
        NewPost {
            title: title.to_string(),
            tagline: String::new(),
            body: String::new(),
            slug: slug.to_string(),
            published,
        }
    }

    #[tokio::test]
    async fn test_listing_excludes_drafts_and_orders_newest_first() {
        let store = MemoryPostStore::new();
        store.create(new_post("One", "one", true)).await.unwrap();
        store.create(new_post("Two", "two", false)).await.unwrap();
        store.create(new_post("Three", "three", true)).await.unwrap();

        let slugs: Vec<_> = store
            .list_published()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(slugs, vec!["three", "one"]);
    }

    #[tokio::test]
    async fn test_update_missing_id_is_not_found() {
        let store = MemoryPostStore::new();
        let changes = PostUpdate {
            title: "x".to_string(),
            tagline: String::new(),
            body: String::new(),
            published: true,
        };
        assert!(matches!(
            store.update(42, changes).await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryPostStore::new();
        let doomed = store.create(new_post("Doomed", "doomed", true)).await.unwrap();
        store.create(new_post("Kept", "kept", true)).await.unwrap();

        store.delete(doomed.id).await.unwrap();
        store.delete(doomed.id).await.unwrap();
        store.delete(9999).await.unwrap();

        assert!(matches!(
            store.get_by_slug("doomed").await,
            Err(StoreError::NotFound)
        ));
        assert_eq!(store.get_by_slug("kept").await.unwrap().title, "Kept");
    }
}
