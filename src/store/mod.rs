//! Post persistence
//!
//! Handlers talk to the database through [`PostStore`]; the production
//! implementation is [`PgPostStore`].

#[cfg(test)]
pub(crate) mod memory;
mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::content::{NewPost, Post, PostUpdate};

pub use postgres::PgPostStore;

/// Errors raised by a [`PostStore`]
#[derive(Debug, Error)]
pub enum StoreError {
    /// No row matched the slug or id
    #[error("post not found")]
    NotFound,

    /// A read failed (connectivity, SQL, decoding)
    #[error("query failed: {0}")]
    Query(#[source] sqlx::Error),

    /// An insert, update, or delete failed
    #[error("write failed: {0}")]
    Write(#[source] sqlx::Error),

    /// An insert collided with an existing slug
    #[error("slug `{0}` is already taken")]
    DuplicateSlug(String),
}

/// Storage operations for posts, one round trip each
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Published posts, newest first
    async fn list_published(&self) -> Result<Vec<Post>, StoreError>;

    /// Look a post up by its exact slug
    async fn get_by_slug(&self, slug: &str) -> Result<Post, StoreError>;

    /// Insert a post, returning the stored row with id and timestamps
    async fn create(&self, post: NewPost) -> Result<Post, StoreError>;

    /// Rewrite the mutable fields of a post and bump `updated_at`
    async fn update(&self, id: i64, changes: PostUpdate) -> Result<Post, StoreError>;

    /// Remove a post. Deleting a missing id succeeds.
    async fn delete(&self, id: i64) -> Result<(), StoreError>;
}
