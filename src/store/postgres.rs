//! PostgreSQL-backed post store

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Connection, PgConnection, PgPool};

use super::{PostStore, StoreError};
use crate::content::{NewPost, Post, PostUpdate};

const POST_COLUMNS: &str = "id, title, tagline, body, slug, published, created_at, updated_at";

/// How long a request waits for a pooled connection
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Post store over a shared connection pool
#[derive(Clone)]
pub struct PgPostStore {
    pool: PgPool,
}

impl PgPostStore {
    /// Wrap an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Verify the database answers on a single connection, then open a pool
    ///
    /// The first connection attempt is not retried, so an unreachable server
    /// fails with its own error right away.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let mut conn = PgConnection::connect(database_url)
            .await
            .context("Unable to connect to the database")?;
        conn.ping().await.context("Unable to ping database")?;
        if let Err(e) = conn.close().await {
            tracing::debug!("Closing the startup connection failed: {}", e);
        }

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_lazy(database_url)
            .context("Invalid database URL")?;

        tracing::info!("Connected to database");
        Ok(Self { pool })
    }

    /// Apply the bundled schema migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to migrate the database")?;
        tracing::info!("Migrations executed");
        Ok(())
    }
}

#[async_trait]
impl PostStore for PgPostStore {
    async fn list_published(&self) -> Result<Vec<Post>, StoreError> {
        let query = format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE published = TRUE ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Post>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::Query)
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Post, StoreError> {
        let query = format!("SELECT {POST_COLUMNS} FROM posts WHERE slug = $1");
        sqlx::query_as::<_, Post>(&query)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::Query)?
            .ok_or(StoreError::NotFound)
    }

    async fn create(&self, post: NewPost) -> Result<Post, StoreError> {
        let query = format!(
            "INSERT INTO posts (title, tagline, body, slug, published)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {POST_COLUMNS}"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(&post.title)
            .bind(&post.tagline)
            .bind(&post.body)
            .bind(&post.slug)
            .bind(post.published)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e.as_database_error() {
                Some(db) if db.is_unique_violation() => StoreError::DuplicateSlug(post.slug.clone()),
                _ => StoreError::Write(e),
            })
    }

    async fn update(&self, id: i64, changes: PostUpdate) -> Result<Post, StoreError> {
        let query = format!(
            "UPDATE posts
             SET title = $2, tagline = $3, body = $4, published = $5, updated_at = clock_timestamp()
             WHERE id = $1
             RETURNING {POST_COLUMNS}"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .bind(&changes.title)
            .bind(&changes.tagline)
            .bind(&changes.body)
            .bind(changes.published)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::Write)?
            .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::Write)?;

        if result.rows_affected() == 0 {
            tracing::debug!("Delete of post {} matched no rows", id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_post(title: &str, slug: &str, published: bool) -> NewPost {
        NewPost {
            title: title.to_string(),
            tagline: format!("{} tagline", title),
            body: format!("# {}", title),
            slug: slug.to_string(),
            published,
        }
    }

    #[tokio::test]
    async fn test_connect_fails_fast_when_unreachable() {
        let started = std::time::Instant::now();
        let result = tokio::time::timeout(
            Duration::from_secs(10),
            PgPostStore::connect("postgres://postgres@127.0.0.1:1/quill", 5),
        )
        .await
        .expect("connect should give up without retrying");

        let err = match result {
            Ok(_) => panic!("connecting to a closed port should fail"),
            Err(e) => format!("{:#}", e),
        };
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(err.starts_with("Unable to connect to the database"));
        assert!(!err.contains("pool timed out"));
    }

    #[sqlx::test]
    #[ignore] // Requires a PostgreSQL server in DATABASE_URL
    async fn test_create_then_get_by_slug(pool: PgPool) {
        let store = PgPostStore::new(pool);
        assert!(matches!(
            store.get_by_slug("a").await,
            Err(StoreError::NotFound)
        ));

        let created = store.create(new_post("A", "a", true)).await.unwrap();
        assert!(created.id > 0);

        let fetched = store.get_by_slug("a").await.unwrap();
        assert_eq!(fetched.title, "A");
        assert_eq!(fetched.id, created.id);
    }

    #[sqlx::test]
    #[ignore] // Requires a PostgreSQL server in DATABASE_URL
    async fn test_list_published_newest_first(pool: PgPool) {
        let store = PgPostStore::new(pool);
        store.create(new_post("Old", "old", true)).await.unwrap();
        store.create(new_post("Hidden", "hidden", false)).await.unwrap();
        store.create(new_post("New", "new", true)).await.unwrap();

        let slugs: Vec<_> = store
            .list_published()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(slugs, vec!["new", "old"]);
    }

    #[sqlx::test]
    #[ignore] // Requires a PostgreSQL server in DATABASE_URL
    async fn test_duplicate_slug(pool: PgPool) {
        let store = PgPostStore::new(pool);
        store.create(new_post("A", "a", true)).await.unwrap();
        let err = store.create(new_post("A again", "a", true)).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateSlug(slug) if slug == "a"));
    }

    #[sqlx::test]
    #[ignore] // Requires a PostgreSQL server in DATABASE_URL
    async fn test_update_keeps_slug_and_created_at(pool: PgPool) {
        let store = PgPostStore::new(pool);
        let created = store.create(new_post("A", "a", false)).await.unwrap();

        let changes = PostUpdate {
            title: "B".to_string(),
            tagline: "new tagline".to_string(),
            body: "new body".to_string(),
            published: true,
        };
        let updated = store.update(created.id, changes).await.unwrap();
        assert_eq!(updated.title, "B");
        assert_eq!(updated.slug, "a");
        assert!(updated.published);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);

        let missing = PostUpdate {
            title: String::new(),
            tagline: String::new(),
            body: String::new(),
            published: false,
        };
        assert!(matches!(
            store.update(created.id + 1000, missing).await,
            Err(StoreError::NotFound)
        ));
    }

    #[sqlx::test]
    #[ignore] // Requires a PostgreSQL server in DATABASE_URL
    async fn test_delete_is_idempotent(pool: PgPool) {
        let store = PgPostStore::new(pool);
        let created = store.create(new_post("A", "a", true)).await.unwrap();
        store.delete(created.id).await.unwrap();
        store.delete(created.id).await.unwrap();
        assert!(matches!(
            store.get_by_slug("a").await,
            Err(StoreError::NotFound)
        ));
    }
}
