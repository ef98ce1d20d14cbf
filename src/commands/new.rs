//! Create a new post from the command line

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

use crate::content::{slug, NewPost, Post};
use crate::store::PostStore;

/// Insert a post, deriving its slug from the title
pub async fn create_post(
    store: &dyn PostStore,
    title: &str,
    tagline: &str,
    body: &str,
    published: bool,
) -> Result<Post> {
    let post_slug = slug::generate(title);
    if post_slug.is_empty() {
        bail!("Title {:?} does not produce a usable slug", title);
    }

    let post = store
        .create(NewPost {
            title: title.to_string(),
            tagline: tagline.to_string(),
            body: body.to_string(),
            slug: post_slug,
            published,
        })
        .await
        .context("Failed to create post")?;

    Ok(post)
}

/// Run the new command, reading the body from a markdown file if given
pub async fn run(
    store: &dyn PostStore,
    title: &str,
    tagline: &str,
    body_file: Option<&Path>,
    published: bool,
) -> Result<()> {
    let body = match body_file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read body from {:?}", path))?,
        None => String::new(),
    };

    let post = create_post(store, title, tagline, &body, published).await?;
    println!("Created: /posts/{} (id {})", post.slug, post.id);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryPostStore;

    #[tokio::test]
    async fn test_create_post_generates_slug() {
        let store = MemoryPostStore::new();
        let post = create_post(&store, "Hello, World!", "hi", "# Body", true)
            .await
            .unwrap();
        assert_eq!(post.slug, "hello-world");
        assert_eq!(store.get_by_slug("hello-world").await.unwrap().id, post.id);
    }

    #[tokio::test]
    async fn test_create_post_rejects_empty_slug() {
        let store = MemoryPostStore::new();
        let err = create_post(&store, "???", "", "", false).await.unwrap_err();
        assert!(err.to_string().contains("usable slug"));
    }

    #[tokio::test]
    async fn test_run_reads_body_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("body.md");
        fs::write(&path, "# From file").unwrap();

        let store = MemoryPostStore::new();
        run(&store, "File Post", "", Some(&path), false).await.unwrap();
        assert_eq!(store.get_by_slug("file-post").await.unwrap().body, "# From file");
    }
}
