//! List published posts

use anyhow::Result;

use crate::content::Post;
use crate::helpers::short_date;
use crate::store::PostStore;

/// Print published posts, newest first
pub async fn run(store: &dyn PostStore) -> Result<()> {
    let posts = store.list_published().await?;
    print!("{}", format_listing(&posts));
    Ok(())
}

/// One line per post: date, title, and path
pub fn format_listing(posts: &[Post]) -> String {
    let mut out = format!("Posts ({}):\n", posts.len());
    for post in posts {
        out.push_str(&format!(
            "  {} - {} [/posts/{}]\n",
            short_date(&post.created_at),
            post.title,
            post.slug
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::NewPost;
    use crate::store::memory::MemoryPostStore;

    #[tokio::test]
    async fn test_format_listing_skips_drafts() {
        let store = MemoryPostStore::new();
        for (title, slug, published) in [("Shown", "shown", true), ("Draft", "draft", false)] {
            store
                .create(NewPost {
                    title: title.to_string(),
                    tagline: String::new(),
                    body: String::new(),
                    slug: slug.to_string(),
                    published,
                })
                .await
                .unwrap();
        }

        let posts = store.list_published().await.unwrap();
        let listing = format_listing(&posts);
        assert!(listing.starts_with("Posts (1):\n"));
        assert!(listing.contains("Shown [/posts/shown]"));
        assert!(!listing.contains("Draft"));
    }

    #[test]
    fn test_format_empty_listing() {
        assert_eq!(format_listing(&[]), "Posts (0):\n");
    }
}
