//! Post model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MarkdownRenderer;

/// A blog post as stored in the `posts` table
///
/// Values are detached snapshots of a row; mutating one does not touch the
/// database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    /// Store-assigned identifier
    pub id: i64,

    /// Post title
    pub title: String,

    /// One-line summary shown under the title
    pub tagline: String,

    /// Raw markdown content
    pub body: String,

    /// URL-friendly name, fixed at creation
    pub slug: String,

    /// Whether the post appears in the public listing
    pub published: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Convert the markdown body to HTML, falling back to the raw body
    pub fn rendered_body(&self, markdown: &MarkdownRenderer) -> String {
        markdown.render_or_raw(&self.body)
    }
}

/// Fields supplied when inserting a post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub tagline: String,
    pub body: String,
    pub slug: String,
    pub published: bool,
}

/// The mutable fields of a post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostUpdate {
    pub title: String,
    pub tagline: String,
    pub body: String,
    pub published: bool,
}
