//! Content module - posts, slugs, and markdown processing

mod markdown;
mod post;
pub mod slug;

pub use markdown::MarkdownRenderer;
pub use post::{NewPost, Post, PostUpdate};
