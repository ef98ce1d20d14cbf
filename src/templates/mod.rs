//! Template registry using the Tera template engine
//!
//! Layouts and partials are discovered by scanning `layouts/` and `partials/`
//! under the templates directory; each logical view maps to a fixed page file.
//! Everything is loaded once, before the server starts.

use anyhow::{bail, Context as _, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};
use thiserror::Error;
use walkdir::WalkDir;

use crate::config::SiteConfig;
use crate::content::{MarkdownRenderer, Post};
use crate::helpers::{date_xml, full_date};

/// Logical view name to page file, relative to the templates directory
pub const VIEWS: &[(&str, &str)] = &[
    ("home", "pages/home.html"),
    ("resume", "pages/resume.html"),
    ("posts.index", "pages/posts/index.html"),
    ("posts.show", "pages/posts/show.html"),
    ("posts.new", "pages/posts/new.html"),
    ("posts.edit", "pages/posts/edit.html"),
];

/// Directories scanned for shared templates
const SHARED_DIRS: &[&str] = &["layouts", "partials"];

/// Errors raised while rendering a view
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unknown view `{0}`")]
    UnknownView(String),

    #[error("failed to render view `{view}`: {source:?}")]
    Template {
        view: String,
        #[source]
        source: tera::Error,
    },
}

/// Composed templates keyed by view name
pub struct TemplateRenderer {
    tera: Tera,
    views: HashMap<&'static str, &'static str>,
    globals: Context,
}

impl TemplateRenderer {
    /// Load layouts, partials, and every view page from `templates_dir`
    pub fn load<P: AsRef<Path>>(templates_dir: P, site: &SiteData) -> Result<Self> {
        let templates_dir = templates_dir.as_ref();
        if !templates_dir.is_dir() {
            bail!("Templates directory not found: {:?}", templates_dir);
        }

        let mut files: Vec<(PathBuf, Option<String>)> = Vec::new();

        for dir in SHARED_DIRS {
            let shared_dir = templates_dir.join(dir);
            if !shared_dir.is_dir() {
                continue;
            }
            for entry in WalkDir::new(&shared_dir)
                .follow_links(true)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let path = entry.path();
                if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("html") {
                    continue;
                }
                let name = template_name(templates_dir, path)?;
                tracing::debug!("Registered template {} from {:?}", name, path);
                files.push((path.to_path_buf(), Some(name)));
            }
        }

        for (view, page) in VIEWS {
            let path = templates_dir.join(page);
            if !path.is_file() {
                bail!("Page for view {} not found: {:?}", view, path);
            }
            files.push((path, Some(page.to_string())));
        }

        let mut tera = Tera::default();
        tera.add_template_files(files)
            .with_context(|| format!("Failed to load templates from {:?}", templates_dir))?;

        let mut globals = Context::new();
        globals.insert("site", site);

        tracing::info!("Loaded {} views from {:?}", VIEWS.len(), templates_dir);

        Ok(Self {
            tera,
            views: VIEWS.iter().copied().collect(),
            globals,
        })
    }

    #[cfg(test)]
    pub(crate) fn has_view(&self, view: &str) -> bool {
        self.views.contains_key(view)
    }

    /// Render a view with the given data merged over the site globals
    pub fn render(&self, view: &str, data: &Context) -> Result<String, RenderError> {
        let page = self
            .views
            .get(view)
            .ok_or_else(|| RenderError::UnknownView(view.to_string()))?;

        let mut context = self.globals.clone();
        context.extend(data.clone());

        self.tera
            .render(page, &context)
            .map_err(|source| RenderError::Template {
                view: view.to_string(),
                source,
            })
    }
}

/// Name a template by its path relative to the templates root, `/`-separated
fn template_name(root: &Path, path: &Path) -> Result<String> {
    let relative = path.strip_prefix(root)?;
    Ok(relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/"))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub author: String,
    pub description: String,
}

impl From<&SiteConfig> for SiteData {
    fn from(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            author: config.author.clone(),
            description: config.description.clone(),
        }
    }
}

/// A post as listed on the index page
#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    pub title: String,
    pub tagline: String,
    pub path: String,
    pub date: String,
    pub date_xml: String,
}

impl From<&Post> for PostSummary {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            tagline: post.tagline.clone(),
            path: format!("/posts/{}", post.slug),
            date: full_date(&post.created_at),
            date_xml: date_xml(&post.created_at),
        }
    }
}

/// A post as shown on its own page
#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub title: String,
    pub tagline: String,
    pub slug: String,
    pub path: String,
    pub published: bool,
    /// Rendered markdown body, inserted unescaped
    pub content: String,
    pub date: String,
    pub date_xml: String,
    pub updated: String,
}

impl PostData {
    pub fn new(post: &Post, markdown: &MarkdownRenderer) -> Self {
        Self {
            title: post.title.clone(),
            tagline: post.tagline.clone(),
            slug: post.slug.clone(),
            path: format!("/posts/{}", post.slug),
            published: post.published,
            content: post.rendered_body(markdown),
            date: full_date(&post.created_at),
            date_xml: date_xml(&post.created_at),
            updated: full_date(&post.updated_at),
        }
    }
}

/// Values for the shared create/edit form
#[derive(Debug, Clone, Default, Serialize)]
pub struct FormData {
    pub action: String,
    pub title: String,
    pub tagline: String,
    pub body: String,
    pub published: bool,
}

impl FormData {
    /// Empty form posting to the create route
    pub fn blank() -> Self {
        Self {
            action: "/posts".to_string(),
            ..Self::default()
        }
    }

    /// Form pre-filled from an existing post, posting to its edit route
    pub fn for_post(post: &Post) -> Self {
        Self {
            action: format!("/posts/{}/edit", post.slug),
            title: post.title.clone(),
            tagline: post.tagline.clone(),
            body: post.body.clone(),
            published: post.published,
        }
    }
}
