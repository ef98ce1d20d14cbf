//! quill: a small server-rendered personal blog
//!
//! Posts live in PostgreSQL, pages are rendered with Tera templates, and
//! post bodies are written in Markdown.

pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;
pub mod server;
pub mod store;
pub mod templates;

use anyhow::Result;
use std::path::Path;

use store::PgPostStore;

/// The blog application: configuration plus resolved directories
#[derive(Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Layouts, partials, and pages
    pub templates_dir: std::path::PathBuf,
    /// Files served under /static
    pub static_dir: std::path::PathBuf,
}

impl Blog {
    /// Create a new Blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        }
        .apply_env();

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a Blog with an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let templates_dir = base_dir.join(&config.templates_dir);
        let static_dir = base_dir.join(&config.static_dir);

        Self {
            config,
            base_dir,
            templates_dir,
            static_dir,
        }
    }

    /// Connect to the database, migrating first if configured to
    pub async fn connect(&self) -> Result<PgPostStore> {
        let store =
            PgPostStore::connect(&self.config.database_url, self.config.max_connections).await?;
        if self.config.run_migrations {
            store.migrate().await?;
        }
        Ok(store)
    }
}
