//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable holding the database connection string
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Connection string used when neither the config file nor the environment sets one
pub const DEFAULT_DATABASE_URL: &str =
    "postgres://localhost:5432/quill_development?sslmode=disable";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub author: String,
    pub description: String,

    // Database
    pub database_url: String,
    pub max_connections: u32,
    pub run_migrations: bool,

    // Directory
    pub templates_dir: String,
    pub static_dir: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Quill".to_string(),
            author: "John Doe".to_string(),
            description: String::new(),

            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 5,
            run_migrations: true,

            templates_dir: "templates".to_string(),
            static_dir: "static".to_string(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(self) -> Self {
        self.with_database_url(std::env::var(DATABASE_URL_ENV).ok())
    }

    /// Override the connection string when a non-empty value is given
    pub fn with_database_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.is_empty()) {
            self.database_url = url;
        }
        self
    }
}
