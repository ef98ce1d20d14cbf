//! Configuration module

mod site;

pub use site::SiteConfig;
pub use site::{DATABASE_URL_ENV, DEFAULT_DATABASE_URL};
