//! CLI subcommands that work against the post store

pub mod list;
pub mod new;
