//! Helper functions shared by templates and commands

mod date;

pub use date::*;
