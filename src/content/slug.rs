//! Title to URL slug conversion

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DISALLOWED: Regex = Regex::new(r"[^a-z0-9-]+").unwrap();
    static ref HYPHEN_RUNS: Regex = Regex::new(r"-{2,}").unwrap();
}

/// Generate a URL-safe slug from a post title
///
/// Lowercases, turns spaces into hyphens, drops anything outside `[a-z0-9-]`,
/// collapses hyphen runs and trims hyphens from both ends. A title without any
/// ASCII alphanumerics yields an empty string.
///
/// # Examples
/// ```
/// assert_eq!(quill::content::slug::generate("Hello, World!"), "hello-world");
/// ```
pub fn generate(title: &str) -> String {
    let hyphenated = title.to_lowercase().replace(' ', "-");
    let stripped = DISALLOWED.replace_all(&hyphenated, "");
    let collapsed = HYPHEN_RUNS.replace_all(&stripped, "-");
    collapsed.trim_matches('-').to_string()
}
