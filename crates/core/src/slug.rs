//! URL slug derivation for product titles.
//!
//! Slugs are derived once, when a product is created, and are not kept unique.

use std::sync::LazyLock;

use regex::Regex;

static SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"));

/// Convert a title into a lowercase, hyphen-separated slug.
///
/// - `&` is spelled out as `and`.
/// - Runs of anything other than ASCII letters and digits collapse to one `-`.
/// - Leading and trailing hyphens are dropped.
///
/// # Examples
///
/// ```
/// use storefront_core::slug::slugify;
/// assert_eq!(slugify("Apple MacBook Pro 16\""), "apple-macbook-pro-16");
/// assert_eq!(slugify("Salt & Pepper"), "salt-and-pepper");
/// ```
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase().replace('&', " and ");
    SEPARATOR_RE
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}
