//! Full-text keyword helpers.
//!
//! Lives in `core` (no database dependency) so both the repository layer and
//! request validation can share the same sanitization rules.

/// Sanitize user input into a list of terms suitable for tsquery construction.
///
/// - Splits on whitespace.
/// - Removes every non-alphanumeric character (except `_`) from each term,
///   so operators embedded mid-term (`a|b`, `x:y`) cannot reach the parser.
/// - Drops empty terms.
///
/// Returns `None` if the input yields no usable terms.
fn sanitize_terms(query: &str) -> Option<Vec<String>> {
    let terms: Vec<String> = query
        .split_whitespace()
        .map(|t| {
            t.chars()
                .filter(|c| c.is_alphanumeric() || *c == '_')
                .collect::<String>()
        })
        .filter(|t| !t.is_empty())
        .collect();

    if terms.is_empty() {
        None
    } else {
        Some(terms)
    }
}

/// Sanitize and convert user input into a PostgreSQL `tsquery` string.
///
/// - Whitespace-separated terms are joined with `|` (OR): a product matches
///   when it contains any of the terms.
/// - Empty or whitespace-only input returns `None`.
/// - Special characters that could break tsquery parsing are stripped.
///
/// # Examples
///
/// ```
/// use storefront_core::search::build_tsquery;
/// assert_eq!(build_tsquery("usb cable"), Some("usb | cable".to_string()));
/// assert_eq!(build_tsquery("  "), None);
/// ```
pub fn build_tsquery(query: &str) -> Option<String> {
    sanitize_terms(query).map(|terms| terms.join(" | "))
}
