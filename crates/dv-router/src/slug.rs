//! Title to URL identifier mapping.
//!
//! There is no inverse: a slug is resolved back to a page by recomputing
//! [`slug`] for every catalog entry (see [`Catalog::find`](crate::Catalog::find)).

/// Convert a page title to a URL-safe slug.
///
/// Lowercases the title, keeps ASCII letters and digits, collapses every run
/// of other characters into a single `-`, and strips leading and trailing
/// dashes.
///
/// ```
/// use dv_router::slug;
///
/// assert_eq!(slug("Getting Started"), "getting-started");
/// assert_eq!(slug("  What's New?  "), "what-s-new");
/// ```
#[must_use]
pub fn slug(title: &str) -> String {
    let mut result = String::with_capacity(title.len());
    let mut last_was_dash = true; // Prevents leading dash

    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            result.push(c);
            last_was_dash = false;
        } else if !last_was_dash {
            result.push('-');
            last_was_dash = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    result
}
