//! URL-safe slugs derived from survey titles.

/// Fallback used when a title has no ASCII alphanumerics.
const EMPTY_SLUG: &str = "survey";

/// Lowercase ASCII alphanumerics, with every other run collapsed to one `-`.
#[must_use]
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        EMPTY_SLUG.to_string()
    } else {
        slug
    }
}

/// The `n`-th candidate for `base`: `base`, `base-2`, `base-3`, …
#[must_use]
pub fn candidate(base: &str, n: u32) -> String {
    if n <= 1 {
        base.to_string()
    } else {
        format!("{base}-{n}")
    }
}
