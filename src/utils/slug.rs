//! Slug derivation for slug-governed fields.
//!
//! A person's `name` drives the file name of their entry and the URL of their
//! profile page: `"Ada Lovelace"` → `ada-lovelace`.

use deunicode::deunicode;

/// Convert human-readable text to a URL-safe slug.
///
/// Non-ASCII text is transliterated first, then every run of characters that
/// are not ASCII alphanumerics collapses into a single `-`. The result is
/// lowercase with no leading or trailing separator, and may be empty.
pub fn slugify(text: &str) -> String {
    let ascii = deunicode(text);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_sep = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('-');
            }
            pending_sep = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }

    slug
}

/// Check whether `text` is already a valid slug (what `slugify` would return
/// for itself, and non-empty).
pub fn is_slug(text: &str) -> bool {
    !text.is_empty() && slugify(text) == text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_simple_name() {
        assert_eq!(slugify("Ada Lovelace"), "ada-lovelace");
    }

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("  Grace -- Hopper!  "), "grace-hopper");
        assert_eq!(slugify("a_b.c"), "a-b-c");
    }

    #[test]
    fn test_slugify_transliterates_unicode() {
        assert_eq!(slugify("René Descartes"), "rene-descartes");
        assert_eq!(slugify("Zoë Ærø"), "zoe-aero");
    }

    #[test]
    fn test_slugify_keeps_digits() {
        assert_eq!(slugify("Team 42"), "team-42");
    }

    #[test]
    fn test_slugify_empty_and_symbols() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_is_slug() {
        assert!(is_slug("ada-lovelace"));
        assert!(!is_slug("Ada"));
        assert!(!is_slug("ada--lovelace"));
        assert!(!is_slug(""));
        assert!(!is_slug("../etc"));
    }
}
