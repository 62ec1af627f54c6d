//! Slug and path conventions shared by every pipeline stage.
//!
//! A node's **slug** is its directory name. Its **slug path** is the
//! `/`-joined chain of slugs from the articles directory down to it, and its
//! **canonical path** (the URL path redirects point at) is the slug path with
//! a leading `/`:
//!
//! ```text
//! articles/machine-learning/llms/attention/README.md
//!   slug            attention
//!   slug path       machine-learning/llms/attention
//!   canonical path  /machine-learning/llms/attention
//! ```
//!
//! Configuration files are written by hand, so every path coming from them
//! is normalized before comparison: surrounding whitespace, leading and
//! trailing slashes, and empty segments (`a//b`) are all ignored.

const MAX_SLUG_LEN: usize = 80;

/// Normalize a hand-written slug path: `"/ml/llms/"` → `"ml/llms"`.
///
/// The root normalizes to the empty string.
pub fn normalize_slug_path(raw: &str) -> String {
    raw.trim()
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Normalize a URL path for the redirect table: `"old-path/"` → `"/old-path"`.
pub fn normalize_url_path(raw: &str) -> String {
    canonical_path(&normalize_slug_path(raw))
}

/// Canonical URL path for a slug path. The root is `"/"`.
pub fn canonical_path(slug_path: &str) -> String {
    format!("/{slug_path}")
}

/// Join a parent slug path and a child slug.
pub fn join_slug_path(parent: &str, slug: &str) -> String {
    if parent.is_empty() {
        slug.to_string()
    } else {
        format!("{parent}/{slug}")
    }
}

/// Parent of a slug path; the parent of a top-level slug is the root (`""`).
pub fn parent_slug_path(slug_path: &str) -> &str {
    slug_path
        .rsplit_once('/')
        .map(|(parent, _)| parent)
        .unwrap_or("")
}

/// Sanitize a directory name into a URL-safe slug.
///
/// - Keeps ASCII alphanumerics, `-` and `_`; everything else becomes `-`
/// - Collapses consecutive dashes into one
/// - Strips leading and trailing dashes
/// - Truncates to `MAX_SLUG_LEN` characters (breaks at last dash before limit)
pub fn sanitize_slug(name: &str) -> String {
    let mut collapsed = String::with_capacity(name.len());
    let mut prev_dash = false;
    for c in name.chars() {
        let c = if c.is_ascii_alphanumeric() || c == '_' {
            c
        } else {
            '-'
        };
        if c == '-' {
            if !prev_dash {
                collapsed.push('-');
            }
            prev_dash = true;
        } else {
            collapsed.push(c);
            prev_dash = false;
        }
    }

    let trimmed = collapsed.trim_matches('-');

    if trimmed.len() <= MAX_SLUG_LEN {
        trimmed.to_string()
    } else {
        let truncated = &trimmed[..MAX_SLUG_LEN];
        match truncated.rfind('-') {
            Some(pos) => truncated[..pos].to_string(),
            None => truncated.to_string(),
        }
    }
}

/// A slug is URL-safe when sanitizing it changes nothing.
pub fn is_url_safe(slug: &str) -> bool {
    !slug.is_empty() && sanitize_slug(slug) == slug
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Path normalization
    // =========================================================================

    #[test]
    fn normalize_strips_slashes_and_whitespace() {
        assert_eq!(normalize_slug_path(" /ml/llms/ "), "ml/llms");
        assert_eq!(normalize_slug_path("ml//llms"), "ml/llms");
    }

    #[test]
    fn root_normalizes_to_empty() {
        assert_eq!(normalize_slug_path(""), "");
        assert_eq!(normalize_slug_path("/"), "");
        assert_eq!(normalize_slug_path("  "), "");
    }

    #[test]
    fn url_path_gets_single_leading_slash() {
        assert_eq!(normalize_url_path("old-path/"), "/old-path");
        assert_eq!(normalize_url_path("//a/b"), "/a/b");
        assert_eq!(normalize_url_path("/"), "/");
    }

    #[test]
    fn join_and_parent_are_inverse() {
        let path = join_slug_path("ml/llms", "attention");
        assert_eq!(path, "ml/llms/attention");
        assert_eq!(parent_slug_path(&path), "ml/llms");
    }

    #[test]
    fn join_onto_root() {
        assert_eq!(join_slug_path("", "ml"), "ml");
        assert_eq!(parent_slug_path("ml"), "");
    }

    // =========================================================================
    // sanitize_slug() tests
    // =========================================================================

    #[test]
    fn sanitize_slug_passthrough() {
        assert_eq!(sanitize_slug("rust-async"), "rust-async");
        assert_eq!(sanitize_slug("web_assembly2"), "web_assembly2");
    }

    #[test]
    fn sanitize_slug_replaces_spaces_and_special_chars() {
        assert_eq!(sanitize_slug("Rust Async!"), "Rust-Async");
        assert_eq!(sanitize_slug("c++ & co"), "c-co");
    }

    #[test]
    fn sanitize_slug_collapses_and_trims_dashes() {
        assert_eq!(sanitize_slug("a---b"), "a-b");
        assert_eq!(sanitize_slug("--hello--"), "hello");
        assert_eq!(sanitize_slug("---"), "");
    }

    #[test]
    fn sanitize_slug_truncates_at_word_boundary() {
        let name = "this-is-a-very-long-directory-name-that-exceeds-the-maximum-slug-length-and-gets-cut-here";
        let result = sanitize_slug(name);
        assert!(result.len() <= MAX_SLUG_LEN);
        assert!(!result.ends_with('-'));
        assert!(!result.contains("here"));
    }

    #[test]
    fn sanitize_slug_handles_unicode() {
        assert_eq!(sanitize_slug("café"), "caf");
        assert_eq!(sanitize_slug("日本語"), "");
    }

    #[test]
    fn url_safe_detection() {
        assert!(is_url_safe("llm-evals"));
        assert!(!is_url_safe("LLM evals"));
        assert!(!is_url_safe("-leading"));
        assert!(!is_url_safe(""));
    }
}
