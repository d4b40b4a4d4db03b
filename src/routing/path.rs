//! Request path normalization.
//!
//! Splits a raw request path into URL-decoded segments. Empty segments are
//! dropped so `/a//b/` and `a/b` normalize identically.

use percent_encoding::percent_decode_str;

/// Split and decode a request path into segments.
///
/// Segments that are not valid UTF-8 after decoding are kept verbatim.
pub fn segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| {
            percent_decode_str(s)
                .decode_utf8()
                .map(|d| d.into_owned())
                .unwrap_or_else(|_| s.to_string())
        })
        .collect()
}

/// Trim leading and trailing slashes.
pub fn trim_slashes(path: &str) -> &str {
    path.trim_matches('/')
}

/// A segment is usable as part of a template identity.
///
/// Rejects traversal components and embedded separators that could only come
/// from percent-encoded input.
pub fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(['/', '\\', '\0'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_drop_empty() {
        assert_eq!(segments("/a//b/"), vec!["a", "b"]);
        assert!(segments("/").is_empty());
        assert!(segments("").is_empty());
    }

    #[test]
    fn test_segments_decode() {
        assert_eq!(segments("/caf%C3%A9/a%20b"), vec!["café", "a b"]);
    }

    #[test]
    fn test_segments_case_sensitive() {
        assert_eq!(segments("/Guides"), vec!["Guides"]);
    }

    #[test]
    fn test_safe_segment() {
        assert!(is_safe_segment("guides"));
        assert!(!is_safe_segment(".."));
        assert!(!is_safe_segment("a/b"));
        assert!(!is_safe_segment("a\\b"));
    }
}
