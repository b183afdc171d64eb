//! Slash-delimited menu path helpers.
//!
//! Menu paths always use `/` regardless of platform; segments are menu
//! labels, not filesystem entries.

/// Split a path into its segments. Empty segments are preserved, so an
/// empty path yields one empty segment that will never match a label.
pub fn split(path: &str) -> Vec<String> {
    path.split('/').map(str::to_string).collect()
}

/// Join a base path and a segment name with `/`.
pub fn join(base: &str, name: &str) -> String {
    if base.is_empty() {
        name.to_string()
    } else {
        format!("{base}/{name}")
    }
}

/// Parent portion of a path, or `None` for a single-segment path.
pub fn parent(path: &str) -> Option<&str> {
    path.rfind('/').map(|pos| &path[..pos])
}

/// Final segment of a path.
pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Whether `other` is `base` itself or lies underneath it.
pub fn contains(base: &str, other: &str) -> bool {
    match other.strip_prefix(base) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_and_join() {
        assert_eq!(split("foo/bar"), vec!["foo", "bar"]);
        assert_eq!(split("foo"), vec!["foo"]);
        assert_eq!(join("", "foo"), "foo");
        assert_eq!(join("foo", "bar"), "foo/bar");
    }

    #[test]
    fn test_parent_basename() {
        assert_eq!(parent("foo/bar/baz"), Some("foo/bar"));
        assert_eq!(parent("foo"), None);
        assert_eq!(basename("foo/bar"), "bar");
        assert_eq!(basename("foo"), "foo");
    }

    #[test]
    fn test_contains() {
        assert!(contains("foo", "foo"));
        assert!(contains("foo", "foo/bar"));
        assert!(contains("foo/bar", "foo/bar/baz"));
        assert!(!contains("foo", "foobar"));
        assert!(!contains("foo/bar", "foo"));
        assert!(!contains("bar", "foo/bar"));
    }
}
