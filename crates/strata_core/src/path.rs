//! Hierarchy paths
//!
//! A hierarchy path is a `/`-delimited sequence of child names, analogous to a
//! filesystem path. Empty segments are ignored, so `""`, `"/"` and `"//"` all
//! name the archive root and `"/a//b/"` is the same path as `"a/b"`.

use std::fmt;

/// Canonical spelling of the archive root.
pub const ROOT_PATH: &str = "/";

/// Iterates over the non-empty segments of `path`, root first.
#[inline]
pub fn segments(path: &str) -> impl DoubleEndedIterator<Item = &str> + Clone {
    path.split('/').filter(|s| !s.is_empty())
}

/// Appends `name` to an absolute `parent` path.
///
/// The root is written as the empty prefix, so children of the root come out
/// as `/name` rather than `//name`.
#[must_use]
pub fn join_child(parent: &str, name: &str) -> String {
    let prefix = if parent == ROOT_PATH { "" } else { parent.trim_end_matches('/') };
    let mut out = String::with_capacity(prefix.len() + name.len() + 1);
    out.push_str(prefix);
    out.push('/');
    out.push_str(name);
    out
}

/// An owned, normalized hierarchy path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct HierarchyPath {
    segments: Vec<String>,
}

impl HierarchyPath {
    /// The archive root.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Parses `path`, dropping empty segments.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        Self {
            segments: segments(path).map(str::to_owned).collect(),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments below the root.
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn segments(&self) -> impl ExactSizeIterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    /// Last segment, or `None` for the root.
    #[inline]
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Returns `true` if `self` is `prefix` or lies beneath it.
    #[must_use]
    pub fn starts_with(&self, prefix: &HierarchyPath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// Segments of `self` below `prefix`, or `None` if `self` is not under it.
    #[must_use]
    pub fn strip_prefix(&self, prefix: &HierarchyPath) -> Option<HierarchyPath> {
        self.segments
            .strip_prefix(prefix.segments.as_slice())
            .map(|rest| HierarchyPath {
                segments: rest.to_vec(),
            })
    }

    /// Returns a new path with `name` appended.
    #[must_use]
    pub fn child(&self, name: &str) -> HierarchyPath {
        let mut segments = self.segments.clone();
        segments.push(name.to_owned());
        HierarchyPath { segments }
    }
}

impl fmt::Display for HierarchyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str(ROOT_PATH);
        }
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

impl From<&str> for HierarchyPath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_spellings_have_no_segments() {
        for path in ["", "/", "//", "///"] {
            assert_eq!(segments(path).count(), 0, "{path:?}");
            assert!(HierarchyPath::parse(path).is_root());
        }
    }

    #[test]
    fn repeated_and_trailing_slashes_are_ignored() {
        let collected: Vec<_> = segments("/a//b/c/").collect();
        assert_eq!(collected, ["a", "b", "c"]);
        assert_eq!(HierarchyPath::parse("a//b/c/").to_string(), "/a/b/c");
    }

    #[test]
    fn join_child_of_root_has_single_slash() {
        assert_eq!(join_child("/", "a"), "/a");
        assert_eq!(join_child("", "a"), "/a");
        assert_eq!(join_child("/a", "c"), "/a/c");
    }

    #[test]
    fn strip_prefix_returns_relative_path() {
        let full = HierarchyPath::parse("/a/b/c");
        let root = HierarchyPath::parse("/a");
        assert!(full.starts_with(&root));
        assert_eq!(full.strip_prefix(&root).unwrap().to_string(), "/b/c");
        assert!(root.strip_prefix(&full).is_none());
        assert!(full.strip_prefix(&HierarchyPath::parse("/x")).is_none());
    }

    #[test]
    fn child_and_name() {
        let path = HierarchyPath::root().child("a").child("b");
        assert_eq!(path.depth(), 2);
        assert_eq!(path.name(), Some("b"));
        assert_eq!(HierarchyPath::root().name(), None);
    }
}
