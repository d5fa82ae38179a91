//! Tag-name paths addressing a descendant of the root element

use std::fmt;
use std::str::FromStr;

use crate::error::PathError;

/// Ordered tag names, walked as first-matching children from the root.
///
/// The root element itself is not part of the path; an empty path
/// addresses the root.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct NodePath {
    segments: Vec<String>,
}

impl NodePath {
    pub const SEPARATOR: char = '/';

    pub fn root() -> Self {
        Self::default()
    }

    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Extend the path by one child segment
    pub fn join(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }
}

impl FromStr for NodePath {
    type Err = PathError;

    /// Parse `"A/B/C"`. Surrounding separators are ignored, so `"/A/B/"`
    /// is the same path; `""` and `"/"` address the root.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_matches(Self::SEPARATOR);
        if trimmed.is_empty() {
            return Ok(Self::root());
        }
        let segments: Vec<String> = trimmed
            .split(Self::SEPARATOR)
            .map(str::trim)
            .map(str::to_string)
            .collect();
        if segments.iter().any(String::is_empty) {
            return Err(PathError::EmptySegment {
                path: s.to_string(),
            });
        }
        Ok(Self { segments })
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.segments.join("/"))
    }
}

impl<S: Into<String>> FromIterator<S> for NodePath {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_path() -> Result<(), PathError> {
        let path: NodePath = "TargetEndpoints/VersionInfo".parse()?;
        assert_eq!(path.segments(), ["TargetEndpoints", "VersionInfo"]);
        assert_eq!(path.len(), 2);
        Ok(())
    }

    #[test]
    fn test_parse_ignores_outer_separators() -> Result<(), PathError> {
        let path: NodePath = "/a/b/".parse()?;
        assert_eq!(path, NodePath::new(["a", "b"]));
        Ok(())
    }

    #[test]
    fn test_parse_root() -> Result<(), PathError> {
        assert!("".parse::<NodePath>()?.is_root());
        assert!("/".parse::<NodePath>()?.is_root());
        Ok(())
    }

    #[test]
    fn test_parse_rejects_empty_segment() {
        assert!(matches!(
            "a//b".parse::<NodePath>(),
            Err(PathError::EmptySegment { .. })
        ));
    }

    #[test]
    fn test_display_and_join() {
        let path = NodePath::root().join("a").join("b");
        assert_eq!(path.to_string(), "/a/b");
        assert_eq!(NodePath::root().to_string(), "/");
    }

    #[test]
    fn test_collect_from_iterator() {
        let path: NodePath = ["x", "y"].into_iter().collect();
        assert_eq!(path.segments(), ["x", "y"]);
    }
}
