use std::fmt::{self, Display, Formatter};

use serde::Serialize;

/// One step from a node to one of its children.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a node inside a [`crate::Document`].
///
/// Renders as `rules[0].domain`; the root renders as `.`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct DocPath(Vec<PathSegment>);

impl DocPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Number of segments; the root has depth zero.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Child path under a mapping key.
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key.into()));
        Self(segments)
    }

    /// Child path under a sequence index.
    pub fn index(&self, idx: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(idx));
        Self(segments)
    }
}

impl Display for DocPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return write!(f, ".");
        }
        for (pos, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if pos == 0 => write!(f, "{key}")?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(idx) => write!(f, "[{idx}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::DocPath;

    #[test]
    fn display_mixes_keys_and_indexes() {
        let path = DocPath::root().key("rules").index(2).key("domain");
        assert_eq!(path.to_string(), "rules[2].domain");
        assert_eq!(path.depth(), 3);
    }

    #[test]
    fn root_renders_as_dot() {
        assert_eq!(DocPath::root().to_string(), ".");
        assert_eq!(DocPath::root().index(0).to_string(), "[0]");
    }
}
