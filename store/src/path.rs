//! Document paths.
//!
//! A [`DocPath`] addresses a subtree of the store: an ordered list of key
//! segments, displayed `/`-joined. The root path has no segments.

use crate::error::{Result, StoreError};

/// Characters the store forbids inside a key segment.
const FORBIDDEN: &[char] = &['.', '#', '$', '[', ']', '/'];

/// A path into the document tree.
///
/// # Examples
///
/// ```
/// use gatepass_store::DocPath;
///
/// let path = DocPath::new(["registrations", "user-1", "event-9"]);
/// assert_eq!(path.to_string(), "registrations/user-1/event-9");
/// assert_eq!(path.segments().len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocPath {
    segments: Vec<String>,
}

impl DocPath {
    /// The root of the tree (no segments).
    #[must_use]
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Builds a path from segments.
    ///
    /// Segment content is validated by the store at operation time, not
    /// here, so that domain code can build paths infallibly from ids the
    /// identity provider and the store itself produced.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Parses a `/`-separated path string, validating every segment.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidPath`] if any segment is empty or
    /// contains a forbidden character.
    pub fn parse(path: &str) -> Result<Self> {
        let parsed = Self::new(path.split('/').filter(|s| !s.is_empty()));
        parsed.validate()?;
        Ok(parsed)
    }

    /// Returns a new path with `segment` appended.
    #[must_use]
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// The path's segments, outermost first.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// `true` for the tree root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Checks every segment against the store's key rules.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidPath`] if any segment is empty or
    /// contains one of `. # $ [ ] /`.
    pub fn validate(&self) -> Result<()> {
        for segment in &self.segments {
            if segment.is_empty() || segment.contains(FORBIDDEN) {
                return Err(StoreError::InvalidPath {
                    path: self.to_string(),
                    segment: segment.clone(),
                });
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for DocPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}
