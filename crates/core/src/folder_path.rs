//! Remote folder paths (`Group`, `Group/Range`, `Group/Range/Product`).

use serde::{Deserialize, Serialize};

use crate::entity::EntityKind;
use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// A parsed, normalized storage folder path.
///
/// Segments keep the operator's spelling (case included); only surrounding
/// whitespace and empty segments are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FolderPath {
    segments: Vec<String>,
}

impl ValueObject for FolderPath {}

impl FolderPath {
    /// Deepest level of the taxonomy.
    pub const MAX_DEPTH: usize = 3;

    /// Parse a raw listing entry such as `"/Shelter/Peninsula/"`.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let segments = raw
            .split('/')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        Self::from_segments(segments).map_err(|e| match e {
            DomainError::InvalidPath(_) => DomainError::invalid_path(format!("'{raw}'")),
            other => other,
        })
    }

    pub fn from_segments(segments: Vec<String>) -> DomainResult<Self> {
        if segments.is_empty() {
            return Err(DomainError::invalid_path("path has no segments"));
        }
        if segments.iter().any(|s| s.trim().is_empty() || s == "." || s == ".." || s.contains('\\')) {
            return Err(DomainError::invalid_path(segments.join("/")));
        }
        if segments.len() > Self::MAX_DEPTH {
            return Err(DomainError::DepthExceeded {
                path: segments.join("/"),
                depth: segments.len(),
                max: Self::MAX_DEPTH,
            });
        }
        Ok(Self { segments })
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Taxonomy level of the leaf segment.
    pub fn kind(&self) -> EntityKind {
        // Depth is validated to 1..=MAX_DEPTH on construction.
        EntityKind::from_depth(self.depth()).unwrap_or(EntityKind::Product)
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn leaf(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    pub fn parent(&self) -> Option<FolderPath> {
        if self.segments.len() <= 1 {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }
}

impl core::fmt::Display for FolderPath {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

impl TryFrom<String> for FolderPath {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<FolderPath> for String {
    fn from(value: FolderPath) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_slashes_and_whitespace() {
        let path = FolderPath::parse("/ Shelter /Peninsula//K301/").unwrap();
        assert_eq!(path.segments(), ["Shelter", "Peninsula", "K301"]);
        assert_eq!(path.to_string(), "Shelter/Peninsula/K301");
        assert_eq!(path.kind(), EntityKind::Product);
        assert_eq!(path.leaf(), "K301");
    }

    #[test]
    fn parse_rejects_empty_and_too_deep() {
        assert!(matches!(FolderPath::parse(" / "), Err(DomainError::InvalidPath(_))));
        assert!(matches!(
            FolderPath::parse("a/b/c/d"),
            Err(DomainError::DepthExceeded { depth: 4, .. })
        ));
    }

    #[test]
    fn parse_rejects_traversal_segments() {
        assert!(FolderPath::parse("Shelter/../etc").is_err());
        assert!(FolderPath::parse("./Shelter").is_err());
    }

    #[test]
    fn parent_walks_up_one_level() {
        let path = FolderPath::parse("Shelter/Peninsula").unwrap();
        assert_eq!(path.parent().unwrap().to_string(), "Shelter");
        assert!(path.parent().unwrap().parent().is_none());
    }

    #[test]
    fn serde_uses_string_form() {
        let path: FolderPath = serde_json::from_str("\"Shelter/Peninsula\"").unwrap();
        assert_eq!(path.depth(), 2);
        assert_eq!(serde_json::to_string(&path).unwrap(), "\"Shelter/Peninsula\"");
    }
}
