//! Dependency identity within management and deduplication maps.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default artifact type when a dependency declares none.
pub const DEFAULT_TYPE: &str = "jar";

/// Identifies the "slot" a dependency occupies.
///
/// Two dependencies with an equal key are the same slot for dependency
/// management override and deduplication, regardless of version or scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyKey {
    pub group_id: String,
    pub artifact_id: String,
    pub classifier: Option<String>,
    pub dep_type: String,
}

impl DependencyKey {
    /// Builds a key; an absent `dep_type` defaults to `"jar"`.
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        classifier: Option<String>,
        dep_type: Option<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            classifier,
            dep_type: dep_type.unwrap_or_else(|| DEFAULT_TYPE.to_string()),
        }
    }

    pub fn group_artifact(&self) -> crate::GroupArtifact {
        crate::GroupArtifact::new(self.group_id.clone(), self.artifact_id.clone())
    }
}

impl fmt::Display for DependencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)?;
        if let Some(classifier) = &self.classifier {
            write!(f, ":{classifier}")?;
        }
        write!(f, ":{}", self.dep_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_type() {
        let key = DependencyKey::new("com.example", "lib", None, None);
        assert_eq!(key.dep_type, "jar");
    }

    #[test]
    fn test_explicit_type() {
        let key = DependencyKey::new("com.example", "bom", None, Some("pom".into()));
        assert_eq!(key.dep_type, "pom");
    }

    #[test]
    fn test_keys_differ_by_classifier() {
        let plain = DependencyKey::new("g", "a", None, None);
        let sources = DependencyKey::new("g", "a", Some("sources".into()), None);
        assert_ne!(plain, sources);
    }

    #[test]
    fn test_display() {
        let key = DependencyKey::new("g", "a", None, None);
        assert_eq!(key.to_string(), "g:a:jar");

        let key = DependencyKey::new("g", "a", Some("sources".into()), Some("jar".into()));
        assert_eq!(key.to_string(), "g:a:sources:jar");
    }
}
