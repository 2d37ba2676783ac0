//! Maven coordinates: full GAVs, partial GAVs and group/artifact pairs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker left in a string by an unexpanded `${...}` expression.
pub const UNRESOLVED_MARKER: &str = "${";

fn component_resolved(value: &str) -> bool {
    !value.is_empty() && !value.contains(UNRESOLVED_MARKER)
}

/// A fully materialized group/artifact/version coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gav {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl Gav {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        }
    }

    /// True iff no component is empty or still carries a `${...}` reference.
    pub fn is_resolved(&self) -> bool {
        component_resolved(&self.group_id)
            && component_resolved(&self.artifact_id)
            && component_resolved(&self.version)
    }

    pub fn group_artifact(&self) -> GroupArtifact {
        GroupArtifact::new(self.group_id.clone(), self.artifact_id.clone())
    }
}

impl fmt::Display for Gav {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

/// A coordinate triple whose components may be missing.
///
/// Raw (pre-interpolation) views and plugin coordinates use this shape: a
/// plugin declaration may omit its version entirely and rely on
/// `<pluginManagement>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartialGav {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
}

impl PartialGav {
    pub fn new(
        group_id: Option<String>,
        artifact_id: Option<String>,
        version: Option<String>,
    ) -> Self {
        Self {
            group_id,
            artifact_id,
            version,
        }
    }

    /// Promotes to a [`Gav`] when all components are present and resolved.
    pub fn resolved(&self) -> Option<Gav> {
        let gav = Gav::new(
            self.group_id.clone()?,
            self.artifact_id.clone()?,
            self.version.clone()?,
        );
        gav.is_resolved().then_some(gav)
    }
}

impl From<Gav> for PartialGav {
    fn from(gav: Gav) -> Self {
        Self::new(Some(gav.group_id), Some(gav.artifact_id), Some(gav.version))
    }
}

impl fmt::Display for PartialGav {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.group_id.as_deref().unwrap_or("?"),
            self.artifact_id.as_deref().unwrap_or("?"),
            self.version.as_deref().unwrap_or("?")
        )
    }
}

/// Identifies an artifact independently of its version.
///
/// Used as the plugin-management key and as the identity of an exclusion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupArtifact {
    pub group_id: String,
    pub artifact_id: String,
}

impl GroupArtifact {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
        }
    }
}

impl fmt::Display for GroupArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_gav() {
        let gav = Gav::new("org.apache.commons", "commons-lang3", "3.14.0");
        assert!(gav.is_resolved());
        assert_eq!(gav.to_string(), "org.apache.commons:commons-lang3:3.14.0");
    }

    #[test]
    fn test_unresolved_gav() {
        assert!(!Gav::new("com.example", "lib", "${lib.version}").is_resolved());
        assert!(!Gav::new("", "lib", "1.0").is_resolved());
        assert!(!Gav::new("${group}", "lib", "1.0").is_resolved());
    }

    #[test]
    fn test_group_artifact() {
        let gav = Gav::new("com.example", "lib", "1.0");
        assert_eq!(gav.group_artifact(), GroupArtifact::new("com.example", "lib"));
    }

    #[test]
    fn test_partial_gav_resolved() {
        let partial = PartialGav::new(
            Some("com.example".into()),
            Some("lib".into()),
            Some("1.0".into()),
        );
        assert_eq!(partial.resolved(), Some(Gav::new("com.example", "lib", "1.0")));
    }

    #[test]
    fn test_partial_gav_missing_component() {
        let partial = PartialGav::new(Some("com.example".into()), Some("lib".into()), None);
        assert!(partial.resolved().is_none());
        assert_eq!(partial.to_string(), "com.example:lib:?");
    }

    #[test]
    fn test_partial_gav_unresolved_expression() {
        let partial = PartialGav::new(
            Some("com.example".into()),
            Some("lib".into()),
            Some("${v}".into()),
        );
        assert!(partial.resolved().is_none());
    }

    #[test]
    fn test_partial_gav_from_gav() {
        let partial: PartialGav = Gav::new("g", "a", "1").into();
        assert_eq!(partial.version.as_deref(), Some("1"));
    }

    #[test]
    fn test_serde_round_trip() {
        let gav = Gav::new("com.example", "lib", "1.0");
        let json = serde_json::to_string(&gav).unwrap();
        let back: Gav = serde_json::from_str(&json).unwrap();
        assert_eq!(gav, back);
    }
}
