//! Version/scope pairs with provenance, dependency management entries and
//! interpolated dependencies.

use crate::{DependencyKey, GroupArtifact, Scope};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// An effective version and scope, with version provenance.
///
/// `version_self_managed` is `Some(true)` only when the version string was
/// produced entirely from the origin project's own declaration and
/// properties. `None` means the provenance is unknown, which consumers treat
/// as not self-managed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionScope {
    pub version: Option<String>,
    pub version_self_managed: Option<bool>,
    pub scope: Option<Scope>,
}

impl VersionScope {
    pub fn new(
        version: Option<String>,
        version_self_managed: Option<bool>,
        scope: Option<Scope>,
    ) -> Self {
        Self {
            version,
            version_self_managed,
            scope,
        }
    }

    pub fn is_version_self_managed(&self) -> bool {
        self.version_self_managed.unwrap_or(false)
    }

    pub fn scope_or_default(&self) -> Scope {
        self.scope.unwrap_or_default()
    }
}

/// One `<dependencyManagement>` entry: a pinned version/scope plus the
/// exclusions to apply wherever the entry is consulted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyManagement {
    pub version_scope: VersionScope,
    pub exclusions: HashSet<GroupArtifact>,
}

impl DependencyManagement {
    pub fn new(version_scope: VersionScope) -> Self {
        Self {
            version_scope,
            exclusions: HashSet::new(),
        }
    }

    pub fn add_exclusion(&mut self, exclusion: GroupArtifact) {
        self.exclusions.insert(exclusion);
    }

    /// Copy with the self-managed bit forced off; exclusions are kept.
    pub fn demoted(&self) -> Self {
        if !self.version_scope.is_version_self_managed() {
            return self.clone();
        }
        Self {
            version_scope: VersionScope {
                version_self_managed: Some(false),
                ..self.version_scope.clone()
            },
            exclusions: self.exclusions.clone(),
        }
    }
}

/// A declared dependency after interpolation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub key: DependencyKey,
    pub version_scope: VersionScope,
    pub optional: bool,
    pub exclusions: HashSet<GroupArtifact>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_managed_unknown_counts_as_false() {
        let vs = VersionScope::new(Some("1.0".into()), None, Some(Scope::Compile));
        assert!(!vs.is_version_self_managed());
    }

    #[test]
    fn test_scope_or_default() {
        let vs = VersionScope::new(Some("1.0".into()), Some(true), None);
        assert_eq!(vs.scope_or_default(), Scope::Compile);

        let vs = VersionScope::new(Some("1.0".into()), Some(true), Some(Scope::Test));
        assert_eq!(vs.scope_or_default(), Scope::Test);
    }

    #[test]
    fn test_demoted_forces_flag_off() {
        let mut management = DependencyManagement::new(VersionScope::new(
            Some("2.0".into()),
            Some(true),
            Some(Scope::Provided),
        ));
        management.add_exclusion(GroupArtifact::new("g", "a"));

        let demoted = management.demoted();
        assert_eq!(demoted.version_scope.version_self_managed, Some(false));
        assert_eq!(demoted.version_scope.version.as_deref(), Some("2.0"));
        assert_eq!(demoted.version_scope.scope, Some(Scope::Provided));
        // exclusions survive the demotion
        assert!(demoted.exclusions.contains(&GroupArtifact::new("g", "a")));
    }

    #[test]
    fn test_demoted_is_identity_when_not_self_managed() {
        let management = DependencyManagement::new(VersionScope::new(
            Some("2.0".into()),
            Some(false),
            Some(Scope::Compile),
        ));
        assert_eq!(management.demoted(), management);
    }

    #[test]
    fn test_dependency_serialization() {
        let dependency = Dependency {
            key: DependencyKey::new("com.example", "lib", None, None),
            version_scope: VersionScope::new(Some("1.0".into()), Some(true), Some(Scope::Compile)),
            optional: false,
            exclusions: HashSet::new(),
        };
        let json = serde_json::to_string(&dependency).unwrap();
        let back: Dependency = serde_json::from_str(&json).unwrap();
        assert_eq!(dependency, back);
    }
}
