//! `${...}` expansion with provenance tracking.

use crate::log::Log;
use crate::project::Project;
use crate::session::ProjectContainer;
use pom_model::PartialGav;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Matches a single, non-nested `${name}` reference.
static PROPERTY_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{[^}]*\}").expect("Invalid regex"));

/// Bound on recursive expansion. Self-referential property definitions are
/// undefined behavior upstream; past this depth the value counts as
/// unresolved instead of looping.
pub(crate) const MAX_EXPANSION_DEPTH: usize = 64;

pub(crate) fn contains_property_reference(value: &str) -> bool {
    value.contains("${")
}

/// Outcome of interpolating one raw string against a project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueResolution {
    raw: String,
    resolved: String,
    self_managed: bool,
    has_unresolved_properties: bool,
    properties: HashMap<String, Option<String>>,
}

impl ValueResolution {
    /// The input string, verbatim.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The expanded string. Unresolved references appear as the literal
    /// text `null`.
    pub fn resolved(&self) -> &str {
        &self.resolved
    }

    pub fn into_resolved(self) -> String {
        self.resolved
    }

    /// True when every property consulted resolved within the origin
    /// project's own properties.
    pub fn is_self_managed(&self) -> bool {
        self.self_managed
    }

    pub fn has_unresolved_properties(&self) -> bool {
        self.has_unresolved_properties
    }

    /// Every property name referenced, with its resolved value (`None` for a
    /// miss).
    pub fn properties(&self) -> &HashMap<String, Option<String>> {
        &self.properties
    }
}

impl Project {
    /// Expands `${...}` references in `raw` and returns just the resulting
    /// string. `None` in, `None` out.
    pub fn interpolate_value(
        &self,
        raw: Option<&str>,
        projects: &dyn ProjectContainer,
        log: &dyn Log,
    ) -> Option<String> {
        raw.map(|value| self.interpolate_value_ex(value, projects, log).into_resolved())
    }

    /// Expands `${...}` references in `raw`, keeping full provenance.
    pub fn interpolate_value_ex(
        &self,
        raw: &str,
        projects: &dyn ProjectContainer,
        log: &dyn Log,
    ) -> ValueResolution {
        self.interpolate_with(raw, projects, log, true, 0)
    }

    pub(crate) fn interpolate_with(
        &self,
        raw: &str,
        projects: &dyn ProjectContainer,
        log: &dyn Log,
        can_be_self_managed: bool,
        depth: usize,
    ) -> ValueResolution {
        if let Some(cached) = self.resolutions.borrow().get(raw) {
            return cached.clone();
        }

        let mut resolution = ValueResolution {
            raw: raw.to_string(),
            resolved: String::new(),
            self_managed: can_be_self_managed,
            has_unresolved_properties: false,
            properties: HashMap::new(),
        };

        if depth > MAX_EXPANSION_DEPTH {
            log.warning(&format!(
                "property expansion exceeded depth {MAX_EXPANSION_DEPTH} for '{raw}' in project {self}"
            ));
            resolution.resolved = raw.to_string();
            resolution.self_managed = false;
            resolution.has_unresolved_properties = true;
            // not cached: a depth-limited answer must not shadow the real one
            return resolution;
        }

        let mut resolved = String::new();
        let mut last_end = 0usize;

        for reference in PROPERTY_REF.find_iter(raw) {
            resolved.push_str(&raw[last_end..reference.start()]);
            let name = &raw[reference.start() + 2..reference.end() - 1];

            let value = match self.resolve_property(name, projects, log, depth) {
                Some(location) => {
                    resolution.self_managed &= location.self_managed;
                    self.expand_property_value(&location, projects, log, depth, &mut resolution)
                }
                None => None,
            };

            match &value {
                Some(value) => resolved.push_str(value),
                None => {
                    resolved.push_str("null");
                    resolution.has_unresolved_properties = true;
                    resolution.self_managed = false;
                }
            }
            resolution.properties.insert(name.to_string(), value);

            last_end = reference.end();
        }
        resolved.push_str(&raw[last_end..]);
        resolution.resolved = resolved;

        self.resolutions
            .borrow_mut()
            .insert(raw.to_string(), resolution.clone());
        resolution
    }

    /// A property value may itself contain `${...}`; expand it through the
    /// project that defines it until it is stable or proves unresolvable.
    fn expand_property_value(
        &self,
        location: &crate::properties::PropertyLocation<'_>,
        projects: &dyn ProjectContainer,
        log: &dyn Log,
        depth: usize,
        resolution: &mut ValueResolution,
    ) -> Option<String> {
        let mut value = location.value.clone();
        let mut hops = depth;
        while contains_property_reference(&value) {
            hops += 1;
            if hops > MAX_EXPANSION_DEPTH {
                log.warning(&format!(
                    "property expansion exceeded depth {MAX_EXPANSION_DEPTH} for '{}' in project {self}",
                    location.name
                ));
                return None;
            }
            let nested = location.project.interpolate_with(
                &value,
                projects,
                log,
                location.self_managed,
                hops,
            );
            if nested.has_unresolved_properties {
                return None;
            }
            resolution.self_managed &= nested.self_managed;
            if nested.resolved == value {
                // a dangling `${` with no closing brace expands to itself
                break;
            }
            value = nested.resolved;
        }
        Some(value)
    }

    /// Interpolates the three coordinate components independently.
    pub fn interpolate_gav(
        &self,
        gav: &PartialGav,
        projects: &dyn ProjectContainer,
        log: &dyn Log,
    ) -> PartialGav {
        PartialGav::new(
            self.interpolate_value(gav.group_id.as_deref(), projects, log),
            self.interpolate_value(gav.artifact_id.as_deref(), projects, log),
            self.interpolate_value(gav.version.as_deref(), projects, log),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::MemoryLog;
    use crate::session::ProjectRegistry;
    use pom_model::{Gav, PomModel, PomParent};

    fn project_with_properties(properties: &[(&str, &str)]) -> Project {
        let model = PomModel {
            group_id: Some("com.example".into()),
            artifact_id: Some("app".into()),
            version: Some("1.0".into()),
            properties: properties
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..Default::default()
        };
        Project::from_model(model, "app/pom.xml", false).unwrap()
    }

    #[test]
    fn test_plain_string_passes_through() {
        let project = project_with_properties(&[]);
        let registry = ProjectRegistry::new();
        let log = MemoryLog::new();

        let resolution = project.interpolate_value_ex("just text", &registry, &log);
        assert_eq!(resolution.resolved(), "just text");
        assert!(resolution.is_self_managed());
        assert!(!resolution.has_unresolved_properties());
        assert!(resolution.properties().is_empty());
    }

    #[test]
    fn test_single_reference() {
        let project = project_with_properties(&[("lib.version", "1.2.3")]);
        let registry = ProjectRegistry::new();
        let log = MemoryLog::new();

        let resolution = project.interpolate_value_ex("${lib.version}", &registry, &log);
        assert_eq!(resolution.resolved(), "1.2.3");
        assert!(resolution.is_self_managed());
        assert_eq!(
            resolution.properties().get("lib.version"),
            Some(&Some("1.2.3".to_string()))
        );
    }

    #[test]
    fn test_mixed_literal_and_references() {
        let project = project_with_properties(&[("major", "2"), ("minor", "7")]);
        let registry = ProjectRegistry::new();
        let log = MemoryLog::new();

        let resolution =
            project.interpolate_value_ex("v${major}.${minor}-final", &registry, &log);
        assert_eq!(resolution.resolved(), "v2.7-final");
        assert!(resolution.is_self_managed());
        assert_eq!(resolution.properties().len(), 2);
    }

    #[test]
    fn test_unresolved_reference_becomes_null_text() {
        let project = project_with_properties(&[]);
        let registry = ProjectRegistry::new();
        let log = MemoryLog::new();

        let resolution = project.interpolate_value_ex("${missing}", &registry, &log);
        assert_eq!(resolution.resolved(), "null");
        assert!(resolution.has_unresolved_properties());
        assert!(!resolution.is_self_managed());
        assert_eq!(resolution.properties().get("missing"), Some(&None));
        assert!(project.unresolved_properties().contains("missing"));
        assert_eq!(log.warnings().len(), 1);
    }

    #[test]
    fn test_chained_property_definitions() {
        let project = project_with_properties(&[
            ("a", "${b}"),
            ("b", "${c}"),
            ("c", "bottom"),
        ]);
        let registry = ProjectRegistry::new();
        let log = MemoryLog::new();

        let resolution = project.interpolate_value_ex("${a}", &registry, &log);
        assert_eq!(resolution.resolved(), "bottom");
        assert!(resolution.is_self_managed());
    }

    #[test]
    fn test_chained_definition_with_missing_tail() {
        let project = project_with_properties(&[("a", "${b}")]);
        let registry = ProjectRegistry::new();
        let log = MemoryLog::new();

        let resolution = project.interpolate_value_ex("${a}", &registry, &log);
        assert_eq!(resolution.resolved(), "null");
        assert!(resolution.has_unresolved_properties());
    }

    #[test]
    fn test_self_referential_property_terminates() {
        let project = project_with_properties(&[("loop", "${loop}")]);
        let registry = ProjectRegistry::new();
        let log = MemoryLog::new();

        let resolution = project.interpolate_value_ex("${loop}", &registry, &log);
        assert!(resolution.has_unresolved_properties());
        assert!(!resolution.is_self_managed());
    }

    #[test]
    fn test_parent_property_clears_self_managed() {
        let parent_model = PomModel {
            group_id: Some("g".into()),
            artifact_id: Some("parent".into()),
            version: Some("1".into()),
            properties: [("spring.version".to_string(), "5.0.0".to_string())]
                .into_iter()
                .collect(),
            ..Default::default()
        };
        let child_model = PomModel {
            artifact_id: Some("child".into()),
            parent: Some(PomParent {
                group_id: Some("g".into()),
                artifact_id: Some("parent".into()),
                version: Some("1".into()),
            }),
            ..Default::default()
        };
        let mut registry = ProjectRegistry::new();
        registry.register(Project::from_model(parent_model, "parent/pom.xml", false).unwrap());
        registry.register(Project::from_model(child_model, "child/pom.xml", false).unwrap());
        let log = MemoryLog::new();

        let child = registry.for_gav(&Gav::new("g", "child", "1")).unwrap();
        let resolution = child.interpolate_value_ex("${spring.version}", &registry, &log);
        assert_eq!(resolution.resolved(), "5.0.0");
        assert!(!resolution.is_self_managed());
    }

    #[test]
    fn test_self_managed_is_the_and_of_all_lookups() {
        let parent_model = PomModel {
            group_id: Some("g".into()),
            artifact_id: Some("parent".into()),
            version: Some("1".into()),
            properties: [("from.parent".to_string(), "p".to_string())]
                .into_iter()
                .collect(),
            ..Default::default()
        };
        let child_model = PomModel {
            artifact_id: Some("child".into()),
            parent: Some(PomParent {
                group_id: Some("g".into()),
                artifact_id: Some("parent".into()),
                version: Some("1".into()),
            }),
            properties: [("local".to_string(), "l".to_string())]
                .into_iter()
                .collect(),
            ..Default::default()
        };
        let mut registry = ProjectRegistry::new();
        registry.register(Project::from_model(parent_model, "parent/pom.xml", false).unwrap());
        registry.register(Project::from_model(child_model, "child/pom.xml", false).unwrap());
        let log = MemoryLog::new();

        let child = registry.for_gav(&Gav::new("g", "child", "1")).unwrap();
        // an inherited lookup taints the whole value, whatever comes after
        let resolution =
            child.interpolate_value_ex("${from.parent}-${local}", &registry, &log);
        assert_eq!(resolution.resolved(), "p-l");
        assert!(!resolution.is_self_managed());
    }

    #[test]
    fn test_interpolation_is_deterministic_and_cached() {
        let project = project_with_properties(&[("v", "9")]);
        let registry = ProjectRegistry::new();
        let log = MemoryLog::new();

        let first = project.interpolate_value_ex("lib-${v}", &registry, &log);
        let second = project.interpolate_value_ex("lib-${v}", &registry, &log);
        assert_eq!(first, second);
        assert_eq!(first.raw(), "lib-${v}");
    }

    #[test]
    fn test_unresolved_result_is_cached_with_one_warning() {
        let project = project_with_properties(&[]);
        let registry = ProjectRegistry::new();
        let log = MemoryLog::new();

        let first = project.interpolate_value_ex("${nope}", &registry, &log);
        let second = project.interpolate_value_ex("${nope}", &registry, &log);
        assert_eq!(first, second);
        // the second query is a cache hit; the miss is only reported once
        assert_eq!(log.warnings().len(), 1);
    }

    #[test]
    fn test_interpolate_gav() {
        let project = project_with_properties(&[("dep.version", "4.4")]);
        let registry = ProjectRegistry::new();
        let log = MemoryLog::new();

        let raw = PartialGav::new(
            Some("${project.groupId}".into()),
            Some("lib".into()),
            Some("${dep.version}".into()),
        );
        let interpolated = project.interpolate_gav(&raw, &registry, &log);
        assert_eq!(
            interpolated,
            PartialGav::new(
                Some("com.example".into()),
                Some("lib".into()),
                Some("4.4".into())
            )
        );
    }

    #[test]
    fn test_interpolate_gav_keeps_missing_components() {
        let project = project_with_properties(&[]);
        let registry = ProjectRegistry::new();
        let log = MemoryLog::new();

        let raw = PartialGav::new(Some("g".into()), Some("a".into()), None);
        let interpolated = project.interpolate_gav(&raw, &registry, &log);
        assert!(interpolated.version.is_none());
    }

    #[test]
    fn test_builtin_reference_is_self_managed() {
        let project = project_with_properties(&[]);
        let registry = ProjectRegistry::new();
        let log = MemoryLog::new();

        let resolution =
            project.interpolate_value_ex("${project.groupId}-suffix", &registry, &log);
        assert_eq!(resolution.resolved(), "com.example-suffix");
        assert!(resolution.is_self_managed());
    }
}
