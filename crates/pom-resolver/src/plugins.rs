//! Plugin dependencies and `<pluginManagement>` composition.
//!
//! Plugin management is a leaner cousin of dependency management: keyed by
//! group/artifact only, version-only values, nearest-wins across the parent
//! chain. Profiles are not consulted for plugin management; they do
//! contribute build plugins.

use crate::log::Log;
use crate::management::MAX_ANCESTRY_DEPTH;
use crate::profiles::ActiveProfiles;
use crate::project::Project;
use crate::session::ProjectContainer;
use pom_model::{GroupArtifact, PartialGav, PomPlugin};
use std::collections::{HashMap, HashSet};

impl Project {
    /// Build plugins of this project and its active profiles, with GAVs
    /// interpolated. Versions may be missing here.
    pub fn interpolated_plugin_dependencies(
        &self,
        profiles: &ActiveProfiles,
        projects: &dyn ProjectContainer,
        log: &dyn Log,
    ) -> HashSet<PartialGav> {
        let cache_key = profiles.cache_key();
        if let Some(cached) = self.plugin_deps.borrow().get(&cache_key) {
            return cached.clone();
        }

        let mut result = HashSet::new();
        for plugin in &self.model.build_plugins {
            result.insert(self.interpolate_plugin_gav(plugin, projects, log));
        }
        for profile in self.model.profiles.iter().filter(|p| profiles.enables(p)) {
            for plugin in &profile.build_plugins {
                result.insert(self.interpolate_plugin_gav(plugin, projects, log));
            }
        }

        self.plugin_deps
            .borrow_mut()
            .insert(cache_key, result.clone());
        result
    }

    /// Build plugins with missing versions filled in from hierarchical
    /// plugin management. A version that still cannot be determined stays
    /// `None` and is reported.
    pub fn local_plugin_dependencies(
        &self,
        profiles: &ActiveProfiles,
        projects: &dyn ProjectContainer,
        log: &dyn Log,
    ) -> HashSet<PartialGav> {
        let interpolated = self.interpolated_plugin_dependencies(profiles, projects, log);

        let mut result = HashSet::new();
        for plugin in interpolated {
            if plugin.version.is_some() {
                result.insert(plugin);
                continue;
            }

            let management = self.hierarchical_plugin_dependency_management(projects, log);
            let key = GroupArtifact::new(
                plugin.group_id.clone().unwrap_or_default(),
                plugin.artifact_id.clone().unwrap_or_default(),
            );
            let version = management.get(&key).cloned();
            if version.is_none() {
                log.warning(&format!(
                    "unresolvable plugin dependency to {plugin} in project {self}"
                ));
            }
            result.insert(PartialGav::new(plugin.group_id, plugin.artifact_id, version));
        }
        result
    }

    /// `<pluginManagement>` folded across the parent chain, nearest-wins.
    pub fn hierarchical_plugin_dependency_management(
        &self,
        projects: &dyn ProjectContainer,
        log: &dyn Log,
    ) -> HashMap<GroupArtifact, String> {
        if let Some(cached) = self.plugin_dm.borrow().as_ref() {
            return cached.clone();
        }

        let mut accumulator = HashMap::new();
        let mut current = Some(self);
        let mut hops = 0usize;
        while let Some(project) = current {
            if hops > MAX_ANCESTRY_DEPTH {
                log.warning(&format!(
                    "parent chain of {self} exceeds depth {MAX_ANCESTRY_DEPTH}, plugin management truncated"
                ));
                break;
            }
            project.fold_plugin_management(&mut accumulator, projects, log);
            current = projects.parent_of(project);
            hops += 1;
        }

        *self.plugin_dm.borrow_mut() = Some(accumulator.clone());
        accumulator
    }

    fn fold_plugin_management(
        &self,
        accumulator: &mut HashMap<GroupArtifact, String>,
        projects: &dyn ProjectContainer,
        log: &dyn Log,
    ) {
        for plugin in &self.model.plugin_management {
            let gav = self.interpolate_plugin_gav(plugin, projects, log);
            // entries with no resolvable version contribute nothing
            let Some(version) = gav.version else {
                continue;
            };
            let key = GroupArtifact::new(
                gav.group_id.unwrap_or_default(),
                gav.artifact_id.unwrap_or_default(),
            );
            accumulator.entry(key).or_insert(version);
        }
    }

    fn interpolate_plugin_gav(
        &self,
        plugin: &PomPlugin,
        projects: &dyn ProjectContainer,
        log: &dyn Log,
    ) -> PartialGav {
        let raw = PartialGav::new(
            Some(plugin.group_id_or_default().to_string()),
            plugin.artifact_id.clone(),
            plugin.version.clone(),
        );
        self.interpolate_gav(&raw, projects, log)
    }
}
