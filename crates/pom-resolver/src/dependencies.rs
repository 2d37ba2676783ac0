//! Declared dependencies and effective version/scope computation.

use crate::log::Log;
use crate::profiles::ActiveProfiles;
use crate::project::Project;
use crate::session::ProjectContainer;
use pom_model::{
    Dependency, DependencyKey, GroupArtifact, PomDependency, PomExclusion, Scope, VersionScope,
};
use std::collections::{HashMap, HashSet};

/// A dependency declaration after interpolation, before any dependency
/// management is consulted.
pub(crate) struct InterpolatedDeclaration {
    pub key: DependencyKey,
    pub version: Option<String>,
    pub version_self_managed: bool,
    pub scope: Option<Scope>,
}

impl Project {
    pub(crate) fn interpolate_declaration(
        &self,
        declared: &PomDependency,
        projects: &dyn ProjectContainer,
        log: &dyn Log,
    ) -> InterpolatedDeclaration {
        let group_id = self
            .interpolate_value(declared.group_id.as_deref(), projects, log)
            .unwrap_or_default();
        let artifact_id = self
            .interpolate_value(declared.artifact_id.as_deref(), projects, log)
            .unwrap_or_default();
        let classifier = self.interpolate_value(declared.classifier.as_deref(), projects, log);
        let dep_type = self.interpolate_value(declared.dep_type.as_deref(), projects, log);
        let scope = self
            .interpolate_value(declared.scope.as_deref(), projects, log)
            .map(|s| s.parse::<Scope>().unwrap_or_default());

        let (version, version_self_managed) = match declared.version.as_deref() {
            Some(raw) => {
                let resolution = self.interpolate_value_ex(raw, projects, log);
                let self_managed = resolution.is_self_managed();
                (Some(resolution.into_resolved()), self_managed)
            }
            None => (None, true),
        };

        InterpolatedDeclaration {
            key: DependencyKey::new(group_id, artifact_id, classifier, dep_type),
            version,
            version_self_managed,
            scope,
        }
    }

    /// Computes the effective version and scope for one declaration,
    /// consulting hierarchical dependency management for whatever the
    /// declaration leaves open.
    pub(crate) fn determine_version_scope(
        &self,
        declaration: &InterpolatedDeclaration,
        profiles: &ActiveProfiles,
        projects: &dyn ProjectContainer,
        log: &dyn Log,
        version_can_be_self_managed: bool,
    ) -> VersionScope {
        let can_still_be_self_managed =
            version_can_be_self_managed && declaration.version_self_managed;

        if declaration.version.is_some() && declaration.scope.is_some() {
            return VersionScope::new(
                declaration.version.clone(),
                Some(can_still_be_self_managed),
                declaration.scope,
            );
        }

        let management = self.hierarchical_dependency_management(
            profiles,
            projects,
            log,
            version_can_be_self_managed,
        );
        let managed = management.get(&declaration.key);

        let mut version = declaration.version.clone();
        let mut scope = declaration.scope;
        let mut version_self_managed = version.is_some();

        if let Some(managed) = managed {
            if version.is_none() {
                version = managed.version_scope.version.clone();
                version_self_managed = managed.version_scope.is_version_self_managed();
            }
            if scope.is_none() {
                scope = managed.version_scope.scope;
            }
        }

        if version.is_none() {
            log.warning(&format!(
                "missing version and version not found in dependency management for dependency to {} in project {self}",
                declaration.key
            ));
        }

        VersionScope::new(
            version,
            Some(can_still_be_self_managed && version_self_managed),
            Some(scope.unwrap_or_default()),
        )
    }

    /// Declared dependencies with variables resolved. Dependency management
    /// is not consulted: a dependency that declares no version has none here.
    pub fn interpolated_dependencies(
        &self,
        projects: &dyn ProjectContainer,
        log: &dyn Log,
    ) -> Vec<Dependency> {
        if let Some(cached) = self.interpolated_deps.borrow().as_ref() {
            return cached.clone();
        }

        let mut dependencies = Vec::with_capacity(self.model.dependencies.len());
        for declared in &self.model.dependencies {
            let declaration = self.interpolate_declaration(declared, projects, log);
            let mut exclusions = HashSet::new();
            self.add_exclusions(&declared.exclusions, projects, log, &mut |exclusion| {
                exclusions.insert(exclusion);
            });
            dependencies.push(Dependency {
                key: declaration.key,
                version_scope: VersionScope::new(
                    declaration.version,
                    Some(declaration.version_self_managed),
                    declaration.scope,
                ),
                optional: declared.optional,
                exclusions,
            });
        }

        *self.interpolated_deps.borrow_mut() = Some(dependencies.clone());
        dependencies
    }

    /// This project's own `<dependencyManagement>` entries, interpolated and
    /// with effective version/scope.
    pub fn interpolated_dependency_management(
        &self,
        profiles: &ActiveProfiles,
        projects: &dyn ProjectContainer,
        log: &dyn Log,
    ) -> HashMap<DependencyKey, Dependency> {
        let cache_key = profiles.cache_key();
        if let Some(cached) = self.local_dm.borrow().get(&cache_key) {
            return cached.clone();
        }

        let mut result = HashMap::new();
        for declared in &self.model.dependency_management {
            let declaration = self.interpolate_declaration(declared, projects, log);
            let version_scope =
                self.determine_version_scope(&declaration, profiles, projects, log, true);
            let mut exclusions = HashSet::new();
            self.add_exclusions(&declared.exclusions, projects, log, &mut |exclusion| {
                exclusions.insert(exclusion);
            });
            result.insert(
                declaration.key.clone(),
                Dependency {
                    key: declaration.key,
                    version_scope,
                    optional: declared.optional,
                    exclusions,
                },
            );
        }

        self.local_dm.borrow_mut().insert(cache_key, result.clone());
        result
    }

    /// Declared dependencies (top-level plus active profiles') with their
    /// effective version and scope.
    pub fn local_dependencies(
        &self,
        profiles: &ActiveProfiles,
        projects: &dyn ProjectContainer,
        log: &dyn Log,
        version_can_be_self_managed: bool,
    ) -> HashMap<DependencyKey, Dependency> {
        let mut result = HashMap::new();
        self.fold_dependencies(
            &mut result,
            &self.model.dependencies,
            profiles,
            projects,
            log,
            version_can_be_self_managed,
        );
        for profile in self.model.profiles.iter().filter(|p| profiles.enables(p)) {
            self.fold_dependencies(
                &mut result,
                &profile.dependencies,
                profiles,
                projects,
                log,
                version_can_be_self_managed,
            );
        }
        result
    }

    fn fold_dependencies(
        &self,
        result: &mut HashMap<DependencyKey, Dependency>,
        entries: &[PomDependency],
        profiles: &ActiveProfiles,
        projects: &dyn ProjectContainer,
        log: &dyn Log,
        version_can_be_self_managed: bool,
    ) {
        for declared in entries {
            let declaration = self.interpolate_declaration(declared, projects, log);
            if result.contains_key(&declaration.key) {
                continue;
            }

            let version_scope = self.determine_version_scope(
                &declaration,
                profiles,
                projects,
                log,
                version_can_be_self_managed,
            );
            let mut exclusions = HashSet::new();
            self.add_exclusions(&declared.exclusions, projects, log, &mut |exclusion| {
                exclusions.insert(exclusion);
            });

            result.insert(
                declaration.key.clone(),
                Dependency {
                    key: declaration.key,
                    version_scope,
                    optional: declared.optional,
                    exclusions,
                },
            );
        }
    }

    /// Interpolates each declared exclusion and hands it to `add`.
    pub(crate) fn add_exclusions(
        &self,
        exclusions: &[PomExclusion],
        projects: &dyn ProjectContainer,
        log: &dyn Log,
        add: &mut dyn FnMut(GroupArtifact),
    ) {
        for exclusion in exclusions {
            let group_id = self
                .interpolate_value(exclusion.group_id.as_deref(), projects, log)
                .unwrap_or_default();
            let artifact_id = self
                .interpolate_value(exclusion.artifact_id.as_deref(), projects, log)
                .unwrap_or_default();
            add(GroupArtifact::new(group_id, artifact_id));
        }
    }
}
