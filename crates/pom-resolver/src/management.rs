//! Hierarchical dependency management composition.
//!
//! The dependency management visible to a project is its own
//! `<dependencyManagement>`, plus its ancestors', plus everything those
//! transitively import as BOMs. Folding walks the chain nearest-first and
//! never overwrites an entry already present, which yields Maven's
//! precedence: local POM, then nearer parents, then the BOMs they import.

use crate::log::Log;
use crate::profiles::ActiveProfiles;
use crate::project::Project;
use crate::session::ProjectContainer;
use pom_model::{DependencyKey, DependencyManagement, Gav, PomDependency, Scope};
use std::collections::HashMap;

/// Bound on parent-chain walks. The chain is supposed to be acyclic; this
/// is the safety net for universes where it is not.
pub(crate) const MAX_ANCESTRY_DEPTH: usize = 64;

impl Project {
    /// The dependency management visible to this project under the given
    /// profile set.
    ///
    /// With `version_can_be_self_managed = false` the returned entries all
    /// carry a demoted provenance flag; the underlying cache keeps the
    /// as-if-allowed view.
    pub fn hierarchical_dependency_management(
        &self,
        profiles: &ActiveProfiles,
        projects: &dyn ProjectContainer,
        log: &dyn Log,
        version_can_be_self_managed: bool,
    ) -> HashMap<DependencyKey, DependencyManagement> {
        let cache_key = profiles.cache_key();

        let cached = self.hierarchical_dm.borrow().get(&cache_key).cloned();
        let composed = match cached {
            Some(map) => map,
            None => {
                if !self.dm_in_progress.borrow_mut().insert(cache_key.clone()) {
                    // re-entered through a BOM import cycle: this project's
                    // management is already being composed further up the
                    // call stack, so this visit contributes nothing
                    return HashMap::new();
                }

                let mut accumulator = HashMap::new();
                let mut current = Some(self);
                let mut can_be_self_managed = true;
                let mut hops = 0usize;
                while let Some(project) = current {
                    if hops > MAX_ANCESTRY_DEPTH {
                        log.warning(&format!(
                            "parent chain of {self} exceeds depth {MAX_ANCESTRY_DEPTH}, dependency management truncated"
                        ));
                        break;
                    }
                    project.fold_dependency_management(
                        &mut accumulator,
                        profiles,
                        projects,
                        log,
                        can_be_self_managed,
                    );
                    current = projects.parent_of(project);
                    can_be_self_managed = false;
                    hops += 1;
                }

                self.dm_in_progress.borrow_mut().remove(&cache_key);
                self.hierarchical_dm
                    .borrow_mut()
                    .insert(cache_key, accumulator.clone());
                accumulator
            }
        };

        if version_can_be_self_managed {
            composed
        } else {
            composed
                .into_iter()
                .map(|(key, management)| (key, management.demoted()))
                .collect()
        }
    }

    /// Folds this project's own management (and its active profiles') into
    /// the accumulator, importing BOMs as it goes.
    fn fold_dependency_management(
        &self,
        accumulator: &mut HashMap<DependencyKey, DependencyManagement>,
        profiles: &ActiveProfiles,
        projects: &dyn ProjectContainer,
        log: &dyn Log,
        version_can_be_self_managed: bool,
    ) {
        self.fold_management_entries(
            accumulator,
            &self.model.dependency_management,
            profiles,
            projects,
            log,
            version_can_be_self_managed,
        );
        for profile in self.model.profiles.iter().filter(|p| profiles.enables(p)) {
            self.fold_management_entries(
                accumulator,
                &profile.dependency_management,
                profiles,
                projects,
                log,
                version_can_be_self_managed,
            );
        }
    }

    /// For each entry not already keyed in the accumulator: interpolate,
    /// compute the effective version/scope, attach exclusions, insert. An
    /// `import`-scoped entry additionally schedules a BOM import.
    fn fold_management_entries(
        &self,
        accumulator: &mut HashMap<DependencyKey, DependencyManagement>,
        entries: &[PomDependency],
        profiles: &ActiveProfiles,
        projects: &dyn ProjectContainer,
        log: &dyn Log,
        version_can_be_self_managed: bool,
    ) {
        let mut imported_boms = Vec::new();

        for declared in entries {
            let declaration = self.interpolate_declaration(declared, projects, log);
            if accumulator.contains_key(&declaration.key) {
                continue;
            }

            if declaration.scope == Some(Scope::Import) {
                match &declaration.version {
                    Some(version) => imported_boms.push(Gav::new(
                        declaration.key.group_id.clone(),
                        declaration.key.artifact_id.clone(),
                        version.clone(),
                    )),
                    None => log.error(&format!(
                        "cannot import BOM {} without a version in project {self}",
                        declaration.key
                    )),
                }
            }

            let version_scope = self.determine_version_scope(
                &declaration,
                profiles,
                projects,
                log,
                version_can_be_self_managed,
            );
            let mut management = DependencyManagement::new(version_scope);
            self.add_exclusions(&declared.exclusions, projects, log, &mut |exclusion| {
                management.add_exclusion(exclusion);
            });

            accumulator.insert(declaration.key, management);
        }

        for bom_gav in imported_boms {
            match projects.for_gav(&bom_gav) {
                Some(bom) => {
                    let imported =
                        bom.hierarchical_dependency_management(profiles, projects, log, false);
                    for (key, management) in imported {
                        accumulator.entry(key).or_insert(management);
                    }
                }
                None => log.error(&format!(
                    "missing project {bom_gav}, dependency management resolution won't be exact for project {self}"
                )),
            }
        }
    }
}
