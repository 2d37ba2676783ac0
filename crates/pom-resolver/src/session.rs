//! The project universe a resolution runs against.

use crate::error::Result;
use crate::project::Project;
use pom_model::Gav;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::PathBuf;

/// Capability supplying the universe in which a resolution takes place.
///
/// Two methods are all the engine ever needs to cross a project boundary:
/// lookup by GAV (BOM imports) and parent navigation. Project-to-project
/// navigation always goes through this capability, so projects carry no
/// back-pointers.
pub trait ProjectContainer {
    /// Looks up a project by its resolved GAV. `None` when the project is
    /// not known to this universe.
    fn for_gav(&self, gav: &Gav) -> Option<&Project>;

    /// The declared parent of `project`, if present in the universe.
    /// `None` at the root of a chain.
    fn parent_of<'a>(&'a self, project: &Project) -> Option<&'a Project> {
        project.parent_gav().and_then(|gav| self.for_gav(gav))
    }
}

/// In-memory project universe.
#[derive(Debug, Default)]
pub struct ProjectRegistry {
    projects: HashMap<Gav, Project>,
}

impl ProjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a project, replacing any previous project with the same GAV.
    pub fn register(&mut self, project: Project) -> &Project {
        let gav = project.gav().clone();
        tracing::debug!("registering project {gav}");
        match self.projects.entry(gav) {
            Entry::Occupied(mut entry) => {
                entry.insert(project);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(project),
        }
    }

    /// Reads, initializes and registers a project from a pom.xml file.
    pub fn load(&mut self, pom_file: impl Into<PathBuf>, is_external: bool) -> Result<&Project> {
        let project = Project::load(pom_file, is_external)?;
        Ok(self.register(project))
    }

    pub fn contains(&self, gav: &Gav) -> bool {
        self.projects.contains_key(gav)
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Project> {
        self.projects.values()
    }
}

impl ProjectContainer for ProjectRegistry {
    fn for_gav(&self, gav: &Gav) -> Option<&Project> {
        self.projects.get(gav)
    }
}
