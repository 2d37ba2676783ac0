//! A single Maven project and its memoized resolution state.

use crate::error::{PomError, Result};
use crate::interpolate::ValueResolution;
use crate::reader;
use pom_model::{
    Dependency, DependencyKey, DependencyManagement, Gav, GroupArtifact, PartialGav, PomModel,
};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

/// A POM project.
///
/// Reading the file and computing the GAV happen eagerly at construction;
/// everything after that is pure computation over the in-memory model, plus
/// lookups in the [`ProjectContainer`](crate::ProjectContainer) for anything
/// that crosses a project boundary (parent chain, BOM imports).
///
/// All caches are populated lazily on first query and never invalidated: the
/// universe is treated as immutable for the lifetime of a resolution session.
/// The interior mutability is single-threaded `RefCell` state, matching the
/// engine's synchronous contract.
pub struct Project {
    pom_file: PathBuf,
    is_external: bool,
    pub(crate) model: PomModel,
    pub(crate) gav: Gav,
    parent_gav: Option<Gav>,
    pub(crate) properties: HashMap<String, String>,

    pub(crate) resolutions: RefCell<HashMap<String, ValueResolution>>,
    pub(crate) hierarchical_dm: RefCell<CacheByProfiles<HashMap<DependencyKey, DependencyManagement>>>,
    pub(crate) dm_in_progress: RefCell<HashSet<Vec<String>>>,
    pub(crate) local_dm: RefCell<CacheByProfiles<HashMap<DependencyKey, Dependency>>>,
    pub(crate) plugin_dm: RefCell<Option<HashMap<GroupArtifact, String>>>,
    pub(crate) interpolated_deps: RefCell<Option<Vec<Dependency>>>,
    pub(crate) plugin_deps: RefCell<CacheByProfiles<HashSet<PartialGav>>>,
    pub(crate) unresolved_properties: RefCell<HashSet<String>>,
}

/// Memoized values keyed by the identity of the active profile set.
pub(crate) type CacheByProfiles<T> = HashMap<Vec<String>, T>;

impl Project {
    /// Reads and initializes a project from a pom.xml file.
    pub fn load(pom_file: impl Into<PathBuf>, is_external: bool) -> Result<Self> {
        let pom_file = pom_file.into();
        let content = fs::read_to_string(&pom_file).map_err(|source| PomError::UnreadablePom {
            path: pom_file.clone(),
            source,
        })?;
        let model = reader::parse_pom(&content)?;
        Self::from_model(model, pom_file, is_external)
    }

    /// Initializes a project from an already-parsed model.
    ///
    /// The GAV is computed here: groupId and version fall back to the parent
    /// declaration when absent, and a literal `${parent.version}` version is
    /// replaced by the parent's declared version. Fails when the resulting
    /// GAV (or the parent GAV) is not fully resolved.
    pub fn from_model(
        model: PomModel,
        pom_file: impl Into<PathBuf>,
        is_external: bool,
    ) -> Result<Self> {
        let pom_file = pom_file.into();

        let parent_gav = match &model.parent {
            Some(parent) => {
                let raw = PartialGav::new(
                    parent.group_id.clone(),
                    parent.artifact_id.clone(),
                    parent.version.clone(),
                );
                let gav = raw.resolved().ok_or_else(|| PomError::UnresolvedParentGav {
                    gav: raw.to_string(),
                    path: pom_file.clone(),
                })?;
                Some(gav)
            }
            None => None,
        };

        let group_id = model
            .group_id
            .clone()
            .or_else(|| parent_gav.as_ref().map(|p| p.group_id.clone()))
            .ok_or_else(|| PomError::MissingGroupId {
                path: pom_file.clone(),
            })?;

        let mut version = model
            .version
            .clone()
            .or_else(|| parent_gav.as_ref().map(|p| p.version.clone()))
            .ok_or_else(|| PomError::MissingVersion {
                path: pom_file.clone(),
            })?;
        if version == "${parent.version}" {
            if let Some(parent) = &parent_gav {
                version = parent.version.clone();
            }
        }

        let artifact_id = model.artifact_id.clone().unwrap_or_default();

        let gav = Gav::new(group_id, artifact_id, version);
        if !gav.is_resolved() {
            return Err(PomError::UnresolvedGav {
                gav: gav.to_string(),
                path: pom_file,
            });
        }

        let properties = model.properties.clone();

        tracing::debug!("initialized project {} from {}", gav, pom_file.display());

        Ok(Self {
            pom_file,
            is_external,
            model,
            gav,
            parent_gav,
            properties,
            resolutions: RefCell::new(HashMap::new()),
            hierarchical_dm: RefCell::new(HashMap::new()),
            dm_in_progress: RefCell::new(HashSet::new()),
            local_dm: RefCell::new(HashMap::new()),
            plugin_dm: RefCell::new(None),
            interpolated_deps: RefCell::new(None),
            plugin_deps: RefCell::new(HashMap::new()),
            unresolved_properties: RefCell::new(HashSet::new()),
        })
    }

    pub fn pom_file(&self) -> &Path {
        &self.pom_file
    }

    pub fn is_external(&self) -> bool {
        self.is_external
    }

    /// Local, non-external projects with a `src/` directory next to the POM
    /// are candidates for build actions.
    pub fn is_buildable(&self) -> bool {
        !self.is_external
            && self
                .pom_file
                .parent()
                .is_some_and(|dir| dir.join("src").exists())
    }

    pub fn model(&self) -> &PomModel {
        &self.model
    }

    /// The fully resolved coordinate. Always resolved: initialization fails
    /// otherwise.
    pub fn gav(&self) -> &Gav {
        &self.gav
    }

    /// Coordinate components exactly as declared in the file.
    pub fn raw_gav(&self) -> PartialGav {
        PartialGav::new(
            self.model.group_id.clone(),
            self.model.artifact_id.clone(),
            self.model.version.clone(),
        )
    }

    pub fn parent_gav(&self) -> Option<&Gav> {
        self.parent_gav.as_ref()
    }

    pub fn raw_parent_gav(&self) -> Option<PartialGav> {
        self.model.parent.as_ref().map(|parent| {
            PartialGav::new(
                parent.group_id.clone(),
                parent.artifact_id.clone(),
                parent.version.clone(),
            )
        })
    }

    /// This project's own `<properties>`, no inheritance applied.
    pub fn raw_properties(&self) -> &HashMap<String, String> {
        &self.properties
    }

    /// Property names that failed to resolve in any query so far.
    pub fn unresolved_properties(&self) -> HashSet<String> {
        self.unresolved_properties.borrow().clone()
    }

    /// GAVs of every `<module>` of this project and of all its profiles
    /// (profile activation is not applied here).
    ///
    /// Each referenced POM is read transiently, only to learn the module's
    /// coordinate; the transient project is discarded.
    pub fn submodules(&self) -> Result<Vec<Gav>> {
        let parent_dir = self.pom_file.parent().unwrap_or(Path::new(""));

        let names = self
            .model
            .modules
            .iter()
            .chain(self.model.profiles.iter().flat_map(|p| p.modules.iter()));

        let mut gavs = Vec::new();
        for name in names {
            let pom_path = if name.ends_with(".pom") {
                parent_dir.join(name)
            } else {
                parent_dir.join(name).join("pom.xml")
            };
            let module = Project::load(pom_path, false)?;
            gavs.push(module.gav.clone());
        }
        Ok(gavs)
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.gav, self.pom_file.display())
    }
}

impl fmt::Debug for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Project")
            .field("gav", &self.gav)
            .field("pom_file", &self.pom_file)
            .field("is_external", &self.is_external)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Project {
    fn eq(&self, other: &Self) -> bool {
        self.pom_file == other.pom_file
    }
}

impl Eq for Project {}

impl Hash for Project {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pom_file.hash(state);
    }
}
