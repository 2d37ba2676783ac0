//! Raw document model of a pom.xml file.
//!
//! Everything here is exactly as declared in the file: no variable expansion,
//! no inheritance, no defaults beyond the ones Maven's own model applies
//! (dependency type `jar`, plugin group `org.apache.maven.plugins`).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Group a plugin belongs to when it declares none.
pub const DEFAULT_PLUGIN_GROUP: &str = "org.apache.maven.plugins";

/// A parsed pom.xml, restricted to the elements resolution consumes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PomModel {
    pub parent: Option<PomParent>,
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub properties: HashMap<String, String>,
    pub dependencies: Vec<PomDependency>,
    pub dependency_management: Vec<PomDependency>,
    pub build_plugins: Vec<PomPlugin>,
    pub plugin_management: Vec<PomPlugin>,
    pub profiles: Vec<PomProfile>,
    pub modules: Vec<String>,
    pub prerequisites_maven: Option<String>,
}

/// The `<parent>` reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PomParent {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
}

/// One `<dependency>` element, wherever it appears.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PomDependency {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub scope: Option<String>,
    pub classifier: Option<String>,
    pub dep_type: Option<String>,
    pub optional: bool,
    pub exclusions: Vec<PomExclusion>,
}

/// One `<exclusion>` element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PomExclusion {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
}

/// One `<plugin>` element from `<build>` or `<pluginManagement>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PomPlugin {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
}

impl PomPlugin {
    /// Declared group, or Maven's default plugin group.
    pub fn group_id_or_default(&self) -> &str {
        self.group_id.as_deref().unwrap_or(DEFAULT_PLUGIN_GROUP)
    }
}

/// One `<profile>` element, restricted to what activation and resolution read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PomProfile {
    pub id: Option<String>,
    pub active_by_default: bool,
    pub dependencies: Vec<PomDependency>,
    pub dependency_management: Vec<PomDependency>,
    pub build_plugins: Vec<PomPlugin>,
    pub modules: Vec<String>,
}
