//! Value types and raw document model for Maven POM resolution.
//!
//! This crate defines the coordinate types (GAV, group/artifact pairs,
//! dependency keys), scopes, version/scope pairs with provenance, and the raw
//! document model a pom.xml parser produces. The resolution engine itself
//! lives in the `pom-resolver` crate.

pub mod dependency;
pub mod gav;
pub mod key;
pub mod pom;
pub mod scope;

pub use dependency::{Dependency, DependencyManagement, VersionScope};
pub use gav::{Gav, GroupArtifact, PartialGav, UNRESOLVED_MARKER};
pub use key::DependencyKey;
pub use pom::{PomDependency, PomExclusion, PomModel, PomParent, PomPlugin, PomProfile};
pub use scope::Scope;
