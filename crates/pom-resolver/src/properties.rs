//! Property lookup across a project and its ancestor chain.
//!
//! Lookup order: the project's own `<properties>`, then the built-in
//! `project.*` table, then the parent project (through the universe). A
//! lookup that crosses a parent boundary can no longer count as self-managed,
//! whatever the caller asked for.

use crate::interpolate::MAX_EXPANSION_DEPTH;
use crate::log::Log;
use crate::project::Project;
use crate::session::ProjectContainer;

/// Fixed value the `mavenVersion` built-in resolves to.
const MAVEN_VERSION: &str = "3.1.1";

/// Where a property lookup found its answer.
///
/// `self_managed` is true only when the definition lives in the querying
/// project itself and no parent boundary was crossed on the way here.
#[derive(Debug, Clone)]
pub struct PropertyLocation<'a> {
    pub project: &'a Project,
    pub name: String,
    pub value: String,
    pub self_managed: bool,
}

/// True for a string that is exactly one `${...}` reference.
pub(crate) fn is_property_reference(value: &str) -> bool {
    value.starts_with("${") && value.ends_with('}')
}

fn property_name_of(reference: &str) -> &str {
    &reference[2..reference.len() - 1]
}

impl Project {
    /// Resolves a property name for this project, recording and warning on a
    /// miss.
    pub(crate) fn resolve_property<'a>(
        &'a self,
        name: &str,
        projects: &'a dyn ProjectContainer,
        log: &dyn Log,
        depth: usize,
    ) -> Option<PropertyLocation<'a>> {
        let location = self.property_definition(name, projects, log, true, depth);
        if location.is_none() {
            log.warning(&format!(
                "cannot resolve property '{name}' in project {self}"
            ));
            self.unresolved_properties
                .borrow_mut()
                .insert(name.to_string());
        }
        location
    }

    fn property_definition<'a>(
        &'a self,
        name: &str,
        projects: &'a dyn ProjectContainer,
        log: &dyn Log,
        can_be_self_managed: bool,
        depth: usize,
    ) -> Option<PropertyLocation<'a>> {
        if depth > MAX_EXPANSION_DEPTH {
            return None;
        }

        let name = if is_property_reference(name) {
            property_name_of(name)
        } else {
            name
        };

        if let Some(value) = self.properties.get(name) {
            return Some(PropertyLocation {
                project: self,
                name: name.to_string(),
                value: value.clone(),
                self_managed: can_be_self_managed,
            });
        }

        if let Some(location) = self.builtin_property(name, log, can_be_self_managed) {
            return Some(location);
        }

        if let Some(parent_gav) = self.parent_gav() {
            match projects.for_gav(parent_gav) {
                Some(parent) => {
                    // project.parent.X on the child is project.X on the parent
                    let delegated = match name.strip_prefix("project.parent.") {
                        Some(rest) => format!("project.{rest}"),
                        None => name.to_string(),
                    };
                    return parent.property_definition(
                        &delegated, projects, log, false, depth + 1,
                    );
                }
                None => {
                    log.warning(&format!(
                        "cannot find parent project to resolve property '{name}' in project {self}"
                    ));
                }
            }
        }

        None
    }

    fn builtin_property<'a>(
        &'a self,
        name: &str,
        log: &dyn Log,
        can_be_self_managed: bool,
    ) -> Option<PropertyLocation<'a>> {
        let found = |canonical: &str, value: &str| {
            Some(PropertyLocation {
                project: self,
                name: canonical.to_string(),
                value: value.to_string(),
                self_managed: can_be_self_managed,
            })
        };

        match name {
            "version" | "project.version" | "pom.version" => {
                if name == "version" {
                    log.warning(&format!(
                        "illegal property 'version' used in the project {self}, value resolved to project's version."
                    ));
                }
                found("project.version", &self.gav.version)
            }
            "groupId" | "@project.groupId@" | "project.groupId" | "pom.groupId" => {
                if name == "groupId" || name == "@project.groupId@" {
                    log.warning(&format!(
                        "illegal property '{name}' used in the project {self}, value resolved to project's groupId."
                    ));
                }
                found("project.groupId", &self.gav.group_id)
            }
            "artifactId" | "project.artifactId" | "pom.artifactId" => {
                if name == "artifactId" {
                    log.warning(&format!(
                        "illegal property 'artifactId' used in the project {self}, value resolved to project's artifactId."
                    ));
                }
                found("project.artifactId", &self.gav.artifact_id)
            }
            "project.prerequisites.maven" => match &self.model.prerequisites_maven {
                Some(value) => found("project.prerequisites.maven", value),
                None => None,
            },
            "mavenVersion" => found("mavenVersion", MAVEN_VERSION),
            // known quirk: resolves to its own name, not to a JVM version
            "java.version" => found("java.version", "java.version"),
            _ => None,
        }
    }
}
