//! pom.xml reader.
//!
//! Uses a quick-xml streaming reader to build a [`PomModel`]. Matching is on
//! local names, so namespaced documents parse the same as plain ones.
//! Elements the resolution engine never consults (packaging, repositories,
//! plugin configuration, ...) are skipped wholesale.

use crate::error::{PomError, Result};
use pom_model::{PomDependency, PomExclusion, PomModel, PomParent, PomPlugin, PomProfile};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;

type XmlReader<'a> = Reader<&'a [u8]>;

/// Parses pom.xml content into the raw document model.
pub fn parse_pom(content: &str) -> Result<PomModel> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    loop {
        match read_event(&mut reader)? {
            Event::Start(e) => {
                if e.local_name().as_ref() == b"project" {
                    return read_project(&mut reader);
                }
                return Err(PomError::ParseError {
                    message: format!(
                        "unexpected root element <{}>",
                        String::from_utf8_lossy(e.local_name().as_ref())
                    ),
                });
            }
            Event::Eof => {
                return Err(PomError::ParseError {
                    message: "no <project> element found".into(),
                });
            }
            _ => {}
        }
    }
}

fn read_event<'a>(reader: &mut XmlReader<'a>) -> Result<Event<'a>> {
    reader.read_event().map_err(|e| PomError::ParseError {
        message: e.to_string(),
    })
}

fn skip(reader: &mut XmlReader<'_>, start: &BytesStart<'_>) -> Result<()> {
    reader
        .read_to_end(start.name())
        .map_err(|e| PomError::ParseError {
            message: e.to_string(),
        })?;
    Ok(())
}

fn unexpected_eof() -> PomError {
    PomError::ParseError {
        message: "unexpected end of document".into(),
    }
}

/// Reads the text content of the element whose start tag was just consumed.
fn read_text(reader: &mut XmlReader<'_>) -> Result<String> {
    let mut value = String::new();
    let mut depth = 0usize;
    loop {
        match read_event(reader)? {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            Event::Text(e) => {
                let text = match reader.decoder().decode(e.as_ref()) {
                    Ok(cow) => {
                        let s = cow.trim().to_string();
                        quick_xml::escape::unescape(&s)
                            .map(|c| c.into_owned())
                            .unwrap_or(s)
                    }
                    Err(_) => String::from_utf8_lossy(e.as_ref()).trim().to_string(),
                };
                value.push_str(&text);
            }
            Event::CData(e) => {
                value.push_str(String::from_utf8_lossy(e.as_ref()).trim());
            }
            Event::Eof => return Err(unexpected_eof()),
            _ => {}
        }
    }
    Ok(value)
}

fn read_project(reader: &mut XmlReader<'_>) -> Result<PomModel> {
    let mut pom = PomModel::default();
    loop {
        match read_event(reader)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"parent" => pom.parent = Some(read_parent(reader)?),
                b"groupId" => pom.group_id = Some(read_text(reader)?),
                b"artifactId" => pom.artifact_id = Some(read_text(reader)?),
                b"version" => pom.version = Some(read_text(reader)?),
                b"properties" => read_properties(reader, &mut pom.properties)?,
                b"dependencies" => pom.dependencies = read_dependency_list(reader)?,
                b"dependencyManagement" => {
                    pom.dependency_management = read_dependency_management(reader)?;
                }
                b"build" => {
                    read_build(reader, &mut pom.build_plugins, &mut pom.plugin_management)?;
                }
                b"profiles" => pom.profiles = read_profiles(reader)?,
                b"modules" => pom.modules = read_modules(reader)?,
                b"prerequisites" => read_prerequisites(reader, &mut pom)?,
                _ => skip(reader, &e)?,
            },
            Event::End(_) => return Ok(pom),
            Event::Eof => return Err(unexpected_eof()),
            _ => {}
        }
    }
}

fn read_parent(reader: &mut XmlReader<'_>) -> Result<PomParent> {
    let mut parent = PomParent::default();
    loop {
        match read_event(reader)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"groupId" => parent.group_id = Some(read_text(reader)?),
                b"artifactId" => parent.artifact_id = Some(read_text(reader)?),
                b"version" => parent.version = Some(read_text(reader)?),
                _ => skip(reader, &e)?,
            },
            Event::End(_) => return Ok(parent),
            Event::Eof => return Err(unexpected_eof()),
            _ => {}
        }
    }
}

fn read_properties(
    reader: &mut XmlReader<'_>,
    properties: &mut HashMap<String, String>,
) -> Result<()> {
    loop {
        match read_event(reader)? {
            Event::Start(e) => {
                let key = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                let value = read_text(reader)?;
                properties.insert(key, value);
            }
            Event::Empty(e) => {
                let key = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                properties.insert(key, String::new());
            }
            Event::End(_) => return Ok(()),
            Event::Eof => return Err(unexpected_eof()),
            _ => {}
        }
    }
}

fn read_dependency_list(reader: &mut XmlReader<'_>) -> Result<Vec<PomDependency>> {
    let mut dependencies = Vec::new();
    loop {
        match read_event(reader)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"dependency" => dependencies.push(read_dependency(reader)?),
                _ => skip(reader, &e)?,
            },
            Event::End(_) => return Ok(dependencies),
            Event::Eof => return Err(unexpected_eof()),
            _ => {}
        }
    }
}

fn read_dependency_management(reader: &mut XmlReader<'_>) -> Result<Vec<PomDependency>> {
    let mut dependencies = Vec::new();
    loop {
        match read_event(reader)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"dependencies" => dependencies.extend(read_dependency_list(reader)?),
                _ => skip(reader, &e)?,
            },
            Event::End(_) => return Ok(dependencies),
            Event::Eof => return Err(unexpected_eof()),
            _ => {}
        }
    }
}

fn read_dependency(reader: &mut XmlReader<'_>) -> Result<PomDependency> {
    let mut dependency = PomDependency::default();
    loop {
        match read_event(reader)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"groupId" => dependency.group_id = Some(read_text(reader)?),
                b"artifactId" => dependency.artifact_id = Some(read_text(reader)?),
                b"version" => dependency.version = Some(read_text(reader)?),
                b"scope" => dependency.scope = Some(read_text(reader)?),
                b"classifier" => dependency.classifier = Some(read_text(reader)?),
                b"type" => dependency.dep_type = Some(read_text(reader)?),
                b"optional" => {
                    dependency.optional = read_text(reader)?.eq_ignore_ascii_case("true");
                }
                b"exclusions" => dependency.exclusions = read_exclusions(reader)?,
                _ => skip(reader, &e)?,
            },
            Event::End(_) => return Ok(dependency),
            Event::Eof => return Err(unexpected_eof()),
            _ => {}
        }
    }
}

fn read_exclusions(reader: &mut XmlReader<'_>) -> Result<Vec<PomExclusion>> {
    let mut exclusions = Vec::new();
    loop {
        match read_event(reader)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"exclusion" => exclusions.push(read_exclusion(reader)?),
                _ => skip(reader, &e)?,
            },
            Event::End(_) => return Ok(exclusions),
            Event::Eof => return Err(unexpected_eof()),
            _ => {}
        }
    }
}

fn read_exclusion(reader: &mut XmlReader<'_>) -> Result<PomExclusion> {
    let mut exclusion = PomExclusion::default();
    loop {
        match read_event(reader)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"groupId" => exclusion.group_id = Some(read_text(reader)?),
                b"artifactId" => exclusion.artifact_id = Some(read_text(reader)?),
                _ => skip(reader, &e)?,
            },
            Event::End(_) => return Ok(exclusion),
            Event::Eof => return Err(unexpected_eof()),
            _ => {}
        }
    }
}

fn read_build(
    reader: &mut XmlReader<'_>,
    plugins: &mut Vec<PomPlugin>,
    plugin_management: &mut Vec<PomPlugin>,
) -> Result<()> {
    loop {
        match read_event(reader)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"plugins" => plugins.extend(read_plugin_list(reader)?),
                b"pluginManagement" => {
                    read_plugin_management(reader, plugin_management)?;
                }
                _ => skip(reader, &e)?,
            },
            Event::End(_) => return Ok(()),
            Event::Eof => return Err(unexpected_eof()),
            _ => {}
        }
    }
}

fn read_plugin_management(
    reader: &mut XmlReader<'_>,
    plugin_management: &mut Vec<PomPlugin>,
) -> Result<()> {
    loop {
        match read_event(reader)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"plugins" => plugin_management.extend(read_plugin_list(reader)?),
                _ => skip(reader, &e)?,
            },
            Event::End(_) => return Ok(()),
            Event::Eof => return Err(unexpected_eof()),
            _ => {}
        }
    }
}

fn read_plugin_list(reader: &mut XmlReader<'_>) -> Result<Vec<PomPlugin>> {
    let mut plugins = Vec::new();
    loop {
        match read_event(reader)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"plugin" => plugins.push(read_plugin(reader)?),
                _ => skip(reader, &e)?,
            },
            Event::End(_) => return Ok(plugins),
            Event::Eof => return Err(unexpected_eof()),
            _ => {}
        }
    }
}

fn read_plugin(reader: &mut XmlReader<'_>) -> Result<PomPlugin> {
    let mut plugin = PomPlugin::default();
    loop {
        match read_event(reader)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"groupId" => plugin.group_id = Some(read_text(reader)?),
                b"artifactId" => plugin.artifact_id = Some(read_text(reader)?),
                b"version" => plugin.version = Some(read_text(reader)?),
                _ => skip(reader, &e)?,
            },
            Event::End(_) => return Ok(plugin),
            Event::Eof => return Err(unexpected_eof()),
            _ => {}
        }
    }
}

fn read_profiles(reader: &mut XmlReader<'_>) -> Result<Vec<PomProfile>> {
    let mut profiles = Vec::new();
    loop {
        match read_event(reader)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"profile" => profiles.push(read_profile(reader)?),
                _ => skip(reader, &e)?,
            },
            Event::End(_) => return Ok(profiles),
            Event::Eof => return Err(unexpected_eof()),
            _ => {}
        }
    }
}

fn read_profile(reader: &mut XmlReader<'_>) -> Result<PomProfile> {
    let mut profile = PomProfile::default();
    loop {
        match read_event(reader)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"id" => profile.id = Some(read_text(reader)?),
                b"activation" => profile.active_by_default = read_activation(reader)?,
                b"dependencies" => profile.dependencies = read_dependency_list(reader)?,
                b"dependencyManagement" => {
                    profile.dependency_management = read_dependency_management(reader)?;
                }
                b"build" => {
                    // pluginManagement inside a profile is not consulted by resolution
                    let mut ignored_plugin_management = Vec::new();
                    read_build(reader, &mut profile.build_plugins, &mut ignored_plugin_management)?;
                }
                b"modules" => profile.modules = read_modules(reader)?,
                _ => skip(reader, &e)?,
            },
            Event::End(_) => return Ok(profile),
            Event::Eof => return Err(unexpected_eof()),
            _ => {}
        }
    }
}

fn read_activation(reader: &mut XmlReader<'_>) -> Result<bool> {
    let mut active_by_default = false;
    loop {
        match read_event(reader)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"activeByDefault" => {
                    active_by_default = read_text(reader)?.eq_ignore_ascii_case("true");
                }
                // OS, JDK and file activations are not evaluated
                _ => skip(reader, &e)?,
            },
            Event::End(_) => return Ok(active_by_default),
            Event::Eof => return Err(unexpected_eof()),
            _ => {}
        }
    }
}

fn read_prerequisites(reader: &mut XmlReader<'_>, pom: &mut PomModel) -> Result<()> {
    loop {
        match read_event(reader)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"maven" => pom.prerequisites_maven = Some(read_text(reader)?),
                _ => skip(reader, &e)?,
            },
            Event::End(_) => return Ok(()),
            Event::Eof => return Err(unexpected_eof()),
            _ => {}
        }
    }
}

fn read_modules(reader: &mut XmlReader<'_>) -> Result<Vec<String>> {
    let mut modules = Vec::new();
    loop {
        match read_event(reader)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"module" => modules.push(read_text(reader)?),
                _ => skip(reader, &e)?,
            },
            Event::End(_) => return Ok(modules),
            Event::Eof => return Err(unexpected_eof()),
            _ => {}
        }
    }
}
