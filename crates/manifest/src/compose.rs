//! Docker Compose (YAML) format, the subset needed to describe a set of
//! long-running services: `image`, `command`, `environment`, `ports`, and
//! `depends_on`. Every service becomes a `container` component; the wider
//! Compose surface (build contexts, secrets, healthchecks, volumes as
//! top-level resources, …) is out of scope the same way the original
//! importer left most of it commented out as future work.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::ManifestError;
use crate::types::Manifest;

#[derive(Debug, Deserialize)]
struct ComposeFile {
    #[serde(default)]
    services: IndexMap<String, ComposeService>,
}

#[derive(Debug, Default, Deserialize)]
struct ComposeService {
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    command: Option<StringOrList>,
    #[serde(default)]
    environment: Option<Environment>,
    #[serde(default)]
    ports: Vec<String>,
    #[serde(default)]
    depends_on: Option<DependsOn>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StringOrList {
    String(String),
    List(Vec<String>),
}

impl StringOrList {
    fn into_vec(self) -> Vec<String> {
        match self {
            StringOrList::String(s) => vec![s],
            StringOrList::List(v) => v,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Environment {
    Map(BTreeMap<String, Option<String>>),
    List(Vec<String>),
}

impl Environment {
    fn into_map(self) -> BTreeMap<String, String> {
        match self {
            Environment::Map(m) => m
                .into_iter()
                .map(|(k, v)| (k, v.unwrap_or_default()))
                .collect(),
            Environment::List(entries) => entries
                .into_iter()
                .filter_map(|entry| {
                    entry
                        .split_once('=')
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DependsOn {
    List(Vec<String>),
    Map(BTreeMap<String, serde_yaml::Value>),
}

impl DependsOn {
    fn into_vec(self) -> Vec<String> {
        match self {
            DependsOn::List(v) => v,
            DependsOn::Map(m) => m.into_keys().collect(),
        }
    }
}

/// A short-syntax port mapping: `[host_ip:][published:]target[/protocol]`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PortMapping {
    pub target: String,
    pub published: Option<String>,
    pub protocol: Option<String>,
}

pub fn parse_port_mapping(short: &str) -> Result<PortMapping, ManifestError> {
    let (rest, protocol) = match short.rsplit_once('/') {
        Some((rest, proto)) => (rest, Some(proto.to_string())),
        None => (short, None),
    };
    let segments: Vec<&str> = rest.split(':').collect();
    let (published, target) = match segments.len() {
        1 => (None, segments[0].to_string()),
        2 => (Some(segments[0].to_string()), segments[1].to_string()),
        3 => (Some(segments[1].to_string()), segments[2].to_string()),
        _ => return Err(ManifestError::PortMapping(short.to_string())),
    };
    Ok(PortMapping {
        target,
        published,
        protocol,
    })
}

/// Parse a Compose YAML document into the format-neutral manifest shape.
pub fn parse(source: &str) -> Result<Manifest, ManifestError> {
    let file: ComposeFile = serde_yaml::from_str(source)?;
    let mut manifest = Manifest::new();
    for (name, service) in file.services {
        let ports: Vec<PortMapping> = service
            .ports
            .iter()
            .filter_map(|short| match parse_port_mapping(short) {
                Ok(mapping) => Some(mapping),
                Err(_) => {
                    manifest.push_warning(format!(
                        "service {name:?}: invalid port mapping {short:?}, skipping"
                    ));
                    None
                }
            })
            .collect();
        let spec = serde_json::json!({
            "image": service.image.unwrap_or_default(),
            "command": service.command.map(StringOrList::into_vec).unwrap_or_default(),
            "env": service.environment.map(Environment::into_map).unwrap_or_default(),
            "ports": ports,
            "depends_on": service.depends_on.map(DependsOn::into_vec).unwrap_or_default(),
        })
        .to_string();
        manifest.insert(name, "container", spec);
    }
    Ok(manifest)
}

#[cfg(test)]
#[path = "compose_tests.rs"]
mod tests;
