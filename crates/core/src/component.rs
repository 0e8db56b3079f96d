//! Component domain record and name validation (spec §3).

use crate::{ComponentId, WorkspaceId};
use serde::{Deserialize, Serialize};

/// Tag identifying which controller drives a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    Process,
    Container,
    Network,
    Volume,
    Log,
}

impl ComponentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::Process => "process",
            ComponentType::Container => "container",
            ComponentType::Network => "network",
            ComponentType::Volume => "volume",
            ComponentType::Log => "log",
        }
    }

    /// Types whose components are controllable at runtime (implement the
    /// Process capability) and therefore contribute log streams.
    pub fn is_process_like(&self) -> bool {
        matches!(self, ComponentType::Process | ComponentType::Container)
    }
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ComponentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "process" => Ok(ComponentType::Process),
            "container" => Ok(ComponentType::Container),
            "network" => Ok(ComponentType::Network),
            "volume" => Ok(ComponentType::Volume),
            "log" => Ok(ComponentType::Log),
            other => Err(format!("unsupported component type: {other:?}")),
        }
    }
}

/// The persistent component record (spec §3).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComponentRecord {
    pub id: ComponentId,
    pub workspace_id: WorkspaceId,
    pub name: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub spec: String,
    pub state: String,
    pub created: String,
    pub initialized: Option<String>,
    pub disposed: Option<String>,
}

/// A synthetic description used by a caller that constructs a component
/// record without re-reading it from the store (e.g. right after an add),
/// matching the original implementation's `createComponent` shortcut.
impl ComponentRecord {
    pub fn is_disposed(&self) -> bool {
        self.disposed.is_some()
    }
}

/// Validate a component name against `^[a-z][a-z0-9-]*$`.
pub fn validate_name(name: &str) -> Result<(), String> {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return Err(format!("name {name:?} must start with a lowercase letter")),
    }
    if chars.any(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')) {
        return Err(format!(
            "name {name:?} must match ^[a-z][a-z0-9-]*$"
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "component_tests.rs"]
mod tests;
