//! Format-neutral manifest shape: a named set of desired components, each
//! with a type tag and an opaque spec the corresponding controller will
//! later deserialize.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One of the three surface syntaxes `apply` accepts (spec.md §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Exo,
    Compose,
    Procfile,
}

impl Format {
    /// Infer a format from a manifest path's suffix, per spec.md §4.6 step 1.
    pub fn from_path_suffix(path: &str) -> Option<Self> {
        let lower = path.to_ascii_lowercase();
        if lower.ends_with(".hcl") || lower.ends_with(".exo") {
            Some(Format::Exo)
        } else if lower.ends_with(".yaml") || lower.ends_with(".yml") {
            Some(Format::Compose)
        } else if lower.ends_with("procfile") {
            Some(Format::Procfile)
        } else {
            None
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Format::Exo => "exo",
            Format::Compose => "compose",
            Format::Procfile => "procfile",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "exo" => Some(Format::Exo),
            "compose" => Some(Format::Compose),
            "procfile" => Some(Format::Procfile),
            _ => None,
        }
    }
}

/// A desired component, keyed by name in the owning [`Manifest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentSpec {
    /// Component type tag (`process`, `container`, `network`, `volume`).
    #[serde(rename = "type")]
    pub type_: String,
    /// Opaque, type-specific declarative spec, already serialized to the
    /// JSON string a controller's `InitResource` will parse.
    pub spec: String,
}

/// The parsed result of any of the three accepted formats: a name-keyed set
/// of desired components plus any non-fatal warnings collected during the
/// parse (spec.md §4.6 step 5). Order of insertion is preserved so that
/// callers which care about declaration order (e.g. diagnostics) see it.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    pub components: IndexMap<String, ComponentSpec>,
    pub warnings: Vec<String>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Insert a component, recording a warning instead of clobbering an
    /// earlier declaration of the same name.
    pub fn insert(&mut self, name: String, type_: impl Into<String>, spec: impl Into<String>) {
        if self.components.contains_key(&name) {
            self.push_warning(format!("duplicate component name {name:?}, keeping first"));
            return;
        }
        self.components.insert(
            name,
            ComponentSpec {
                type_: type_.into(),
                spec: spec.into(),
            },
        );
    }

    /// A stable, name-ordered view for deterministic reconciliation.
    pub fn sorted(&self) -> BTreeMap<&str, &ComponentSpec> {
        self.components
            .iter()
            .map(|(name, spec)| (name.as_str(), spec))
            .collect()
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
