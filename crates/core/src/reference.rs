//! User-facing component references (spec §3: "Ref").

use serde::{Deserialize, Serialize};

/// A user-facing identifier for a component: either its id or its name
/// within the current workspace. Resolution happens in the store
/// (`exo_store::Store::resolve`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ref(pub String);

impl Ref {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Ref {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Ref {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Ref {
    fn from(s: String) -> Self {
        Self(s)
    }
}
