//! Network controller stand-in (spec §1: provider adapter detail is out
//! of scope). Networks aren't process-like, so only `Lifecycle` applies.

use async_trait::async_trait;
use exo_core::{ExoError, Result};
use serde::{Deserialize, Serialize};

use crate::capability::{Controller, Lifecycle, Resource};

#[derive(Debug, Default, Deserialize)]
struct NetworkSpec {
    #[serde(default)]
    depends_on: Vec<String>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct NetworkState {
    provisioned: bool,
}

#[derive(Default)]
pub struct NetworkController {
    spec: NetworkSpec,
    state: NetworkState,
}

impl NetworkController {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Lifecycle for NetworkController {
    async fn dependencies(&self, spec: &str) -> Result<Vec<String>> {
        let spec: NetworkSpec = serde_json::from_str(spec)
            .map_err(|e| ExoError::Validation(format!("parsing network spec: {e}")))?;
        Ok(spec.depends_on)
    }

    async fn initialize(&mut self, spec: &str) -> Result<()> {
        self.spec = serde_json::from_str(spec)
            .map_err(|e| ExoError::Validation(format!("parsing network spec: {e}")))?;
        self.state.provisioned = true;
        Ok(())
    }

    async fn refresh(&mut self, spec: &str) -> Result<()> {
        self.spec = serde_json::from_str(spec)
            .map_err(|e| ExoError::Validation(format!("parsing network spec: {e}")))?;
        Ok(())
    }

    async fn dispose(&mut self) -> Result<()> {
        self.state.provisioned = false;
        Ok(())
    }
}

impl Resource for NetworkController {
    fn init_resource(&mut self, _id: &str, spec: &str, state: &str) -> Result<()> {
        if !spec.is_empty() {
            self.spec = serde_json::from_str(spec)
                .map_err(|e| ExoError::Validation(format!("parsing network spec: {e}")))?;
        }
        if !state.is_empty() {
            self.state = serde_json::from_str(state)
                .map_err(|e| ExoError::Validation(format!("parsing network state: {e}")))?;
        }
        Ok(())
    }

    fn marshal_state(&self) -> String {
        serde_json::to_string(&self.state).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Controller for NetworkController {}

#[cfg(test)]
#[path = "network_tests.rs"]
mod tests;
