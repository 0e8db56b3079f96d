//! Volume controller stand-in (spec §1: provider adapter detail is out
//! of scope). Volumes aren't process-like, so only `Lifecycle` applies.

use async_trait::async_trait;
use exo_core::{ExoError, Result};
use serde::{Deserialize, Serialize};

use crate::capability::{Controller, Lifecycle, Resource};

#[derive(Debug, Default, Deserialize)]
struct VolumeSpec {
    #[serde(default)]
    depends_on: Vec<String>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct VolumeState {
    provisioned: bool,
}

#[derive(Default)]
pub struct VolumeController {
    spec: VolumeSpec,
    state: VolumeState,
}

impl VolumeController {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Lifecycle for VolumeController {
    async fn dependencies(&self, spec: &str) -> Result<Vec<String>> {
        let spec: VolumeSpec = serde_json::from_str(spec)
            .map_err(|e| ExoError::Validation(format!("parsing volume spec: {e}")))?;
        Ok(spec.depends_on)
    }

    async fn initialize(&mut self, spec: &str) -> Result<()> {
        self.spec = serde_json::from_str(spec)
            .map_err(|e| ExoError::Validation(format!("parsing volume spec: {e}")))?;
        self.state.provisioned = true;
        Ok(())
    }

    async fn refresh(&mut self, spec: &str) -> Result<()> {
        self.spec = serde_json::from_str(spec)
            .map_err(|e| ExoError::Validation(format!("parsing volume spec: {e}")))?;
        Ok(())
    }

    async fn dispose(&mut self) -> Result<()> {
        self.state.provisioned = false;
        Ok(())
    }
}

impl Resource for VolumeController {
    fn init_resource(&mut self, _id: &str, spec: &str, state: &str) -> Result<()> {
        if !spec.is_empty() {
            self.spec = serde_json::from_str(spec)
                .map_err(|e| ExoError::Validation(format!("parsing volume spec: {e}")))?;
        }
        if !state.is_empty() {
            self.state = serde_json::from_str(state)
                .map_err(|e| ExoError::Validation(format!("parsing volume state: {e}")))?;
        }
        Ok(())
    }

    fn marshal_state(&self) -> String {
        serde_json::to_string(&self.state).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Controller for VolumeController {}

#[cfg(test)]
#[path = "volume_tests.rs"]
mod tests;
