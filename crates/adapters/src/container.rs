//! Container controller stand-in. Talking to a real container daemon is
//! explicitly out of scope (spec §1); this tracks a simulated running
//! flag so the engine's reconciliation and Process-capability plumbing
//! has something real to drive end to end.

use async_trait::async_trait;
use exo_core::{ExoError, Result};
use serde::{Deserialize, Serialize};

use crate::capability::{Controller, Lifecycle, Process, Resource};

#[derive(Debug, Default, Deserialize)]
struct ContainerSpec {
    #[serde(default)]
    image: String,
    #[serde(default)]
    depends_on: Vec<String>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct ContainerState {
    running: bool,
}

#[derive(Default)]
pub struct ContainerController {
    spec: ContainerSpec,
    state: ContainerState,
}

impl ContainerController {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Lifecycle for ContainerController {
    async fn dependencies(&self, spec: &str) -> Result<Vec<String>> {
        let spec: ContainerSpec = serde_json::from_str(spec)
            .map_err(|e| ExoError::Validation(format!("parsing container spec: {e}")))?;
        Ok(spec.depends_on)
    }

    async fn initialize(&mut self, spec: &str) -> Result<()> {
        self.spec = serde_json::from_str(spec)
            .map_err(|e| ExoError::Validation(format!("parsing container spec: {e}")))?;
        Ok(())
    }

    async fn refresh(&mut self, spec: &str) -> Result<()> {
        self.spec = serde_json::from_str(spec)
            .map_err(|e| ExoError::Validation(format!("parsing container spec: {e}")))?;
        Ok(())
    }

    async fn dispose(&mut self) -> Result<()> {
        self.state.running = false;
        Ok(())
    }
}

#[async_trait]
impl Process for ContainerController {
    async fn start(&mut self) -> Result<()> {
        self.state.running = true;
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        self.state.running = false;
        Ok(())
    }

    async fn restart(&mut self) -> Result<()> {
        self.state.running = true;
        Ok(())
    }
}

impl Resource for ContainerController {
    fn init_resource(&mut self, _id: &str, spec: &str, state: &str) -> Result<()> {
        if !spec.is_empty() {
            self.spec = serde_json::from_str(spec)
                .map_err(|e| ExoError::Validation(format!("parsing container spec: {e}")))?;
        }
        if !state.is_empty() {
            self.state = serde_json::from_str(state)
                .map_err(|e| ExoError::Validation(format!("parsing container state: {e}")))?;
        }
        Ok(())
    }

    fn marshal_state(&self) -> String {
        serde_json::to_string(&self.state).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Controller for ContainerController {
    fn as_process_mut(&mut self) -> Option<&mut dyn Process> {
        Some(self)
    }
}

#[cfg(test)]
#[path = "container_tests.rs"]
mod tests;
