//! The process controller: spawns and signals OS processes via
//! `tokio::process`. How exactly a process is spawned is explicitly out
//! of scope for this crate's contract — this is the adapter's own choice
//! of provider, not a shape the engine depends on.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use exo_core::{ExoError, Result};
use serde::{Deserialize, Serialize};
use tokio::process::{Child, Command};
use tokio::sync::Mutex;

use crate::capability::{Controller, Lifecycle, Process, Resource};

/// Shared table of live child handles, keyed by component id. A
/// controller instance is reconstructed fresh for every dispatch (spec
/// §4.3), so the actual subprocess handle has to live somewhere that
/// survives across dispatches; this registry is that somewhere,
/// constructed once per daemon and handed to every `ProcessController`.
pub type ProcessRegistry = Arc<Mutex<HashMap<String, Child>>>;

pub fn new_registry() -> ProcessRegistry {
    Arc::new(Mutex::new(HashMap::new()))
}

#[derive(Debug, Default, Deserialize)]
struct ProcessSpec {
    command: String,
    #[serde(default)]
    args: Vec<String>,
    #[serde(default)]
    env: HashMap<String, String>,
    #[serde(default)]
    cwd: Option<String>,
    #[serde(default)]
    depends_on: Vec<String>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct ProcessState {
    running: bool,
    #[serde(default)]
    pid: Option<u32>,
}

pub struct ProcessController {
    id: String,
    registry: ProcessRegistry,
    spec: ProcessSpec,
    state: ProcessState,
}

impl ProcessController {
    pub fn new(registry: ProcessRegistry) -> Self {
        Self {
            id: String::new(),
            registry,
            spec: ProcessSpec::default(),
            state: ProcessState::default(),
        }
    }
}

#[async_trait]
impl Lifecycle for ProcessController {
    async fn dependencies(&self, spec: &str) -> Result<Vec<String>> {
        let spec: ProcessSpec = serde_json::from_str(spec)
            .map_err(|e| ExoError::Validation(format!("parsing process spec: {e}")))?;
        Ok(spec.depends_on)
    }

    async fn initialize(&mut self, spec: &str) -> Result<()> {
        self.spec = serde_json::from_str(spec)
            .map_err(|e| ExoError::Validation(format!("parsing process spec: {e}")))?;
        Ok(())
    }

    async fn refresh(&mut self, spec: &str) -> Result<()> {
        self.spec = serde_json::from_str(spec)
            .map_err(|e| ExoError::Validation(format!("parsing process spec: {e}")))?;
        Ok(())
    }

    async fn dispose(&mut self) -> Result<()> {
        if self.state.running {
            self.stop().await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Process for ProcessController {
    async fn start(&mut self) -> Result<()> {
        if self.state.running {
            return Ok(());
        }
        let mut command = Command::new(&self.spec.command);
        command.args(&self.spec.args).envs(&self.spec.env);
        if let Some(cwd) = &self.spec.cwd {
            command.current_dir(cwd);
        }
        let child = command
            .kill_on_drop(false)
            .spawn()
            .map_err(|e| ExoError::Provider(format!("spawning process: {e}")))?;
        self.state.pid = child.id();
        self.state.running = true;
        self.registry.lock().await.insert(self.id.clone(), child);
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        let mut registry = self.registry.lock().await;
        if let Some(mut child) = registry.remove(&self.id) {
            child
                .start_kill()
                .map_err(|e| ExoError::Provider(format!("killing process: {e}")))?;
        }
        self.state.running = false;
        self.state.pid = None;
        Ok(())
    }

    async fn restart(&mut self) -> Result<()> {
        self.stop().await?;
        self.start().await
    }
}

impl Resource for ProcessController {
    fn init_resource(&mut self, id: &str, spec: &str, state: &str) -> Result<()> {
        self.id = id.to_string();
        if !spec.is_empty() {
            self.spec = serde_json::from_str(spec)
                .map_err(|e| ExoError::Validation(format!("parsing process spec: {e}")))?;
        }
        if !state.is_empty() {
            self.state = serde_json::from_str(state)
                .map_err(|e| ExoError::Validation(format!("parsing process state: {e}")))?;
        }
        Ok(())
    }

    fn marshal_state(&self) -> String {
        serde_json::to_string(&self.state).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Controller for ProcessController {
    fn as_process_mut(&mut self) -> Option<&mut dyn Process> {
        Some(self)
    }
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
