//! Controller for the `log` component type (spec §4.4: "to support
//! future single-stream types"). A log group component has no
//! provisioning of its own; it exists purely as an addressable name for
//! the log collector's stream expansion.

use async_trait::async_trait;
use exo_core::Result;

use crate::capability::{Controller, Lifecycle, Resource};

#[derive(Default)]
pub struct LogGroupController;

impl LogGroupController {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Lifecycle for LogGroupController {
    async fn dependencies(&self, _spec: &str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    async fn initialize(&mut self, _spec: &str) -> Result<()> {
        Ok(())
    }

    async fn refresh(&mut self, _spec: &str) -> Result<()> {
        Ok(())
    }

    async fn dispose(&mut self) -> Result<()> {
        Ok(())
    }
}

impl Resource for LogGroupController {
    fn init_resource(&mut self, _id: &str, _spec: &str, _state: &str) -> Result<()> {
        Ok(())
    }

    fn marshal_state(&self) -> String {
        String::new()
    }
}

impl Controller for LogGroupController {}

#[cfg(test)]
#[path = "log_group_tests.rs"]
mod tests;
