//! Fallback controller for unrecognized component types (spec §4.3: "unknown
//! types yield the `Invalid` controller whose every operation fails with a
//! descriptive error").

use async_trait::async_trait;
use exo_core::{ExoError, Result};

use crate::capability::{Controller, Lifecycle, Resource};

pub struct InvalidController {
    type_name: String,
}

impl InvalidController {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
        }
    }

    fn err(&self) -> ExoError {
        ExoError::Validation(format!("unknown component type: {:?}", self.type_name))
    }
}

#[async_trait]
impl Lifecycle for InvalidController {
    async fn dependencies(&self, _spec: &str) -> Result<Vec<String>> {
        Err(self.err())
    }

    async fn initialize(&mut self, _spec: &str) -> Result<()> {
        Err(self.err())
    }

    async fn refresh(&mut self, _spec: &str) -> Result<()> {
        Err(self.err())
    }

    async fn dispose(&mut self) -> Result<()> {
        Err(self.err())
    }
}

impl Resource for InvalidController {
    fn init_resource(&mut self, _id: &str, _spec: &str, _state: &str) -> Result<()> {
        Ok(())
    }

    fn marshal_state(&self) -> String {
        String::new()
    }
}

impl Controller for InvalidController {}

#[cfg(test)]
#[path = "invalid_tests.rs"]
mod tests;
