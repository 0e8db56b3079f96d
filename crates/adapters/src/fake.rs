//! A configurable fake controller for other crates' dispatch tests
//! (spec §4.3's bracketed-dispatch invariant is easiest to exercise
//! against a controller whose failures are dialed in by the test).

use async_trait::async_trait;
use exo_core::{ExoError, Result};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::capability::{Controller, Lifecycle, Process, Resource};

/// A controller whose every operation can be made to fail on demand,
/// and which always marshals a fixed marker state so bracketed-dispatch
/// tests can assert state was saved regardless of the operation outcome.
#[derive(Default)]
pub struct FakeController {
    pub fail_initialize: AtomicBool,
    pub fail_refresh: AtomicBool,
    pub fail_dispose: AtomicBool,
    pub fail_start: AtomicBool,
    pub fail_stop: AtomicBool,
    pub marshal_calls: AtomicBool,
    state: String,
}

impl FakeController {
    pub fn new() -> Self {
        Self {
            state: "fake-initial".to_string(),
            ..Self::default()
        }
    }

    fn fail(flag: &AtomicBool, message: &str) -> Result<()> {
        if flag.load(Ordering::SeqCst) {
            Err(ExoError::Provider(message.to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Lifecycle for FakeController {
    async fn dependencies(&self, _spec: &str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    async fn initialize(&mut self, _spec: &str) -> Result<()> {
        Self::fail(&self.fail_initialize, "fake initialize failed")
    }

    async fn refresh(&mut self, _spec: &str) -> Result<()> {
        Self::fail(&self.fail_refresh, "fake refresh failed")
    }

    async fn dispose(&mut self) -> Result<()> {
        Self::fail(&self.fail_dispose, "fake dispose failed")
    }
}

#[async_trait]
impl Process for FakeController {
    async fn start(&mut self) -> Result<()> {
        Self::fail(&self.fail_start, "fake start failed")
    }

    async fn stop(&mut self) -> Result<()> {
        Self::fail(&self.fail_stop, "fake stop failed")
    }

    async fn restart(&mut self) -> Result<()> {
        Ok(())
    }
}

impl Resource for FakeController {
    fn init_resource(&mut self, _id: &str, _spec: &str, state: &str) -> Result<()> {
        if !state.is_empty() {
            self.state = state.to_string();
        }
        Ok(())
    }

    fn marshal_state(&self) -> String {
        self.marshal_calls.store(true, Ordering::SeqCst);
        format!("{}-marshaled", self.state)
    }
}

impl Controller for FakeController {
    fn as_process_mut(&mut self) -> Option<&mut dyn Process> {
        Some(self)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
