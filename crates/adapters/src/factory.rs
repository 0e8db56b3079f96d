//! Controller factory (spec §4.3, step 1 of the bracketed dispatch:
//! "construct a fresh controller for `desc.type`").

use std::str::FromStr;

use exo_core::ComponentType;

use crate::capability::Controller;
use crate::container::ContainerController;
use crate::invalid::InvalidController;
use crate::log_group::LogGroupController;
use crate::network::NetworkController;
use crate::process::{ProcessController, ProcessRegistry};
use crate::volume::VolumeController;

/// Build a fresh controller for a raw component type string, falling
/// back to [`InvalidController`] when it isn't recognized.
pub fn build_controller(type_name: &str, process_registry: &ProcessRegistry) -> Box<dyn Controller> {
    match ComponentType::from_str(type_name) {
        Ok(ComponentType::Process) => Box::new(ProcessController::new(process_registry.clone())),
        Ok(ComponentType::Container) => Box::new(ContainerController::new()),
        Ok(ComponentType::Network) => Box::new(NetworkController::new()),
        Ok(ComponentType::Volume) => Box::new(VolumeController::new()),
        Ok(ComponentType::Log) => Box::new(LogGroupController::new()),
        Err(_) => Box::new(InvalidController::new(type_name)),
    }
}

#[cfg(test)]
#[path = "factory_tests.rs"]
mod tests;
