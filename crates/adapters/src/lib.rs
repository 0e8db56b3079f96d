// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! exo-controllers: the per-component-type controller abstraction (spec
//! §4.3) — `Lifecycle`, the optional `Process` capability, the resource
//! protocol, and the concrete controllers the engine's bracketed
//! dispatcher drives.

pub mod capability;
pub mod container;
#[cfg(any(test, feature = "test-support"))]
pub mod fake;
pub mod factory;
pub mod invalid;
pub mod log_group;
pub mod metrics;
pub mod network;
pub mod process;
pub mod volume;

pub use capability::{Controller, Lifecycle, Process, Resource};
pub use container::ContainerController;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeController;
pub use factory::build_controller;
pub use invalid::InvalidController;
pub use log_group::LogGroupController;
pub use metrics::{lookup as lookup_process_metrics, ProcessMetrics};
pub use network::NetworkController;
pub use process::{new_registry as new_process_registry, ProcessController, ProcessRegistry};
pub use volume::VolumeController;
