// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! exo-engine: the workspace reconciler (spec §4.6) and the building
//! blocks it composes — the dependency graph (§4.2), the bracketed
//! dispatch contract (§4.3), and the task tracker (§4.5).

pub mod dispatch;
pub mod graph;
pub mod log_groups;
pub mod task;
pub mod workspace;

pub use dispatch::{dispatch_lifecycle, dispatch_process, LifecycleOp, ProcessOp, Target};
pub use graph::{Graph, GraphError};
pub use log_groups::LogDescription;
pub use task::{TaskRecord, TaskStatus, Tracker};
pub use workspace::{ProcessDescription, ResourceDescription, Workspace, WorkspaceDescription};
