// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! exo-store: the durable component store (spec §4.1) — a write-ahead
//! log of component/workspace mutations, periodically checkpointed to a
//! snapshot, behind a mutation-serializing `Store`.

pub mod snapshot;
pub mod state;
pub mod store;
pub mod wal;

pub use snapshot::{Snapshot, SnapshotError};
pub use state::MaterializedState;
pub use store::{ComponentPatch, DescribeComponentsFilter, NewComponent, SharedStore, Store};
pub use wal::{StoreOp, Wal, WalEntry, WalError};
