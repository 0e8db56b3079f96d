//! In-memory projection of the component store, rebuilt by replaying the
//! WAL (and, after a checkpoint, a snapshot) at startup.

use std::collections::HashMap;

use exo_core::{ComponentRecord, WorkspaceRecord};

use crate::wal::StoreOp;

/// The materialized view of every workspace and (non-removed) component.
///
/// Disposed-but-not-yet-removed components remain present until
/// `RemoveComponent` is applied (spec §3: "soft-tombstone").
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct MaterializedState {
    pub workspaces: HashMap<String, WorkspaceRecord>,
    pub components: HashMap<String, ComponentRecord>,
}

impl MaterializedState {
    pub fn apply(&mut self, op: &StoreOp) {
        match op {
            StoreOp::AddWorkspace(ws) => {
                self.workspaces.insert(ws.id.as_str().to_string(), ws.clone());
            }
            StoreOp::RemoveWorkspace { id } => {
                self.workspaces.remove(id);
            }
            StoreOp::AddComponent(c) => {
                self.components.insert(c.id.as_str().to_string(), c.clone());
            }
            StoreOp::PatchComponent {
                id,
                state,
                initialized,
                disposed,
            } => {
                if let Some(c) = self.components.get_mut(id) {
                    if let Some(state) = state {
                        c.state = state.clone();
                    }
                    if let Some(initialized) = initialized {
                        c.initialized = Some(initialized.clone());
                    }
                    if let Some(disposed) = disposed {
                        c.disposed = Some(disposed.clone());
                    }
                }
            }
            StoreOp::RemoveComponent { id } => {
                self.components.remove(id);
            }
        }
    }

    /// Components belonging to a workspace, by name, excluding disposed
    /// records — used for the name-uniqueness check on add.
    pub fn live_siblings(&self, workspace_id: &str) -> HashMap<&str, &ComponentRecord> {
        self.components
            .values()
            .filter(|c| c.workspace_id.as_str() == workspace_id && c.disposed.is_none())
            .map(|c| (c.name.as_str(), c))
            .collect()
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
