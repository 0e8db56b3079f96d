//! Workspace domain record (spec §3).

use crate::WorkspaceId;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A workspace: the unit of isolation. One directory, many components.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkspaceRecord {
    pub id: WorkspaceId,
    pub root: PathBuf,
}
