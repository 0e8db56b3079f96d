//! Periodic checkpoint of the materialized state, used to bound WAL replay
//! time at startup. Adapted from the teacher's `snapshot.rs`/`checkpoint.rs`
//! pair, simplified to a single synchronous "write state, truncate WAL" step
//! since the component store's mutation rate is low.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::state::MaterializedState;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub struct Snapshot {
    path: PathBuf,
}

impl Snapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Result<Option<MaterializedState>, SnapshotError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&self.path)?;
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    pub fn write(&self, state: &MaterializedState) -> Result<(), SnapshotError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec_pretty(state)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
