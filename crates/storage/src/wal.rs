//! JSONL write-ahead log of store mutations.
//!
//! Every mutating store operation is durably appended here before the
//! in-memory [`crate::state::MaterializedState`] is updated, so a crashed
//! daemon can recover by replaying the log from the last snapshot. Adapted
//! from the teacher's event-sourced `Wal`, specialized to the handful of
//! component-store operations spec §4.1 defines instead of a generic event
//! type.

use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use exo_core::{ComponentRecord, WorkspaceRecord};

/// Errors that can occur in WAL operations.
#[derive(Debug, Error)]
pub enum WalError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("corrupt entry at line {line}: {message}")]
    Corrupt { line: usize, message: String },
}

/// A single durable mutation of the component store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StoreOp {
    AddWorkspace(WorkspaceRecord),
    RemoveWorkspace { id: String },
    AddComponent(ComponentRecord),
    PatchComponent {
        id: String,
        state: Option<String>,
        initialized: Option<String>,
        disposed: Option<String>,
    },
    RemoveComponent { id: String },
}

#[derive(Serialize)]
struct WalRecordRef<'a> {
    seq: u64,
    op: &'a StoreOp,
}

#[derive(Deserialize)]
struct WalRecord {
    seq: u64,
    op: StoreOp,
}

/// A single WAL entry with its sequence number.
#[derive(Debug, Clone)]
pub struct WalEntry {
    pub seq: u64,
    pub op: StoreOp,
}

/// Append-only JSONL log, fsync'd on every append for durability.
///
/// Unlike the teacher's group-commit `Wal` (which batches writes for
/// throughput), the component store has a low mutation rate relative to
/// job/event streams, so every op is flushed synchronously — simpler, and
/// sufficient to satisfy spec §4.1's "PatchComponent is atomic" guarantee.
#[derive(Debug)]
pub struct Wal {
    file: File,
    path: PathBuf,
    write_seq: u64,
}

impl Wal {
    /// Open or create a WAL at the given path, replaying any existing
    /// entries through `apply`.
    pub fn open(path: &Path) -> Result<(Self, Vec<WalEntry>), WalError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut entries = Vec::new();
        let mut max_seq = 0;
        if path.exists() {
            let file = File::open(path)?;
            let reader = BufReader::new(file);
            for (i, line) in reader.lines().enumerate() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                let record: WalRecord =
                    serde_json::from_str(&line).map_err(|e| WalError::Corrupt {
                        line: i + 1,
                        message: e.to_string(),
                    })?;
                max_seq = max_seq.max(record.seq);
                entries.push(WalEntry {
                    seq: record.seq,
                    op: record.op,
                });
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok((
            Self {
                file,
                path: path.to_path_buf(),
                write_seq: max_seq,
            },
            entries,
        ))
    }

    /// Append and durably flush a single operation, returning its sequence
    /// number.
    pub fn append(&mut self, op: &StoreOp) -> Result<u64, WalError> {
        self.write_seq += 1;
        let record = WalRecordRef {
            seq: self.write_seq,
            op,
        };
        let mut line = serde_json::to_vec(&record)?;
        line.push(b'\n');
        self.file.write_all(&line)?;
        self.file.sync_data()?;
        Ok(self.write_seq)
    }

    /// Truncate the WAL to empty, used after a snapshot checkpoint.
    pub fn truncate(&mut self) -> Result<(), WalError> {
        // File::create truncates; reopen in append mode for subsequent writes.
        File::create(&self.path)?;
        self.file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        self.write_seq = 0;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
