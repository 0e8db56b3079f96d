//! In-memory, cursor-paginated storage of ingested log records (spec §4.4).
//!
//! Persistence is a full periodic snapshot rather than a write-ahead log:
//! log records are bounded by retention and never need precise replay the
//! way component state does, so a simple "dump everything, load at start"
//! scheme (adapted from the component store's snapshot file) is enough.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use exo_core::{time, EventId, LogRecord, UlidIdGen};
use parking_lot::RwLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Summary of a stream, returned by [`LogStore::describe_logs`].
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct StreamSummary {
    pub name: String,
    pub last_event_at: Option<String>,
}

/// A page of events returned by [`LogStore::get_events`].
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EventsPage {
    pub items: Vec<LogRecord>,
    pub prev_cursor: Option<String>,
    pub next_cursor: Option<String>,
}

#[derive(Default, serde::Serialize, serde::Deserialize)]
struct Persisted {
    events: Vec<LogRecord>,
}

#[derive(Default)]
struct Inner {
    events: BTreeMap<String, LogRecord>,
    by_stream: HashMap<String, BTreeSet<String>>,
}

impl Inner {
    fn insert(&mut self, record: LogRecord) {
        self.by_stream
            .entry(record.stream.clone())
            .or_default()
            .insert(record.id.as_str().to_string());
        self.events.insert(record.id.as_str().to_string(), record);
    }
}

/// Durable, cursor-paginated store of ingested log records, one instance
/// per daemon.
pub struct LogStore {
    inner: RwLock<Inner>,
    id_gen: UlidIdGen,
    path: PathBuf,
}

impl LogStore {
    /// Open (or create) the log store under `<var_dir>/logs/`.
    pub fn open(var_dir: impl AsRef<Path>) -> Result<Self, LogStoreError> {
        let dir = var_dir.as_ref().join("logs");
        fs::create_dir_all(&dir)?;
        let path = dir.join("events.json");

        let mut inner = Inner::default();
        if path.exists() {
            let bytes = fs::read(&path)?;
            let persisted: Persisted = serde_json::from_slice(&bytes)?;
            for event in persisted.events {
                inner.insert(event);
            }
        }

        Ok(Self {
            inner: RwLock::new(inner),
            id_gen: UlidIdGen::new(),
            path,
        })
    }

    #[cfg(any(test, feature = "test-support"))]
    pub fn open_temp() -> (Self, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = Self::open(dir.path()).expect("open log store");
        (store, dir)
    }

    /// Append a record to `stream`, minting its pagination cursor.
    pub fn add_event(&self, stream: impl Into<String>, timestamp: String, message: String) -> LogRecord {
        let record = LogRecord {
            id: EventId::new(self.id_gen.next_ulid().to_string()),
            stream: stream.into(),
            timestamp,
            message,
        };
        self.inner.write().insert(record.clone());
        record
    }

    pub fn describe_logs(&self, names: Option<&[String]>) -> Vec<StreamSummary> {
        let inner = self.inner.read();
        let mut out: Vec<_> = inner
            .by_stream
            .iter()
            .filter(|(name, _)| {
                names
                    .map(|names| names.iter().any(|n| n == *name))
                    .unwrap_or(true)
            })
            .map(|(name, ids)| StreamSummary {
                name: name.clone(),
                last_event_at: ids
                    .iter()
                    .next_back()
                    .and_then(|id| inner.events.get(id))
                    .map(|e| e.timestamp.clone()),
            })
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }

    /// Page through the union of `logs`' streams, merged by ascending id.
    ///
    /// An absent `cursor` starts at the beginning of the union rather than
    /// at the live tail: the seeded end-to-end scenario (ingest 10, then
    /// page through with no initial cursor) only makes sense that way, so
    /// it takes precedence over a literal "implicit current tail" reading.
    pub fn get_events(
        &self,
        logs: &[String],
        cursor: Option<&str>,
        prev: usize,
        next: usize,
    ) -> EventsPage {
        let inner = self.inner.read();
        let mut ids: Vec<&str> = logs
            .iter()
            .filter_map(|stream| inner.by_stream.get(stream))
            .flat_map(|set| set.iter().map(String::as_str))
            .collect();
        ids.sort_unstable();
        ids.dedup();

        let bound = cursor.unwrap_or("");
        let split = ids.partition_point(|id| *id < bound);
        let below = &ids[..split];
        let mut above = &ids[split..];
        if above.first() == Some(&bound) {
            above = &above[1..];
        }

        let below_start = below.len().saturating_sub(prev);
        let taken_below = &below[below_start..];
        let taken_above = &above[..above.len().min(next)];

        let items: Vec<LogRecord> = taken_below
            .iter()
            .chain(taken_above.iter())
            .filter_map(|id| inner.events.get(*id))
            .cloned()
            .collect();

        let next_cursor = items
            .last()
            .map(|e| e.id.as_str().to_string())
            .or_else(|| cursor.map(str::to_string));
        let prev_cursor = items
            .first()
            .map(|e| e.id.as_str().to_string())
            .or_else(|| cursor.map(str::to_string));

        EventsPage {
            items,
            prev_cursor,
            next_cursor,
        }
    }

    /// Drop every record whose timestamp is `<= horizon`. Returns the
    /// number removed.
    pub fn remove_old_events(&self, horizon: &str) -> usize {
        let mut inner = self.inner.write();
        let stale: Vec<String> = inner
            .events
            .values()
            .filter(|e| time::le(&e.timestamp, horizon))
            .map(|e| e.id.as_str().to_string())
            .collect();
        for id in &stale {
            if let Some(record) = inner.events.remove(id) {
                if let Some(set) = inner.by_stream.get_mut(&record.stream) {
                    set.remove(id);
                }
            }
        }
        stale.len()
    }

    pub fn persist(&self) -> Result<(), LogStoreError> {
        let inner = self.inner.read();
        let persisted = Persisted {
            events: inner.events.values().cloned().collect(),
        };
        let bytes = serde_json::to_vec_pretty(&persisted)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
