//! The Component Store (spec §4.1): durable CRUD over component and
//! workspace records, plus ref resolution.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use exo_core::{validate_name, ComponentRecord, ComponentType, ExoError, Result, WorkspaceRecord};
use parking_lot::Mutex;
use tracing::debug;

use crate::snapshot::Snapshot;
use crate::state::MaterializedState;
use crate::wal::{StoreOp, Wal};

/// Input to [`Store::add_component`].
pub struct NewComponent {
    pub workspace_id: String,
    pub id: String,
    pub name: String,
    pub type_: String,
    pub spec: String,
    pub created: String,
}

/// Field-wise update for [`Store::patch_component`]. Unspecified fields are
/// left untouched.
#[derive(Default)]
pub struct ComponentPatch {
    pub state: Option<String>,
    pub initialized: Option<String>,
    pub disposed: Option<String>,
}

/// Filters for [`Store::describe_components`].
#[derive(Default)]
pub struct DescribeComponentsFilter<'a> {
    pub workspace_id: &'a str,
    pub ids: Option<&'a [String]>,
    pub types: Option<&'a [ComponentType]>,
    pub include_disposed: bool,
}

/// Durable, mutation-serializing store of workspace and component records.
///
/// All writes take the same lock, so "a PatchComponent is atomic" (spec
/// §4.1) and "lifecycle calls issued from one workspace instance are
/// totally ordered" (spec §5) both fall out of the single critical section
/// rather than needing per-row locking.
pub struct Store {
    inner: Mutex<Inner>,
}

struct Inner {
    state: MaterializedState,
    wal: Wal,
    snapshot: Snapshot,
    ops_since_snapshot: u64,
}

/// Snapshot after every this many WAL ops, bounding replay time at startup.
const SNAPSHOT_INTERVAL: u64 = 500;

impl Store {
    /// Open (or create) a store rooted at `dir`, replaying its snapshot and
    /// WAL.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let snapshot = Snapshot::new(dir.join("state.snapshot.json"));
        let mut state = snapshot
            .load()
            .map_err(|e| ExoError::Transport(format!("loading snapshot: {e}")))?
            .unwrap_or_default();

        let wal_path = dir.join("store.wal");
        let (wal, entries) =
            Wal::open(&wal_path).map_err(|e| ExoError::Transport(format!("opening wal: {e}")))?;
        for entry in &entries {
            state.apply(&entry.op);
        }
        debug!(replayed = entries.len(), "replayed component store wal");

        Ok(Self {
            inner: Mutex::new(Inner {
                state,
                wal,
                snapshot,
                ops_since_snapshot: entries.len() as u64,
            }),
        })
    }

    /// Open an in-memory-only store rooted at a temp directory — for tests.
    #[cfg(any(test, feature = "test-support"))]
    pub fn open_temp() -> (Self, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = Self::open(dir.path()).expect("open store");
        (store, dir)
    }

    fn append(&self, inner: &mut Inner, op: StoreOp) -> Result<()> {
        inner
            .wal
            .append(&op)
            .map_err(|e| ExoError::Transport(format!("appending to wal: {e}")))?;
        inner.state.apply(&op);
        inner.ops_since_snapshot += 1;
        if inner.ops_since_snapshot >= SNAPSHOT_INTERVAL {
            inner
                .snapshot
                .write(&inner.state)
                .map_err(|e| ExoError::Transport(format!("writing snapshot: {e}")))?;
            inner
                .wal
                .truncate()
                .map_err(|e| ExoError::Transport(format!("truncating wal: {e}")))?;
            inner.ops_since_snapshot = 0;
        }
        Ok(())
    }

    pub fn describe_workspaces(&self, ids: Option<&[String]>) -> Vec<WorkspaceRecord> {
        let inner = self.inner.lock();
        let mut out: Vec<_> = inner
            .state
            .workspaces
            .values()
            .filter(|ws| ids.map(|ids| ids.iter().any(|id| id == ws.id.as_str())).unwrap_or(true))
            .cloned()
            .collect();
        out.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        out
    }

    pub fn add_workspace(&self, id: String, root: PathBuf) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.state.workspaces.contains_key(&id) {
            return Err(ExoError::Conflict(format!("workspace already exists: {id}")));
        }
        let record = WorkspaceRecord {
            id: id.clone().into(),
            root,
        };
        self.append(&mut inner, StoreOp::AddWorkspace(record))
    }

    pub fn remove_workspace(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        if !inner.state.workspaces.contains_key(id) {
            return Err(ExoError::NotFound(format!("no such workspace: {id}")));
        }
        let has_components = inner
            .state
            .components
            .values()
            .any(|c| c.workspace_id.as_str() == id);
        if has_components {
            return Err(ExoError::Conflict(format!(
                "workspace {id} still has components"
            )));
        }
        self.append(
            &mut inner,
            StoreOp::RemoveWorkspace { id: id.to_string() },
        )
    }

    pub fn add_component(&self, input: NewComponent) -> Result<ComponentRecord> {
        validate_name(&input.name).map_err(ExoError::Validation)?;
        let mut inner = self.inner.lock();
        let taken = inner
            .state
            .live_siblings(&input.workspace_id)
            .contains_key(input.name.as_str());
        if taken {
            return Err(ExoError::Conflict(format!(
                "name already taken in workspace: {}",
                input.name
            )));
        }
        let record = ComponentRecord {
            id: input.id.into(),
            workspace_id: input.workspace_id.into(),
            name: input.name,
            type_: input.type_,
            spec: input.spec,
            state: String::new(),
            created: input.created,
            initialized: None,
            disposed: None,
        };
        self.append(&mut inner, StoreOp::AddComponent(record.clone()))?;
        Ok(record)
    }

    pub fn patch_component(&self, id: &str, patch: ComponentPatch) -> Result<()> {
        let mut inner = self.inner.lock();
        if !inner.state.components.contains_key(id) {
            return Err(ExoError::NotFound(format!("no such component: {id}")));
        }
        self.append(
            &mut inner,
            StoreOp::PatchComponent {
                id: id.to_string(),
                state: patch.state,
                initialized: patch.initialized,
                disposed: patch.disposed,
            },
        )
    }

    pub fn describe_components(&self, filter: DescribeComponentsFilter<'_>) -> Vec<ComponentRecord> {
        let inner = self.inner.lock();
        let mut out: Vec<_> = inner
            .state
            .components
            .values()
            .filter(|c| c.workspace_id.as_str() == filter.workspace_id)
            .filter(|c| filter.include_disposed || c.disposed.is_none())
            .filter(|c| {
                filter
                    .ids
                    .map(|ids| ids.iter().any(|id| id == c.id.as_str()))
                    .unwrap_or(true)
            })
            .filter(|c| {
                filter
                    .types
                    .map(|types| types.iter().any(|t| t.as_str() == c.type_))
                    .unwrap_or(true)
            })
            .cloned()
            .collect();
        out.sort_by(|a, b| a.created.cmp(&b.created).then(a.id.as_str().cmp(b.id.as_str())));
        out
    }

    pub fn remove_component(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        if !inner.state.components.contains_key(id) {
            return Err(ExoError::NotFound(format!("no such component: {id}")));
        }
        self.append(&mut inner, StoreOp::RemoveComponent { id: id.to_string() })
    }

    /// Resolve each ref first as an existing id, else by exact live name.
    /// Output is parallel-indexed to `refs`; misses yield `None`.
    pub fn resolve(&self, workspace_id: &str, refs: &[String]) -> Vec<Option<String>> {
        let inner = self.inner.lock();
        let siblings = inner.state.live_siblings(workspace_id);
        refs.iter()
            .map(|r| {
                if inner.state.components.contains_key(r) {
                    Some(r.clone())
                } else {
                    siblings.get(r.as_str()).map(|c| c.id.as_str().to_string())
                }
            })
            .collect()
    }
}

pub type SharedStore = Arc<Store>;

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
