//! The Task Tracker (spec §4.5): a tree of jobs so long-running
//! reconciliation work can return a pollable handle instead of blocking
//! the request handler.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use exo_core::{time, ExoError, JobId, Result, UlidIdGen};
use parking_lot::Mutex;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Running,
    Success,
    Failed,
}

#[derive(Debug, Clone)]
pub struct TaskRecord {
    pub id: JobId,
    pub label: String,
    pub parent: Option<JobId>,
    pub status: TaskStatus,
    pub started: Option<String>,
    pub ended: Option<String>,
    pub error: Option<String>,
}

struct Inner {
    tasks: HashMap<String, TaskRecord>,
    children: HashMap<String, Vec<String>>,
    handles: HashMap<String, JoinHandle<()>>,
}

/// Shared, cloneable handle to the tracker's state. Children spawned via
/// [`Tracker::go`] run concurrently; the tracker itself serializes every
/// record mutation behind a single lock (spec §4.5's concurrency note).
#[derive(Clone)]
pub struct Tracker {
    inner: Arc<Mutex<Inner>>,
    id_gen: UlidIdGen,
}

impl Default for Tracker {
    fn default() -> Self {
        Self::new()
    }
}

impl Tracker {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                tasks: HashMap::new(),
                children: HashMap::new(),
                handles: HashMap::new(),
            })),
            id_gen: UlidIdGen::new(),
        }
    }

    /// Create a root task, immediately `Running`.
    pub fn start_task(&self, label: impl Into<String>) -> JobId {
        let id = JobId::new(self.id_gen.next_ulid().to_string());
        let record = TaskRecord {
            id: id.clone(),
            label: label.into(),
            parent: None,
            status: TaskStatus::Running,
            started: Some(time::now_nanos()),
            ended: None,
            error: None,
        };
        self.inner.lock().tasks.insert(id.as_str().to_string(), record);
        id
    }

    pub fn task(&self, id: &str) -> Option<TaskRecord> {
        self.inner.lock().tasks.get(id).cloned()
    }

    /// Spawn `f` as a child of `parent`, running concurrently with any
    /// other children of the same parent. Returns the child's id
    /// immediately; its outcome is recorded as it completes.
    pub fn go<F>(&self, parent: &JobId, label: impl Into<String>, f: F) -> JobId
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        let child_id = JobId::new(self.id_gen.next_ulid().to_string());
        let record = TaskRecord {
            id: child_id.clone(),
            label: label.into(),
            parent: Some(parent.clone()),
            status: TaskStatus::Running,
            started: Some(time::now_nanos()),
            ended: None,
            error: None,
        };

        let tracker = self.clone();
        let child_key = child_id.as_str().to_string();
        {
            let mut inner = self.inner.lock();
            inner.tasks.insert(child_key.clone(), record);
            inner
                .children
                .entry(parent.as_str().to_string())
                .or_default()
                .push(child_key.clone());
        }

        let handle = tokio::spawn(async move {
            let result = f.await;
            let mut inner = tracker.inner.lock();
            if let Some(record) = inner.tasks.get_mut(&child_key) {
                record.ended = Some(time::now_nanos());
                match result {
                    Ok(()) => record.status = TaskStatus::Success,
                    Err(e) => {
                        record.status = TaskStatus::Failed;
                        record.error = Some(e.to_string());
                    }
                }
            }
        });

        self.inner
            .lock()
            .handles
            .insert(child_id.as_str().to_string(), handle);
        child_id
    }

    /// Wait for every child of `id` to complete, then close the root: it
    /// reports success only if every child succeeded. A failed child does
    /// not cancel its siblings (spec §4.5).
    pub async fn finish(&self, id: &JobId) -> Result<()> {
        let key = id.as_str().to_string();
        let child_keys = {
            let inner = self.inner.lock();
            inner.children.get(&key).cloned().unwrap_or_default()
        };

        let mut handles = Vec::new();
        {
            let mut inner = self.inner.lock();
            for child in &child_keys {
                if let Some(handle) = inner.handles.remove(child) {
                    handles.push(handle);
                }
            }
        }
        for handle in handles {
            let _ = handle.await;
        }

        let mut inner = self.inner.lock();
        let all_succeeded = child_keys.iter().all(|child| {
            inner
                .tasks
                .get(child)
                .map(|t| t.status == TaskStatus::Success)
                .unwrap_or(false)
        });
        let Some(record) = inner.tasks.get_mut(&key) else {
            return Err(ExoError::NotFound(format!("no such task: {key}")));
        };
        record.ended = Some(time::now_nanos());
        record.status = if all_succeeded {
            TaskStatus::Success
        } else {
            TaskStatus::Failed
        };
        Ok(())
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
