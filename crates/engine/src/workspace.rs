//! The Workspace Engine (spec §4.6): the reconciler and request surface
//! that composes the store, the controllers, the task tracker and the
//! log collector into the operations a daemon handler or CLI command
//! actually calls.

use std::sync::Arc;

use exo_controllers::ProcessRegistry;
use exo_core::{time, ComponentRecord, ComponentType, ExoError, JobId, Result, UlidIdGen};
use exo_logd::LogStore;
use exo_manifest::{Format, Manifest};
use exo_store::{ComponentPatch, DescribeComponentsFilter, NewComponent, Store};

use tracing::warn;

use crate::dispatch::{self, LifecycleOp, ProcessOp, Target};
use crate::task::Tracker;

/// Types whose components are driven by the syslog ingest path and show
/// up in `DescribeProcesses`/bulk `Start`/`Stop`/`Restart`.
const PROCESS_LIKE: &[ComponentType] = &[ComponentType::Process, ComponentType::Container];

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WorkspaceDescription {
    pub id: String,
    pub root: std::path::PathBuf,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProcessDescription {
    pub id: String,
    pub name: String,
    pub provider: &'static str,
    pub running: bool,
    pub rss_bytes: u64,
    pub cpu_percent: f32,
    pub created_at: Option<String>,
    pub child_executables: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ResourceDescription {
    pub id: String,
    pub name: String,
}

/// One workspace's view of the shared daemon collaborators, plus its own
/// id. Constructed once per request by the daemon's handler layer.
pub struct Workspace {
    pub id: String,
    pub store: Arc<Store>,
    pub registry: ProcessRegistry,
    pub tracker: Tracker,
    pub logs: Arc<LogStore>,
    id_gen: UlidIdGen,
}

impl Workspace {
    pub fn new(id: impl Into<String>, store: Arc<Store>, registry: ProcessRegistry, tracker: Tracker, logs: Arc<LogStore>) -> Self {
        Self {
            id: id.into(),
            store,
            registry,
            tracker,
            logs,
            id_gen: UlidIdGen::new(),
        }
    }

    pub fn describe(&self) -> Result<WorkspaceDescription> {
        let mut found = self.store.describe_workspaces(Some(&[self.id.clone()]));
        let record = found.pop().ok_or_else(|| ExoError::NotFound(format!("no such workspace: {}", self.id)))?;
        Ok(WorkspaceDescription {
            id: record.id.as_str().to_string(),
            root: record.root,
        })
    }

    /// Delete every component, then the workspace record. Aborts on the
    /// first component deletion failure, leaving the workspace in place
    /// (spec §4.6) — safe to rerun.
    pub async fn destroy(&self) -> Result<()> {
        for component in self.describe_components(DescribeComponentsFilter::default()) {
            self.delete_component(component.id.as_str()).await?;
        }
        self.store.remove_workspace(&self.id)
    }

    /// Reconcile the live component set against a manifest (spec §4.6's
    /// five-step algorithm). Each step commits before the next begins;
    /// a mid-reconcile failure leaves a partially-applied workspace that
    /// a subsequent `apply` converges.
    pub async fn apply(&self, format: Format, source: &str) -> Result<Vec<String>> {
        let manifest: Manifest = exo_manifest::parse(format, source).map_err(|e| ExoError::Validation(format!("parsing manifest: {e}")))?;

        let live = self.describe_components(DescribeComponentsFilter::default());
        let mut old_by_name: std::collections::HashMap<String, ComponentRecord> =
            live.into_iter().map(|c| (c.name.clone(), c)).collect();

        for (name, desired) in manifest.sorted() {
            if let Some(old) = old_by_name.remove(name) {
                self.update_component(&old, &desired.type_, &desired.spec).await?;
            } else {
                self.create_component(name, &desired.type_, &desired.spec).await?;
            }
        }

        for stale in old_by_name.into_values() {
            self.delete_component(stale.id.as_str()).await?;
        }

        Ok(manifest.warnings)
    }

    pub fn resolve(&self, refs: &[String]) -> Vec<Option<String>> {
        self.store.resolve(&self.id, refs)
    }

    fn resolve_ref(&self, r: &str) -> Result<String> {
        self.resolve(std::slice::from_ref(&r.to_string()))
            .into_iter()
            .next()
            .flatten()
            .ok_or_else(|| ExoError::Validation(format!("unresolvable: {r:?}")))
    }

    pub fn describe_components(&self, filter: DescribeComponentsFilter<'_>) -> Vec<ComponentRecord> {
        self.store.describe_components(DescribeComponentsFilter {
            workspace_id: &self.id,
            ..filter
        })
    }

    fn describe_one(&self, id: &str) -> Result<ComponentRecord> {
        self.describe_components(DescribeComponentsFilter {
            ids: Some(std::slice::from_ref(&id.to_string())),
            include_disposed: true,
            ..Default::default()
        })
        .into_iter()
        .next()
        .ok_or_else(|| ExoError::NotFound(format!("no such component: {id}")))
    }

    /// Validate the name, store the record, then initialize it through
    /// bracketed dispatch against a synthetic description (avoiding a
    /// re-read right after the add). Any failure before `initialized` is
    /// set leaves the record without it; the caller may delete it.
    pub async fn create_component(&self, name: &str, type_: &str, spec: &str) -> Result<String> {
        exo_core::validate_name(name).map_err(ExoError::Validation)?;
        let id = self.id_gen.next_ulid().to_string();
        self.store.add_component(NewComponent {
            workspace_id: self.id.clone(),
            id: id.clone(),
            name: name.to_string(),
            type_: type_.to_string(),
            spec: spec.to_string(),
            created: time::now_nanos(),
        })?;

        dispatch::dispatch_lifecycle(
            &self.store,
            &self.registry,
            Target { id: &id, type_, spec, state: "" },
            LifecycleOp::Initialize,
        )
        .await?;

        self.store.patch_component(
            &id,
            ComponentPatch {
                initialized: Some(time::now_nanos()),
                ..Default::default()
            },
        )?;
        Ok(id)
    }

    /// Current policy (spec §4.6): resolve, delete, recreate under the
    /// same name. Not atomic; a future smart-update lifecycle call could
    /// replace this.
    pub async fn update_component(&self, old: &ComponentRecord, type_: &str, spec: &str) -> Result<String> {
        self.delete_component(old.id.as_str()).await?;
        self.create_component(&old.name, type_, spec).await
    }

    fn build_target<'a>(&self, component: &'a ComponentRecord) -> Target<'a> {
        Target {
            id: component.id.as_str(),
            type_: &component.type_,
            spec: &component.spec,
            state: &component.state,
        }
    }

    /// Refresh every component matching `refs` (or all, if absent),
    /// concurrently, under one root task. Returns the root task's id
    /// immediately; the caller polls it for completion.
    pub fn refresh_components(&self, refs: Option<&[String]>) -> Result<JobId> {
        let ids = match refs {
            Some(refs) => Some(
                refs.iter()
                    .map(|r| self.resolve_ref(r))
                    .collect::<Result<Vec<_>>>()?,
            ),
            None => None,
        };
        let components = self.describe_components(DescribeComponentsFilter {
            ids: ids.as_deref(),
            ..Default::default()
        });

        let root = self.tracker.start_task("refresh");
        for component in components {
            let name = component.name.clone();
            let store = self.store.clone();
            let registry = self.registry.clone();
            self.tracker.go(&root, name, async move {
                let target = Target {
                    id: component.id.as_str(),
                    type_: &component.type_,
                    spec: &component.spec,
                    state: &component.state,
                };
                dispatch::dispatch_lifecycle(&store, &registry, target, LifecycleOp::Refresh).await
            });
        }
        let tracker = self.tracker.clone();
        let finish_root = root.clone();
        tokio::spawn(async move {
            if let Err(err) = tracker.finish(&finish_root).await {
                warn!(error = %err, job = %finish_root, "failed to close refresh root task");
            }
        });
        Ok(root)
    }

    pub async fn dispose_component(&self, r: &str) -> Result<()> {
        let id = self.resolve_ref(r)?;
        self.dispose_by_id(&id).await
    }

    /// Invoke `Dispose` through bracketed dispatch, then set `disposed`
    /// and drop the record off a spawned task rather than blocking the
    /// caller on the hard removal (spec §4.6: "schedules hard removal").
    async fn dispose_by_id(&self, id: &str) -> Result<()> {
        let component = self.describe_one(id)?;
        let target = self.build_target(&component);
        dispatch::dispatch_lifecycle(&self.store, &self.registry, target, LifecycleOp::Dispose).await?;
        self.store.patch_component(
            id,
            ComponentPatch {
                disposed: Some(time::now_nanos()),
                ..Default::default()
            },
        )?;
        let store = self.store.clone();
        let id = id.to_string();
        tokio::spawn(async move {
            if let Err(err) = store.remove_component(&id) {
                warn!(error = %err, component = %id, "failed to hard-remove disposed component");
            }
        });
        Ok(())
    }

    pub async fn delete_component(&self, r: &str) -> Result<()> {
        let id = self.resolve_ref(r)?;
        self.delete_by_id(&id).await
    }

    /// Dispose, then synchronously hard-remove — unlike
    /// `dispose_component`, the removal is not deferred.
    async fn delete_by_id(&self, id: &str) -> Result<()> {
        let component = self.describe_one(id)?;
        let target = self.build_target(&component);
        dispatch::dispatch_lifecycle(&self.store, &self.registry, target, LifecycleOp::Dispose).await?;
        self.store.patch_component(
            id,
            ComponentPatch {
                disposed: Some(time::now_nanos()),
                ..Default::default()
            },
        )?;
        self.store.remove_component(id)
    }

    async fn control_process_op(&self, r: &str, op: ProcessOp) -> Result<()> {
        let id = self.resolve_ref(r)?;
        let component = self.describe_one(&id)?;
        let target = self.build_target(&component);
        dispatch::dispatch_process(&self.store, &self.registry, target, op).await
    }

    pub async fn start_component(&self, r: &str) -> Result<()> {
        self.control_process_op(r, ProcessOp::Start).await
    }

    pub async fn stop_component(&self, r: &str) -> Result<()> {
        self.control_process_op(r, ProcessOp::Stop).await
    }

    pub async fn restart_component(&self, r: &str) -> Result<()> {
        self.control_process_op(r, ProcessOp::Restart).await
    }

    /// Apply `op` to every process-like component, in listing order.
    /// Aborts at the first per-component failure; no special casing is
    /// given to `Stop`, matching the original implementation's uniform
    /// `controlEachProcess` loop.
    async fn control_each_process(&self, op: ProcessOp) -> Result<()> {
        for component in self.describe_components(DescribeComponentsFilter {
            types: Some(PROCESS_LIKE),
            ..Default::default()
        }) {
            let target = self.build_target(&component);
            dispatch::dispatch_process(&self.store, &self.registry, target, op)
                .await
                .map_err(|e| e.with_layer(&format!("controlling {}", component.id)))?;
        }
        Ok(())
    }

    pub async fn start(&self) -> Result<()> {
        self.control_each_process(ProcessOp::Start).await
    }

    pub async fn stop(&self) -> Result<()> {
        self.control_each_process(ProcessOp::Stop).await
    }

    pub async fn restart(&self) -> Result<()> {
        self.control_each_process(ProcessOp::Restart).await
    }

    /// One log group per process-like component, decorated with the
    /// collector's last-event-at for the union of its `:out`/`:err`
    /// streams.
    pub fn describe_logs(&self) -> Vec<crate::log_groups::LogDescription> {
        crate::log_groups::describe_logs(&self.describe_components(DescribeComponentsFilter {
            types: Some(PROCESS_LIKE),
            ..Default::default()
        }))
        .into_iter()
        .map(|group| {
            let summaries = self.logs.describe_logs(Some(&group.streams));
            let last_event_at = summaries.into_iter().filter_map(|s| s.last_event_at).max();
            crate::log_groups::LogDescription { name: group.name, last_event_at }
        })
        .collect()
    }

    /// Expand `logs` (or every log group, if absent) into its member
    /// streams and page through their union.
    pub fn get_events(&self, logs: Option<&[String]>, cursor: Option<&str>, prev: usize, next: usize) -> exo_logd::EventsPage {
        let groups: Vec<String> = match logs {
            Some(names) => names.to_vec(),
            None => self.describe_logs().into_iter().map(|g| g.name).collect(),
        };
        let streams = crate::log_groups::expand_groups(&groups);
        self.logs.get_events(&streams, cursor, prev, next)
    }

    pub fn describe_processes(&self) -> Vec<ProcessDescription> {
        self.describe_components(DescribeComponentsFilter {
            types: Some(PROCESS_LIKE),
            ..Default::default()
        })
        .into_iter()
        .filter_map(|component| describe_process(&component))
        .collect()
    }

    pub fn describe_volumes(&self) -> Vec<ResourceDescription> {
        self.describe_typed(ComponentType::Volume)
    }

    pub fn describe_networks(&self) -> Vec<ResourceDescription> {
        self.describe_typed(ComponentType::Network)
    }

    fn describe_typed(&self, type_: ComponentType) -> Vec<ResourceDescription> {
        self.describe_components(DescribeComponentsFilter {
            types: Some(std::slice::from_ref(&type_)),
            ..Default::default()
        })
        .into_iter()
        .map(|c| ResourceDescription {
            id: c.id.as_str().to_string(),
            name: c.name,
        })
        .collect()
    }
}

/// `DescribeProcesses`' per-type enrichment: live OS metrics for
/// processes (a gone pid yields `running: false`, never a hard error),
/// the bare `running` flag recorded in state for containers. Components
/// whose state can't be parsed are skipped, matching the original
/// implementation's "log and continue" behavior.
fn describe_process(component: &ComponentRecord) -> Option<ProcessDescription> {
    match component.type_.as_str() {
        "process" => {
            #[derive(serde::Deserialize)]
            struct ProcessState {
                pid: Option<u32>,
            }
            let state: ProcessState = serde_json::from_str(&component.state).ok()?;
            let metrics = state.pid.map(exo_controllers::lookup_process_metrics).unwrap_or_default();
            Some(ProcessDescription {
                id: component.id.as_str().to_string(),
                name: component.name.clone(),
                provider: "unix",
                running: metrics.running,
                rss_bytes: metrics.rss_bytes,
                cpu_percent: metrics.cpu_percent,
                created_at: metrics.created_at,
                child_executables: metrics.child_executables,
            })
        }
        "container" => {
            #[derive(serde::Deserialize)]
            struct ContainerState {
                #[serde(default)]
                running: bool,
            }
            let state: ContainerState = serde_json::from_str(&component.state).ok()?;
            Some(ProcessDescription {
                id: component.id.as_str().to_string(),
                name: component.name.clone(),
                provider: "docker",
                running: state.running,
                rss_bytes: 0,
                cpu_percent: 0.0,
                created_at: None,
                child_executables: Vec::new(),
            })
        }
        _ => None,
    }
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
