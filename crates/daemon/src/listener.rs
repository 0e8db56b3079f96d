// SPDX-License-Identifier: MIT

//! Listener task: accepts socket connections and dispatches each request
//! into the workspace rooted at the path it names, without blocking the
//! ingest side of the daemon.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::{UnixListener, UnixStream};
use tracing::{debug, error, warn};

use exo_controllers::ProcessRegistry;
use exo_core::{ComponentType, ExoError, Result as ExoResult};
use exo_engine::{Tracker, Workspace};
use exo_logd::LogStore;
use exo_manifest::Format;
use exo_store::{DescribeComponentsFilter, Store};

use crate::protocol::{Request, Response};
use crate::protocol_wire::{self, DEFAULT_TIMEOUT};

/// Collaborators shared by every connection's handler.
pub struct ListenCtx {
    pub store: Arc<Store>,
    pub logs: Arc<LogStore>,
    pub registry: ProcessRegistry,
    pub tracker: Tracker,
}

pub struct Listener {
    socket: UnixListener,
    ctx: Arc<ListenCtx>,
}

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error(transparent)]
    Protocol(#[from] protocol_wire::ProtocolError),
}

impl Listener {
    pub fn new(socket: UnixListener, ctx: Arc<ListenCtx>) -> Self {
        Self { socket, ctx }
    }

    /// Accept connections until the process exits, spawning one task per
    /// connection so a slow client never blocks another.
    pub async fn run(self) {
        loop {
            match self.socket.accept().await {
                Ok((stream, _)) => {
                    let ctx = Arc::clone(&self.ctx);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, &ctx).await {
                            match e {
                                ConnectionError::Protocol(protocol_wire::ProtocolError::ConnectionClosed) => {
                                    debug!("client disconnected");
                                }
                                ConnectionError::Protocol(protocol_wire::ProtocolError::Timeout) => {
                                    warn!("connection timed out");
                                }
                                _ => error!("connection error: {e}"),
                            }
                        }
                    });
                }
                Err(e) => error!("accept error: {e}"),
            }
        }
    }
}

async fn handle_connection(stream: UnixStream, ctx: &ListenCtx) -> Result<(), ConnectionError> {
    let (mut reader, mut writer) = stream.into_split();
    let request = protocol_wire::read_request(&mut reader, DEFAULT_TIMEOUT).await?;
    debug!(request = ?request, "received request");

    let response = route(ctx, request).await;
    debug!(response = ?response, "sending response");
    protocol_wire::write_response(&mut writer, &response, DEFAULT_TIMEOUT).await?;
    Ok(())
}

async fn route(ctx: &ListenCtx, request: Request) -> Response {
    match dispatch(ctx, request).await {
        Ok(response) => response,
        Err(e) => Response::from_error(e),
    }
}

/// Find or create the workspace rooted at `root`, using the root path
/// itself as the workspace id — one workspace per directory, no separate
/// naming scheme for the CLI to track.
fn ensure_workspace(ctx: &ListenCtx, root: &str) -> ExoResult<Workspace> {
    let root_path = PathBuf::from(root);
    if ctx.store.describe_workspaces(Some(&[root.to_string()])).is_empty() {
        ctx.store.add_workspace(root.to_string(), root_path)?;
    }
    Ok(Workspace::new(root.to_string(), ctx.store.clone(), ctx.registry.clone(), ctx.tracker.clone(), ctx.logs.clone()))
}

fn parse_types(types: Option<Vec<String>>) -> ExoResult<Option<Vec<ComponentType>>> {
    match types {
        None => Ok(None),
        Some(tags) => tags
            .iter()
            .map(|t| ComponentType::from_str(t).map_err(ExoError::Validation))
            .collect::<ExoResult<Vec<_>>>()
            .map(Some),
    }
}

async fn dispatch(ctx: &ListenCtx, request: Request) -> ExoResult<Response> {
    match request {
        Request::Ping => Ok(Response::Pong),

        Request::Describe { root } => {
            let description = ensure_workspace(ctx, &root)?.describe()?;
            Ok(Response::Workspace { description })
        }

        Request::Destroy { root } => {
            ensure_workspace(ctx, &root)?.destroy().await?;
            Ok(Response::Ok)
        }

        Request::Apply { root, format, path, source } => {
            let source = match source {
                Some(source) => source,
                None => {
                    let path = path.clone().ok_or_else(|| ExoError::Validation("apply requires source or path".to_string()))?;
                    std::fs::read_to_string(&path).map_err(|e| ExoError::Transport(format!("reading {path}: {e}")))?
                }
            };
            let format = match format.as_deref() {
                Some(tag) => Format::from_tag(tag).ok_or_else(|| ExoError::Validation(format!("unknown manifest format: {tag}")))?,
                None => {
                    let path = path.ok_or_else(|| ExoError::Validation("apply requires format or path".to_string()))?;
                    Format::from_path_suffix(&path).ok_or_else(|| ExoError::Validation(format!("cannot infer manifest format from path: {path}")))?
                }
            };
            let warnings = ensure_workspace(ctx, &root)?.apply(format, &source).await?;
            Ok(Response::Applied { warnings })
        }

        Request::RefreshAllComponents { root, refs } => {
            let id = ensure_workspace(ctx, &root)?.refresh_components(refs.as_deref())?;
            Ok(Response::Job { id: id.as_str().to_string() })
        }

        Request::Resolve { root, refs } => {
            let ids = ensure_workspace(ctx, &root)?.resolve(&refs);
            Ok(Response::Resolved { ids })
        }

        Request::DescribeComponents { root, ids, types, include_disposed } => {
            let types = parse_types(types)?;
            let workspace = ensure_workspace(ctx, &root)?;
            let components = workspace.describe_components(DescribeComponentsFilter {
                ids: ids.as_deref(),
                types: types.as_deref(),
                include_disposed,
                ..Default::default()
            });
            Ok(Response::Components { components })
        }

        Request::CreateComponent { root, name, type_, spec } => {
            let id = ensure_workspace(ctx, &root)?.create_component(&name, &type_, &spec).await?;
            Ok(Response::Created { id })
        }

        Request::UpdateComponent { root, ref_, type_, spec } => {
            let workspace = ensure_workspace(ctx, &root)?;
            let id = workspace
                .resolve(std::slice::from_ref(&ref_))
                .into_iter()
                .next()
                .flatten()
                .ok_or_else(|| ExoError::Validation(format!("unresolvable: {ref_:?}")))?;
            let old = workspace
                .describe_components(DescribeComponentsFilter { ids: Some(std::slice::from_ref(&id)), include_disposed: true, ..Default::default() })
                .into_iter()
                .next()
                .ok_or_else(|| ExoError::NotFound(format!("no such component: {id}")))?;
            let id = workspace.update_component(&old, &type_, &spec).await?;
            Ok(Response::Created { id })
        }

        Request::RefreshComponent { root, ref_ } => {
            let id = ensure_workspace(ctx, &root)?.refresh_components(Some(std::slice::from_ref(&ref_)))?;
            Ok(Response::Job { id: id.as_str().to_string() })
        }

        Request::DisposeComponent { root, ref_ } => {
            ensure_workspace(ctx, &root)?.dispose_component(&ref_).await?;
            Ok(Response::Ok)
        }

        Request::DeleteComponent { root, ref_ } => {
            ensure_workspace(ctx, &root)?.delete_component(&ref_).await?;
            Ok(Response::Ok)
        }

        Request::DescribeLogs { root } => {
            let groups = ensure_workspace(ctx, &root)?.describe_logs();
            Ok(Response::Logs { groups })
        }

        Request::GetEvents { root, logs, cursor, prev, next } => {
            let page = ensure_workspace(ctx, &root)?.get_events(logs.as_deref(), cursor.as_deref(), prev, next);
            Ok(Response::Events { page })
        }

        Request::Start { root } => {
            ensure_workspace(ctx, &root)?.start().await?;
            Ok(Response::Ok)
        }
        Request::Stop { root } => {
            ensure_workspace(ctx, &root)?.stop().await?;
            Ok(Response::Ok)
        }
        Request::Restart { root } => {
            ensure_workspace(ctx, &root)?.restart().await?;
            Ok(Response::Ok)
        }

        Request::StartComponent { root, ref_ } => {
            ensure_workspace(ctx, &root)?.start_component(&ref_).await?;
            Ok(Response::Ok)
        }
        Request::StopComponent { root, ref_ } => {
            ensure_workspace(ctx, &root)?.stop_component(&ref_).await?;
            Ok(Response::Ok)
        }
        Request::RestartComponent { root, ref_ } => {
            ensure_workspace(ctx, &root)?.restart_component(&ref_).await?;
            Ok(Response::Ok)
        }

        Request::DescribeProcesses { root } => {
            let processes = ensure_workspace(ctx, &root)?.describe_processes();
            Ok(Response::Processes { processes })
        }
        Request::DescribeVolumes { root } => {
            let resources = ensure_workspace(ctx, &root)?.describe_volumes();
            Ok(Response::Resources { resources })
        }
        Request::DescribeNetworks { root } => {
            let resources = ensure_workspace(ctx, &root)?.describe_networks();
            Ok(Response::Resources { resources })
        }
    }
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;
