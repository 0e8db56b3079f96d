// SPDX-License-Identifier: MIT

//! IPC protocol between `exo` and `exod`.
//!
//! The RPC surface is method-oriented (spec §6): each of the twenty-one
//! named methods has a JSON request and response body. We carry it over
//! a Unix domain socket with the length-prefixed framing in
//! [`crate::protocol_wire`] rather than introducing an HTTP server
//! dependency; `Response::Error`'s `status` field still carries the
//! HTTP-style status code spec §6/§7 call for.

use exo_core::ComponentRecord;
use exo_engine::{LogDescription, ProcessDescription, ResourceDescription, WorkspaceDescription};
use exo_logd::EventsPage;
use serde::{Deserialize, Serialize};

/// Request from `exo` to `exod`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "method", rename_all = "kebab-case")]
pub enum Request {
    /// Health check, answered without touching any workspace state.
    Ping,

    Describe {
        root: String,
    },
    Destroy {
        root: String,
    },

    Apply {
        root: String,
        /// Format tag (`exo`/`compose`/`procfile`); inferred from `path`
        /// when absent and `path` is given.
        format: Option<String>,
        path: Option<String>,
        source: Option<String>,
    },

    RefreshAllComponents {
        root: String,
        refs: Option<Vec<String>>,
    },

    Resolve {
        root: String,
        refs: Vec<String>,
    },

    DescribeComponents {
        root: String,
        ids: Option<Vec<String>>,
        types: Option<Vec<String>>,
        #[serde(default)]
        include_disposed: bool,
    },

    CreateComponent {
        root: String,
        name: String,
        #[serde(rename = "type")]
        type_: String,
        spec: String,
    },

    UpdateComponent {
        root: String,
        #[serde(rename = "ref")]
        ref_: String,
        #[serde(rename = "type")]
        type_: String,
        spec: String,
    },

    RefreshComponent {
        root: String,
        #[serde(rename = "ref")]
        ref_: String,
    },

    DisposeComponent {
        root: String,
        #[serde(rename = "ref")]
        ref_: String,
    },

    DeleteComponent {
        root: String,
        #[serde(rename = "ref")]
        ref_: String,
    },

    DescribeLogs {
        root: String,
    },

    GetEvents {
        root: String,
        logs: Option<Vec<String>>,
        cursor: Option<String>,
        #[serde(default)]
        prev: usize,
        #[serde(default = "default_next")]
        next: usize,
    },

    Start {
        root: String,
    },
    Stop {
        root: String,
    },
    Restart {
        root: String,
    },

    StartComponent {
        root: String,
        #[serde(rename = "ref")]
        ref_: String,
    },
    StopComponent {
        root: String,
        #[serde(rename = "ref")]
        ref_: String,
    },
    RestartComponent {
        root: String,
        #[serde(rename = "ref")]
        ref_: String,
    },

    DescribeProcesses {
        root: String,
    },
    DescribeVolumes {
        root: String,
    },
    DescribeNetworks {
        root: String,
    },
}

fn default_next() -> usize {
    50
}

/// Response from `exod` to `exo`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "result", rename_all = "kebab-case")]
pub enum Response {
    Pong,
    Ok,
    Workspace {
        description: WorkspaceDescription,
    },
    Resolved {
        ids: Vec<Option<String>>,
    },
    Components {
        components: Vec<ComponentRecord>,
    },
    Created {
        id: String,
    },
    Job {
        id: String,
    },
    Applied {
        warnings: Vec<String>,
    },
    Logs {
        groups: Vec<LogDescription>,
    },
    Events {
        page: EventsPage,
    },
    Processes {
        processes: Vec<ProcessDescription>,
    },
    Resources {
        resources: Vec<ResourceDescription>,
    },
    /// HTTP-style status per spec §6/§7 (400/404/409/500/401), alongside
    /// the layered `"<layer>: <cause>"` message.
    Error {
        status: u16,
        message: String,
    },
}

impl Response {
    pub fn from_error(err: exo_core::ExoError) -> Self {
        Response::Error { status: err.status(), message: err.to_string() }
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
