// SPDX-License-Identifier: MIT

//! Connects to `exod`, auto-starting it if it isn't running, and carries
//! requests/responses over its Unix socket.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use exo_daemon::protocol_wire::{self, ProtocolError};
use exo_daemon::{Request, Response};
use thiserror::Error;
use tokio::net::UnixStream;

use crate::daemon_process::{cleanup_stale_socket, daemon_dir, daemon_socket, probe_socket, read_startup_error, start_daemon_background, stop_daemon_sync, wrap_with_startup_error};

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var).ok().and_then(|s| s.parse::<u64>().ok()).map(Duration::from_millis)
}

pub fn timeout_ipc() -> Duration {
    parse_duration_ms("EXO_TIMEOUT_IPC_MS").unwrap_or(Duration::from_secs(5))
}
pub fn timeout_connect() -> Duration {
    parse_duration_ms("EXO_TIMEOUT_CONNECT_MS").unwrap_or(Duration::from_secs(5))
}
pub fn timeout_exit() -> Duration {
    parse_duration_ms("EXO_TIMEOUT_EXIT_MS").unwrap_or(Duration::from_secs(2))
}
pub fn poll_interval() -> Duration {
    parse_duration_ms("EXO_CONNECT_POLL_MS").unwrap_or(Duration::from_millis(50))
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("daemon not running")]
    DaemonNotRunning,
    #[error("failed to start daemon: {0}")]
    DaemonStartFailed(String),
    #[error("connection timeout waiting for daemon to start")]
    DaemonStartTimeout,
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("request rejected: {0}")]
    Rejected { status: u16, message: String },
    #[error("unexpected response from daemon")]
    UnexpectedResponse,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not determine state directory")]
    NoStateDir,
}

/// Client bound to `exod`'s Unix socket.
pub struct DaemonClient {
    socket_path: PathBuf,
}

impl DaemonClient {
    /// For commands that mutate workspace state: auto-starts the daemon if
    /// needed, restarting on a stale version mismatch (once per process).
    pub fn for_action() -> Result<Self, ClientError> {
        static RESTARTED: AtomicBool = AtomicBool::new(false);
        if RESTARTED.load(Ordering::SeqCst) {
            return Self::connect();
        }

        let version_path = daemon_dir()?.join("daemon.version");
        if let Ok(daemon_version) = std::fs::read_to_string(&version_path) {
            let cli_version = env!("CARGO_PKG_VERSION");
            if daemon_version.trim() != cli_version {
                RESTARTED.store(true, Ordering::SeqCst);
                eprintln!("warn: daemon version {} does not match cli version {cli_version}, restarting daemon", daemon_version.trim());
                stop_daemon_sync();
            }
        }

        match Self::connect() {
            Ok(client) => {
                if probe_socket(&client.socket_path) {
                    Ok(client)
                } else {
                    cleanup_stale_socket()?;
                    let child = start_daemon_background()?;
                    Self::connect_with_retry(timeout_connect(), child)
                }
            }
            Err(ClientError::DaemonNotRunning) => {
                let child = start_daemon_background()?;
                Self::connect_with_retry(timeout_connect(), child)
            }
            Err(e) => Err(wrap_with_startup_error(e)),
        }
    }

    /// For commands that only read state: connects without auto-starting.
    pub fn for_query() -> Result<Self, ClientError> {
        Self::connect()
    }

    pub fn connect() -> Result<Self, ClientError> {
        let socket_path = daemon_socket()?;
        if !socket_path.exists() {
            return Err(ClientError::DaemonNotRunning);
        }
        Ok(Self { socket_path })
    }

    fn connect_with_retry(timeout: Duration, mut child: std::process::Child) -> Result<Self, ClientError> {
        let start = Instant::now();
        while start.elapsed() < timeout {
            match child.try_wait() {
                Ok(Some(status)) => {
                    let poll_start = Instant::now();
                    while poll_start.elapsed() < timeout_exit() {
                        if let Some(err) = read_startup_error() {
                            return Err(ClientError::DaemonStartFailed(err));
                        }
                        std::thread::sleep(poll_interval());
                    }
                    return Err(ClientError::DaemonStartFailed(format!("exited with {status}")));
                }
                Ok(None) => {}
                Err(_) => {}
            }

            match Self::connect() {
                Ok(client) => return Ok(client),
                Err(ClientError::DaemonNotRunning) => std::thread::sleep(poll_interval()),
                Err(e) => return Err(wrap_with_startup_error(e)),
            }
        }
        Err(wrap_with_startup_error(ClientError::DaemonStartTimeout))
    }

    async fn send_with_timeout(&self, request: &Request, timeout: Duration) -> Result<Response, ClientError> {
        let stream = UnixStream::connect(&self.socket_path).await?;
        let (mut reader, mut writer) = stream.into_split();

        let data = protocol_wire::encode(request)?;
        tokio::time::timeout(timeout, protocol_wire::write_message(&mut writer, &data)).await.map_err(|_| ProtocolError::Timeout)??;

        let response_bytes = tokio::time::timeout(timeout, protocol_wire::read_message(&mut reader)).await.map_err(|_| ProtocolError::Timeout)??;
        Ok(protocol_wire::decode(&response_bytes)?)
    }

    pub async fn send(&self, request: &Request) -> Result<Response, ClientError> {
        self.send_with_timeout(request, timeout_ipc()).await
    }

    /// Send a request and turn `Response::Error` into a `ClientError`,
    /// leaving callers to pattern-match only the responses they expect.
    pub async fn call(&self, request: &Request) -> Result<Response, ClientError> {
        match self.send(request).await? {
            Response::Error { status, message } => Err(ClientError::Rejected { status, message }),
            response => Ok(response),
        }
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
