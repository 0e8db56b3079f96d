// SPDX-License-Identifier: MIT

//! Daemon lifecycle management: configuration, startup, recovery.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use fs2::FileExt;
use thiserror::Error;
use tracing::info;

use exo_controllers::new_process_registry;
use exo_engine::Tracker;
use exo_logd::LogStore;
use exo_store::Store;

use crate::env;

/// Daemon configuration: every path the daemon touches, resolved once at
/// startup from `EXO_*` environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root var-directory (e.g. `~/.local/state/exo`).
    pub state_dir: PathBuf,
    /// Unix socket the RPC listener binds.
    pub socket_path: PathBuf,
    /// Lock/PID file preventing a second daemon instance.
    pub lock_path: PathBuf,
    /// Version marker, read by the CLI to detect a stale running daemon.
    pub version_path: PathBuf,
    /// Daemon log file.
    pub log_path: PathBuf,
    /// Component store directory (WAL + snapshot).
    pub store_dir: PathBuf,
    /// Log collector directory (event store).
    pub logs_dir: PathBuf,
    /// Secret-vault refresh token path.
    pub vault_token_path: PathBuf,
    /// UDP address the syslog ingest listener binds.
    pub syslog_addr: String,
    /// How long ingested events are retained before pruning.
    pub log_retention_secs: u64,
}

impl Config {
    /// Load configuration. One daemon serves every workspace for a user,
    /// so paths are fixed under the var-directory rather than per-project.
    pub fn load() -> Result<Self, LifecycleError> {
        let state_dir = env::state_dir()?;
        Ok(Self {
            socket_path: state_dir.join("daemon.sock"),
            lock_path: state_dir.join("daemon.pid"),
            version_path: state_dir.join("daemon.version"),
            log_path: state_dir.join("daemon.log"),
            store_dir: state_dir.join("store"),
            logs_dir: state_dir.join("logs"),
            vault_token_path: state_dir.join("vault-token.json"),
            syslog_addr: env::syslog_addr(),
            log_retention_secs: env::log_retention_secs(),
            state_dir,
        })
    }
}

/// Errors from daemon startup.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("cannot resolve a state directory: set EXO_STATE_DIR or HOME")]
    NoStateDir,

    #[error("another daemon instance holds the lock")]
    LockFailed(#[source] std::io::Error),

    #[error("cannot bind socket at {0}: {1}")]
    BindFailed(PathBuf, #[source] std::io::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Store(#[from] exo_core::ExoError),

    #[error(transparent)]
    LogStore(#[from] exo_logd::LogStoreError),
}

/// Everything the running daemon owns, assembled by [`startup`].
pub struct Daemon {
    pub config: Config,
    pub store: Arc<Store>,
    pub logs: Arc<LogStore>,
    pub registry: exo_controllers::ProcessRegistry,
    pub tracker: Tracker,
    pub start_time: std::time::Instant,
    // Held for the process lifetime to keep the exclusive lock; released
    // (and the lock with it) on drop.
    #[allow(dead_code)]
    lock_file: File,
}

/// Result of a successful [`startup`]: the assembled daemon plus the bound
/// socket, handed to `main` to spawn the listener task.
pub struct StartupResult {
    pub daemon: Daemon,
    pub socket: tokio::net::UnixListener,
}

/// Acquire the lock, open the store and log store, bind the socket.
/// Cleans up anything it created if a later step fails, except when the
/// failure is `LockFailed` — those files belong to the already-running
/// daemon.
pub async fn startup(config: Config) -> Result<StartupResult, LifecycleError> {
    match startup_inner(config.clone()).await {
        Ok(result) => Ok(result),
        Err(e) => {
            if !matches!(e, LifecycleError::LockFailed(_)) {
                cleanup_on_failure(&config);
            }
            Err(e)
        }
    }
}

async fn startup_inner(config: Config) -> Result<StartupResult, LifecycleError> {
    std::fs::create_dir_all(&config.state_dir)?;

    // Acquire the lock before touching anything else, to avoid racing a
    // second instance past the early directory creation.
    let lock_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&config.lock_path)?;
    lock_file.try_lock_exclusive().map_err(LifecycleError::LockFailed)?;

    use std::io::Write;
    let mut lock_file = lock_file;
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;
    let lock_file = lock_file;

    std::fs::write(&config.version_path, env!("CARGO_PKG_VERSION"))?;

    std::fs::create_dir_all(&config.store_dir)?;
    std::fs::create_dir_all(&config.logs_dir)?;

    let store = Arc::new(Store::open(&config.store_dir)?);
    let logs = Arc::new(LogStore::open(&config.logs_dir)?);
    info!(store_dir = %config.store_dir.display(), "component store opened");

    if config.socket_path.exists() {
        std::fs::remove_file(&config.socket_path)?;
    }
    let socket = tokio::net::UnixListener::bind(&config.socket_path)
        .map_err(|e| LifecycleError::BindFailed(config.socket_path.clone(), e))?;

    let daemon = Daemon {
        registry: new_process_registry(),
        tracker: Tracker::new(),
        start_time: std::time::Instant::now(),
        config,
        store,
        logs,
        lock_file,
    };

    Ok(StartupResult { daemon, socket })
}

fn cleanup_on_failure(config: &Config) {
    if config.socket_path.exists() {
        let _ = std::fs::remove_file(&config.socket_path);
    }
    if config.lock_path.exists() {
        let _ = std::fs::remove_file(&config.lock_path);
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
