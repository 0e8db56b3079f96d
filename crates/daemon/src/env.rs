// SPDX-License-Identifier: MIT

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;

use crate::lifecycle::LifecycleError;

/// Resolve the var directory: `EXO_STATE_DIR` > `XDG_STATE_HOME/exo` >
/// `~/.local/state/exo`.
pub fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("EXO_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("exo"));
    }
    let home = std::env::var("HOME").map_err(|_| LifecycleError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/exo"))
}

/// UDP address the syslog ingest listener binds, override via
/// `EXO_SYSLOG_ADDR`.
pub fn syslog_addr() -> String {
    std::env::var("EXO_SYSLOG_ADDR").unwrap_or_else(|_| "127.0.0.1:20514".to_string())
}

/// How long retained log events are kept before the collector's retention
/// ticker prunes them, override via `EXO_LOG_RETENTION_SECS`.
pub fn log_retention_secs() -> u64 {
    std::env::var("EXO_LOG_RETENTION_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(7 * 24 * 3600)
}
