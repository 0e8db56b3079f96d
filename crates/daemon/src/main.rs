// SPDX-License-Identifier: MIT

//! exod: background daemon that owns the component store and the log
//! collector, and answers `exo`'s requests over a Unix socket.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use std::sync::Arc;

use chrono::Duration as ChronoDuration;
use tokio::signal::unix::{signal, SignalKind};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use exo_daemon::lifecycle::{self, Config, LifecycleError, StartupResult};
use exo_daemon::listener::{ListenCtx, Listener};
use exo_logd::LogCollector;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" | "-v" => {
                println!("exod {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("exod {}", env!("CARGO_PKG_VERSION"));
                println!("Local workload orchestrator daemon");
                println!();
                println!("USAGE:");
                println!("    exod");
                println!();
                println!("exod is typically started by the `exo` CLI and should not be");
                println!("invoked directly. It listens on a Unix socket for commands from `exo`.");
                println!();
                println!("OPTIONS:");
                println!("    -h, --help       Print help information");
                println!("    -v, --version    Print version information");
                return Ok(());
            }
            _ => {
                eprintln!("error: unexpected argument '{arg}'");
                eprintln!("Usage: exod [--help | --version]");
                std::process::exit(1);
            }
        }
    }

    let config = Config::load()?;

    rotate_log_if_needed(&config.log_path);
    write_startup_marker(&config)?;
    let log_guard = setup_logging(&config)?;

    info!("starting exod");

    let StartupResult { daemon, socket } = match lifecycle::startup(config.clone()).await {
        Ok(r) => r,
        Err(LifecycleError::LockFailed(_)) => {
            let pid = std::fs::read_to_string(&config.lock_path).unwrap_or_default().trim().to_string();
            let version = std::fs::read_to_string(&config.version_path).unwrap_or_default().trim().to_string();

            eprintln!("exod is already running");
            if !pid.is_empty() {
                eprintln!("  pid: {pid}");
            }
            if !version.is_empty() {
                let current_version = env!("CARGO_PKG_VERSION");
                if version == current_version {
                    eprintln!("  version: {version}");
                } else {
                    eprintln!("  version: {version} (outdated — current: {current_version})");
                }
            }
            std::process::exit(1);
        }
        Err(e) => {
            write_startup_error(&config, &e);
            error!("failed to start exod: {e}");
            drop(log_guard);
            return Err(e.into());
        }
    };

    let shutdown = CancellationToken::new();

    let ctx = Arc::new(ListenCtx {
        store: Arc::clone(&daemon.store),
        logs: Arc::clone(&daemon.logs),
        registry: daemon.registry.clone(),
        tracker: daemon.tracker.clone(),
    });
    tokio::spawn(Listener::new(socket, ctx).run());

    let retention_secs = daemon.config.log_retention_secs;
    let retention_horizon = move || (chrono::Utc::now() - ChronoDuration::seconds(retention_secs as i64)).to_rfc3339_opts(chrono::SecondsFormat::Micros, true);
    let collector = LogCollector::new(Arc::clone(&daemon.logs));
    let bind_addr = daemon.config.syslog_addr.clone();
    let collector_token = shutdown.clone();
    let local_addr = collector.run(&bind_addr, retention_horizon, collector_token).await?;
    info!(addr = %local_addr, "log collector listening");

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    info!(socket = %daemon.config.socket_path.display(), "exod ready");
    println!("READY");

    tokio::select! {
        _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
        _ = sigint.recv() => info!("received SIGINT, shutting down"),
    }
    shutdown.cancel();

    info!("exod stopped");
    Ok(())
}

const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024;
const MAX_ROTATED_LOGS: u32 = 3;

/// Rotates `daemon.log` to `.1`/`.2`/`.3` once it exceeds [`MAX_LOG_SIZE`],
/// dropping the oldest. Best-effort: failures don't block startup.
fn rotate_log_if_needed(log_path: &std::path::Path) {
    let size = match std::fs::metadata(log_path) {
        Ok(m) => m.len(),
        Err(_) => return,
    };
    if size < MAX_LOG_SIZE {
        return;
    }

    let log_str = log_path.display().to_string();
    for i in (1..MAX_ROTATED_LOGS).rev() {
        let from = format!("{log_str}.{i}");
        let to = format!("{log_str}.{}", i + 1);
        let _ = std::fs::rename(&from, &to);
    }
    let _ = std::fs::rename(log_path, format!("{log_str}.1"));
}

const STARTUP_MARKER_PREFIX: &str = "--- exod: starting (pid: ";

fn write_startup_marker(config: &Config) -> Result<(), LifecycleError> {
    use std::io::Write;
    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::OpenOptions::new().create(true).append(true).open(&config.log_path)?;
    writeln!(file, "{}{}) ---\n", STARTUP_MARKER_PREFIX, std::process::id())?;
    Ok(())
}

fn write_startup_error(config: &Config, error: &LifecycleError) {
    use std::io::Write;
    let Ok(mut file) = std::fs::OpenOptions::new().create(true).append(true).open(&config.log_path) else {
        return;
    };
    let _ = writeln!(file, "ERROR failed to start exod: {error}");
}

fn setup_logging(config: &Config) -> Result<tracing_appender::non_blocking::WorkerGuard, LifecycleError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file_appender = tracing_appender::rolling::never(
        config.log_path.parent().ok_or(LifecycleError::NoStateDir)?,
        config.log_path.file_name().ok_or(LifecycleError::NoStateDir)?,
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry().with(filter).with(fmt::layer().with_writer(non_blocking)).init();

    Ok(guard)
}
