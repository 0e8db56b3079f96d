//! UDP ingest loop and retention ticker (spec §4.4).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::rfc5424;
use crate::store::LogStore;

/// RFC 5425 §4.3.1 recommends this as a safe maximum datagram size.
const MAX_PACKET_SIZE: usize = 8192;

const RETENTION_TICK: Duration = Duration::from_secs(5);

/// Counters exposed for the malformed/rejected packet metrics spec §4.4
/// calls for ("metric incremented, no crash").
#[derive(Default)]
pub struct IngestMetrics {
    pub accepted: AtomicU64,
    pub malformed: AtomicU64,
}

/// Owns the ingest socket, the retention ticker, and the log store they
/// both act on.
pub struct LogCollector {
    pub store: Arc<LogStore>,
    pub metrics: Arc<IngestMetrics>,
}

impl LogCollector {
    pub fn new(store: Arc<LogStore>) -> Self {
        Self {
            store,
            metrics: Arc::new(IngestMetrics::default()),
        }
    }

    /// Bind the ingest socket and spawn the ingest and retention tasks.
    /// Returns once both have been spawned; they run until `token` is
    /// cancelled.
    pub async fn run(
        &self,
        bind_addr: &str,
        retention_horizon: impl Fn() -> String + Send + Sync + 'static,
        token: CancellationToken,
    ) -> std::io::Result<std::net::SocketAddr> {
        let socket = UdpSocket::bind(bind_addr).await?;
        let local_addr = socket.local_addr()?;
        let store = self.store.clone();
        let metrics = self.metrics.clone();
        let ingest_token = token.clone();
        tokio::spawn(async move {
            ingest_loop(socket, store, metrics, ingest_token).await;
        });

        let store = self.store.clone();
        tokio::spawn(async move {
            retention_loop(store, retention_horizon, token).await;
        });

        Ok(local_addr)
    }
}

async fn ingest_loop(
    socket: UdpSocket,
    store: Arc<LogStore>,
    metrics: Arc<IngestMetrics>,
    token: CancellationToken,
) {
    let mut buf = vec![0u8; MAX_PACKET_SIZE];
    loop {
        let received = tokio::select! {
            _ = token.cancelled() => break,
            result = socket.recv_from(&mut buf) => result,
        };
        let (len, _peer) = match received {
            Ok(pair) => pair,
            Err(err) => {
                warn!(error = %err, "log ingest socket read failed");
                continue;
            }
        };
        match rfc5424::parse(&buf[..len]) {
            Ok(record) => {
                metrics.accepted.fetch_add(1, Ordering::Relaxed);
                store.add_event(record.stream(), record.timestamp, record.message);
            }
            Err(err) => {
                metrics.malformed.fetch_add(1, Ordering::Relaxed);
                debug!(error = %err, "dropping malformed log packet");
            }
        }
    }
}

async fn retention_loop(
    store: Arc<LogStore>,
    horizon: impl Fn() -> String + Send + Sync,
    token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(RETENTION_TICK);
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {
                let removed = store.remove_old_events(&horizon());
                if removed > 0 {
                    debug!(removed, "pruned stale log events");
                }
                if let Err(err) = store.persist() {
                    warn!(error = %err, "failed to persist log store snapshot");
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "collector_tests.rs"]
mod tests;
