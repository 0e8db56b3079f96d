// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! exo-logd: the log collector (spec §4.4) — an RFC 5424 datagram
//! ingest loop, a cursor-paginated event store, and a retention ticker.
//! Stream-name expansion from a component group to its member streams
//! (`":out"`/`":err"`) is the caller's (engine's) responsibility; this
//! crate treats stream names as opaque strings.

pub mod collector;
pub mod rfc5424;
pub mod store;

pub use collector::{IngestMetrics, LogCollector};
pub use rfc5424::{parse as parse_syslog, ParseError, Record as SyslogRecord};
pub use store::{EventsPage, LogStore, LogStoreError, StreamSummary};
