// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! exod's library half: lifecycle management, the socket listener, the
//! wire protocol it speaks with `exo`, and the secret-vault client. The
//! `exo` CLI links this crate directly to share the protocol types
//! rather than duplicating them.

pub mod env;
pub mod lifecycle;
pub mod listener;
pub mod protocol;
pub mod protocol_wire;
pub mod secrets;

pub use lifecycle::{startup, Config, Daemon, LifecycleError, StartupResult};
pub use listener::{ConnectionError, ListenCtx, Listener};
pub use protocol::{Request, Response};
pub use protocol_wire::{decode, encode, read_request, write_response, ProtocolError, DEFAULT_TIMEOUT, PROTOCOL_VERSION};
pub use secrets::{AccessToken, TokenExchange, VaultClient};
