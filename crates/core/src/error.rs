//! The shared error taxonomy (spec §7).
//!
//! Every layer wraps the cause with its own context (`"<layer>: <cause>"`)
//! and lets it propagate unchanged to the RPC boundary, which maps an
//! [`ExoError`] to an HTTP-style status code via [`ExoError::status`].

use thiserror::Error;

/// A layer-tagged error, carrying enough information for the RPC boundary
/// to pick a status code without re-inspecting the cause chain.
#[derive(Debug, Error)]
pub enum ExoError {
    /// Bad name, unknown component type, unresolvable ref.
    #[error("validation: {0}")]
    Validation(String),

    /// Resolution succeeded to a nonexistent id, no such log stream.
    #[error("not found: {0}")]
    NotFound(String),

    /// Name collision, destroy-with-children.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A controller operation failed. The message is surfaced verbatim;
    /// state is still persisted by the bracketed dispatcher regardless.
    #[error("provider error: {0}")]
    Provider(String),

    /// Store I/O error, log-collector socket error.
    #[error("transport error: {0}")]
    Transport(String),

    /// Vault token missing or rejected.
    #[error("auth error: {0}")]
    Auth(String),
}

impl ExoError {
    /// HTTP-style status code for the RPC boundary (spec §6/§7).
    pub fn status(&self) -> u16 {
        match self {
            ExoError::Validation(_) => 400,
            ExoError::NotFound(_) => 404,
            ExoError::Conflict(_) => 409,
            ExoError::Provider(_) => 500,
            ExoError::Transport(_) => 500,
            ExoError::Auth(_) => 401,
        }
    }

    /// Wrap this error with a layer tag, e.g. `"store: name taken"`.
    pub fn with_layer(self, layer: &str) -> Self {
        let msg = self.to_string();
        let wrapped = format!("{layer}: {msg}");
        match self {
            ExoError::Validation(_) => ExoError::Validation(wrapped),
            ExoError::NotFound(_) => ExoError::NotFound(wrapped),
            ExoError::Conflict(_) => ExoError::Conflict(wrapped),
            ExoError::Provider(_) => ExoError::Provider(wrapped),
            ExoError::Transport(_) => ExoError::Transport(wrapped),
            ExoError::Auth(_) => ExoError::Auth(wrapped),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExoError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
