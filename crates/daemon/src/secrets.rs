// SPDX-License-Identifier: MIT

//! Secret-vault client: exchanges a refresh token persisted on disk for a
//! short-lived access token, used to fetch workspace secrets from an
//! external vault. The device-code exchange itself lives behind
//! [`TokenExchange`] so the client is testable without a real vault
//! endpoint.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::debug;

use exo_core::{ExoError, Result};

/// A minted access token and when it stops being usable.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Abstracts the out-of-scope HTTP exchange with the vault's auth endpoint.
#[async_trait::async_trait]
pub trait TokenExchange: Send + Sync {
    async fn exchange(&self, refresh_token: &str) -> Result<AccessToken>;
}

struct TokenState {
    refresh_token: Option<String>,
    access_token: Option<AccessToken>,
}

/// Mutex-guards a refresh token persisted at `token_path` and a cached
/// access token refreshed on miss or expiry.
pub struct VaultClient {
    token_path: std::path::PathBuf,
    exchange: Box<dyn TokenExchange>,
    state: Mutex<TokenState>,
}

impl VaultClient {
    pub fn new(token_path: impl Into<std::path::PathBuf>, exchange: Box<dyn TokenExchange>) -> Self {
        Self { token_path: token_path.into(), exchange, state: Mutex::new(TokenState { refresh_token: None, access_token: None }) }
    }

    /// Persists a newly obtained refresh token and drops any cached access
    /// token, forcing the next `access_token` call to re-exchange.
    pub fn save_refresh_token(&self, refresh_token: &str) -> Result<()> {
        let mut state = self.state.lock();
        std::fs::write(&self.token_path, refresh_token).map_err(|e| ExoError::Transport(format!("writing vault token: {e}")))?;
        state.refresh_token = Some(refresh_token.to_string());
        state.access_token = None;
        Ok(())
    }

    /// Removes the on-disk token and clears cached credentials.
    pub fn unauthenticate(&self) -> Result<()> {
        let mut state = self.state.lock();
        match std::fs::remove_file(&self.token_path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(ExoError::Transport(format!("removing vault token: {e}"))),
        }
        state.refresh_token = None;
        state.access_token = None;
        Ok(())
    }

    /// Returns a usable access token, refreshing from the persisted refresh
    /// token if the cached one is missing or expired.
    pub async fn access_token(&self) -> Result<String> {
        let refresh_token = {
            let mut state = self.state.lock();
            if let Some(cached) = &state.access_token {
                if cached.expires_at > Utc::now() {
                    return Ok(cached.token.clone());
                }
            }
            let refresh_token = match &state.refresh_token {
                Some(token) => token.clone(),
                None => {
                    let contents = std::fs::read_to_string(&self.token_path).map_err(|e| {
                        if e.kind() == std::io::ErrorKind::NotFound {
                            ExoError::Auth("no vault token on disk, run the auth flow first".to_string())
                        } else {
                            ExoError::Transport(format!("reading vault token: {e}"))
                        }
                    })?;
                    let token = contents.trim().to_string();
                    state.refresh_token = Some(token.clone());
                    token
                }
            };
            refresh_token
        };

        let fresh = self.exchange.exchange(&refresh_token).await?;
        debug!(expires_at = %fresh.expires_at, "minted new vault access token");
        let token = fresh.token.clone();
        let mut state = self.state.lock();
        state.access_token = Some(fresh);
        Ok(token)
    }
}

#[cfg(test)]
#[path = "secrets_tests.rs"]
mod tests;
