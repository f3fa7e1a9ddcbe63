//! Session state for the data-access client.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use std::sync::Arc;
use tokio::sync::{watch, RwLock};

use super::error::{ApiError, ApiResult};
use crate::routes::auth::SessionUser;

/// Holds the bearer token for one client session. Clones share the same
/// session; separate `AuthContext::new()` values never do.
#[derive(Debug, Clone)]
pub struct AuthContext {
    token: Arc<RwLock<Option<String>>>,
    changes: Arc<watch::Sender<Option<SessionUser>>>,
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthContext {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            token: Arc::new(RwLock::new(None)),
            changes: Arc::new(tx),
        }
    }

    /// Start from a previously issued token.
    pub fn with_token(token: impl Into<String>) -> Self {
        let token = token.into();
        let (tx, _rx) = watch::channel(decode_session(&token).ok());
        Self {
            token: Arc::new(RwLock::new(Some(token))),
            changes: Arc::new(tx),
        }
    }

    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub async fn set_token(&self, token: String) {
        let session = decode_session(&token).ok();
        *self.token.write().await = Some(token);
        self.changes.send_replace(session);
    }

    pub async fn clear(&self) {
        let had_token = self.token.write().await.take().is_some();
        if had_token {
            self.changes.send_replace(None);
        }
    }

    /// The session carried by the stored token. A token that cannot be
    /// decoded is dropped.
    pub async fn session(&self) -> Option<SessionUser> {
        let token = self.token().await?;
        match decode_session(&token) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::debug!(error = %e, "discarding undecodable token");
                self.clear().await;
                None
            }
        }
    }

    /// Receiver that observes every sign-in and sign-out.
    pub fn subscribe(&self) -> watch::Receiver<Option<SessionUser>> {
        self.changes.subscribe()
    }
}

/// Read `{id, email}` from a JWT payload. The signature is not checked;
/// only the server can do that.
pub fn decode_session(token: &str) -> ApiResult<SessionUser> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| ApiError::Decode("token has no payload segment".to_string()))?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| ApiError::Decode(format!("token payload: {e}")))?;
    Ok(serde_json::from_slice(&bytes)?)
}
