use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{SessionStore, StoredToken};
use crate::errors::CommerceError;

/// Process-local session, lost on exit.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: RwLock<Option<StoredToken>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored entry, including an expired one.
    pub async fn stored(&self) -> Option<StoredToken> {
        self.inner.read().await.clone()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn set_token(&self, token: &str, expires_at: Option<DateTime<Utc>>) -> Result<(), CommerceError> {
        *self.inner.write().await = Some(StoredToken { token: token.to_string(), expires_at });
        Ok(())
    }

    async fn token(&self) -> Option<String> {
        let guard = self.inner.read().await;
        guard
            .as_ref()
            .filter(|t| !t.is_expired_at(Utc::now()))
            .map(|t| t.token.clone())
    }

    async fn clear(&self) -> Result<(), CommerceError> {
        *self.inner.write().await = None;
        Ok(())
    }
}
