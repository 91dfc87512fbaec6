//! Customer session token storage.
//!
//! The login flow only ever hands a token over; reading and clearing belong to
//! whoever owns the session (revalidation, logout).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::CommerceError;

pub mod file;
pub mod memory;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;

/// A persisted customer access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    pub token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl StoredToken {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist `token`, replacing any previous one.
    async fn set_token(&self, token: &str, expires_at: Option<DateTime<Utc>>) -> Result<(), CommerceError>;
    /// Current token, or `None` when unset or expired.
    async fn token(&self) -> Option<String>;
    async fn clear(&self) -> Result<(), CommerceError>;
}
