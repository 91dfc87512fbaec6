use std::{io::ErrorKind, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::{fs, sync::RwLock};
use tracing::{debug, warn};

use super::{SessionStore, StoredToken};
use crate::errors::CommerceError;

/// JSON file-backed session store.
///
/// Keeps the current token in memory and mirrors it to disk on every change so
/// a later process picks the session up again. Tokens without a remote expiry
/// get `ttl` from the time they are stored.
pub struct FileSessionStore {
    inner: RwLock<Option<StoredToken>>,
    file_path: PathBuf,
    ttl: Duration,
}

impl FileSessionStore {
    /// Load the session from `path`. A missing or unreadable file starts empty.
    pub async fn new<P: Into<PathBuf>>(path: P, ttl: Duration) -> Result<Arc<Self>, CommerceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| CommerceError::Session(e.to_string()))?;
        }

        let stored = match fs::read(&file_path).await {
            Ok(bytes) => match serde_json::from_slice::<StoredToken>(&bytes) {
                Ok(token) => Some(token),
                Err(e) => {
                    warn!(path = %file_path.display(), error = %e, "ignoring corrupt session file");
                    None
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(CommerceError::Session(e.to_string())),
        };

        Ok(Arc::new(Self { inner: RwLock::new(stored), file_path, ttl }))
    }

    async fn save(&self, token: &StoredToken) -> Result<(), CommerceError> {
        let data = serde_json::to_vec(token).map_err(|e| CommerceError::Session(e.to_string()))?;
        fs::write(&self.file_path, data)
            .await
            .map_err(|e| CommerceError::Session(e.to_string()))
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn set_token(&self, token: &str, expires_at: Option<DateTime<Utc>>) -> Result<(), CommerceError> {
        let expires_at = match expires_at {
            Some(at) => at,
            None => Utc::now()
                .checked_add_signed(self.ttl)
                .ok_or_else(|| CommerceError::Session("session ttl out of range".into()))?,
        };
        let stored = StoredToken { token: token.to_string(), expires_at: Some(expires_at) };
        let mut guard = self.inner.write().await;
        self.save(&stored).await?;
        *guard = Some(stored);
        debug!(path = %self.file_path.display(), "customer session persisted");
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
        let mut guard = self.inner.write().await;
        match fs::remove_file(&self.file_path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(CommerceError::Session(e.to_string())),
        }
        *guard = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("storefront-session-{}-{}", std::process::id(), name))
            .join("customer_token.json")
    }

    #[tokio::test]
    async fn token_survives_reload() {
        let path = temp_path("reload");
        let store = FileSessionStore::new(&path, Duration::days(30)).await.unwrap();
        store.set_token("tok123", None).await.unwrap();

        let reloaded = FileSessionStore::new(&path, Duration::days(30)).await.unwrap();
        assert_eq!(reloaded.token().await.as_deref(), Some("tok123"));

        reloaded.clear().await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn ttl_applies_when_remote_expiry_missing() {
        let path = temp_path("ttl");
        let store = FileSessionStore::new(&path, Duration::days(30)).await.unwrap();
        store.set_token("tok", None).await.unwrap();

        let raw: StoredToken = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        let expires_at = raw.expires_at.unwrap();
        assert!(expires_at > Utc::now() + Duration::days(29));
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn expired_session_reads_as_none() {
        let path = temp_path("expired");
        let store = FileSessionStore::new(&path, Duration::days(30)).await.unwrap();
        store.set_token("old", Some(Utc::now() - Duration::hours(1))).await.unwrap();

        assert_eq!(store.token().await, None);
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn corrupt_file_starts_empty() {
        let path = temp_path("corrupt");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"not json").unwrap();

        let store = FileSessionStore::new(&path, Duration::days(30)).await.unwrap();
        assert_eq!(store.token().await, None);
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn oversized_ttl_is_an_error_not_a_panic() {
        let path = temp_path("huge-ttl");
        let store = FileSessionStore::new(&path, Duration::days(100_000_000)).await.unwrap();

        let err = store.set_token("tok", None).await.unwrap_err();
        assert!(matches!(err, CommerceError::Session(_)));
        assert_eq!(store.token().await, None);
    }

    #[tokio::test]
    async fn unusable_parent_directory_is_reported() {
        let blocker = std::env::temp_dir().join(format!("storefront-session-{}-blocker", std::process::id()));
        std::fs::write(&blocker, b"file, not a dir").unwrap();

        let result = FileSessionStore::new(blocker.join("customer_token.json"), Duration::days(1)).await;
        assert!(matches!(result, Err(CommerceError::Session(_))));
        std::fs::remove_file(&blocker).unwrap();
    }

    #[tokio::test]
    async fn bare_file_name_needs_no_directory() {
        let name = format!("storefront-session-{}-bare.json", std::process::id());
        let store = FileSessionStore::new(name.as_str(), Duration::days(1)).await.unwrap();
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn clearing_an_empty_store_is_ok() {
        let store = FileSessionStore::new(temp_path("empty"), Duration::days(1)).await.unwrap();
        store.clear().await.unwrap();
    }
}
