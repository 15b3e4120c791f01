//! In-memory credential store for tests and ephemeral sessions.

use std::sync::RwLock;

use async_trait::async_trait;

use medtrack_core::{AppError, AppResult};

use super::store::{CredentialStore, StoredSession};

/// Credential store backed by process memory only.
///
/// Does not survive a process restart; used by tests and by hosts that
/// opt out of persistence.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    /// The current record.
    session: RwLock<StoredSession>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with a session.
    pub fn with_session(session: StoredSession) -> Self {
        Self {
            session: RwLock::new(session),
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self) -> AppResult<StoredSession> {
        let session = self
            .session
            .read()
            .map_err(|_| AppError::internal("Credential store lock poisoned"))?;
        Ok(session.clone())
    }

    async fn set(&self, session: &StoredSession) -> AppResult<()> {
        let mut slot = self
            .session
            .write()
            .map_err(|_| AppError::internal("Credential store lock poisoned"))?;
        *slot = session.clone();
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        let mut slot = self
            .session
            .write()
            .map_err(|_| AppError::internal("Credential store lock poisoned"))?;
        *slot = StoredSession::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medtrack_entity::auth::Credentials;

    #[tokio::test]
    async fn test_set_then_get_roundtrip() {
        let store = MemoryCredentialStore::new();
        assert!(!store.get().await.unwrap().has_access_token());

        let session = StoredSession {
            credentials: Credentials::new("acc", "ref"),
            user: None,
        };
        store.set(&session).await.unwrap();
        let read = store.get().await.unwrap();
        assert_eq!(read.credentials.access_token.as_deref(), Some("acc"));
        assert_eq!(read.credentials.refresh_token.as_deref(), Some("ref"));
    }

    #[tokio::test]
    async fn test_clear_empties_all_slots() {
        let store = MemoryCredentialStore::with_session(StoredSession {
            credentials: Credentials::new("acc", "ref"),
            user: None,
        });
        store.clear().await.unwrap();
        let read = store.get().await.unwrap();
        assert!(read.credentials.access_token.is_none());
        assert!(read.credentials.refresh_token.is_none());
        assert!(read.user.is_none());
    }
}
