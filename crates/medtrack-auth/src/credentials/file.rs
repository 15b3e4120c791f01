//! File-backed credential store.
//!
//! Persists the session record as a single JSON document so the three
//! slots (access token, refresh token, user) always change together.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::debug;

use medtrack_core::{AppError, AppResult};

use super::store::{CredentialStore, StoredSession};

/// Credential store that survives process restarts.
///
/// Keeps a write-through in-memory mirror so that reads after a `set` or
/// `clear` never observe stale disk state.
#[derive(Debug)]
pub struct FileCredentialStore {
    /// Path of the JSON document.
    path: PathBuf,
    /// Write-through mirror of the on-disk record.
    mirror: RwLock<StoredSession>,
}

impl FileCredentialStore {
    /// Open the store, reading any previously persisted session.
    ///
    /// A missing file is an empty session, not an error; a corrupt file is
    /// discarded (the user just has to log in again).
    pub async fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();
        let session = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(session) => session,
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "Discarding unreadable credential file");
                    StoredSession::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoredSession::default(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            mirror: RwLock::new(session),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, session: &StoredSession) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(session)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }

    fn update_mirror(&self, session: StoredSession) -> AppResult<()> {
        let mut mirror = self
            .mirror
            .write()
            .map_err(|_| AppError::internal("Credential store lock poisoned"))?;
        *mirror = session;
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn get(&self) -> AppResult<StoredSession> {
        let mirror = self
            .mirror
            .read()
            .map_err(|_| AppError::internal("Credential store lock poisoned"))?;
        Ok(mirror.clone())
    }

    async fn set(&self, session: &StoredSession) -> AppResult<()> {
        self.persist(session).await?;
        self.update_mirror(session.clone())
    }

    async fn clear(&self) -> AppResult<()> {
        let empty = StoredSession::default();
        self.persist(&empty).await?;
        self.update_mirror(empty)
    }
}
