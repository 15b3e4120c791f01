//! Session lifecycle manager.
//!
//! Owns the authentication state machine and the credential store writes
//! that accompany its transitions. Completion signals are epoch-guarded:
//! a response arriving after the state has moved on is ignored rather
//! than reapplied.

use std::sync::{Arc, RwLock};

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use medtrack_core::events::{InvalidationReason, SessionEvent};
use medtrack_core::{AppError, AppResult};
use medtrack_entity::auth::Credentials;
use medtrack_entity::user::User;

use crate::credentials::{CredentialStore, StoredSession};

use super::state::{Session, SessionStatus};

const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Handle for an in-flight authentication or validation round-trip.
///
/// Completion methods take the attempt back; one issued before the state
/// last moved is stale and its completion is a no-op.
#[derive(Debug, Clone, Copy)]
pub struct AuthAttempt {
    epoch: u64,
}

/// Result of a token validation round-trip.
#[derive(Debug)]
pub enum ValidationOutcome {
    /// The token was accepted and a user record returned.
    Valid(User),
    /// The token was rejected (HTTP 401); refresh may still recover it.
    Unauthorized,
    /// The validation failed for any other reason.
    Failed,
}

#[derive(Debug)]
struct Inner {
    status: SessionStatus,
    user: Option<User>,
    validating: bool,
    epoch: u64,
}

/// Tracks the authentication lifecycle and exposes the current session.
///
/// An injectable context object rather than a process-wide singleton, so
/// tests can run isolated instances side by side.
pub struct SessionManager {
    store: Arc<dyn CredentialStore>,
    inner: RwLock<Inner>,
    events: broadcast::Sender<SessionEvent>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("session", &self.snapshot())
            .finish()
    }
}

impl SessionManager {
    /// Create a manager by reading any persisted credentials.
    ///
    /// When a token and user are present the state initializes to
    /// `Authenticated` optimistically; the first protected-route access
    /// triggers a validation round-trip that may demote it.
    pub async fn initialize(store: Arc<dyn CredentialStore>) -> AppResult<Self> {
        let persisted = store.get().await?;
        let (status, user) = match (persisted.has_access_token(), persisted.user) {
            (true, Some(user)) => {
                debug!(user_id = %user.id, "Restored persisted session optimistically");
                (SessionStatus::Authenticated, Some(user))
            }
            _ => (SessionStatus::Anonymous, None),
        };

        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Ok(Self {
            store,
            inner: RwLock::new(Inner {
                status,
                user,
                validating: false,
                epoch: 0,
            }),
            events,
        })
    }

    /// The credential store this manager writes through.
    pub fn store(&self) -> Arc<dyn CredentialStore> {
        Arc::clone(&self.store)
    }

    /// Subscribe to session lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// A derived view of the current session.
    pub fn snapshot(&self) -> Session {
        let inner = self.read();
        Session {
            user: inner.user.clone(),
            is_authenticated: inner.status == SessionStatus::Authenticated,
            status: inner.status,
        }
    }

    /// Whether a validation round-trip is currently in flight.
    pub fn is_validating(&self) -> bool {
        self.read().validating
    }

    /// Whether the store holds an access token (authenticated or not).
    pub async fn has_persisted_credentials(&self) -> AppResult<bool> {
        Ok(self.store.get().await?.has_access_token())
    }

    /// Begin a login or register round-trip.
    pub fn begin_authentication(&self) -> AuthAttempt {
        let mut inner = self.write();
        inner.status = SessionStatus::Authenticating;
        inner.user = None;
        inner.epoch += 1;
        AuthAttempt { epoch: inner.epoch }
    }

    /// Complete a login/register round-trip successfully.
    ///
    /// Persists the credentials and user together, then moves to
    /// `Authenticated`. Returns `false` (and changes nothing) when the
    /// attempt is stale.
    pub async fn complete_authentication(
        &self,
        attempt: AuthAttempt,
        user: User,
        credentials: Credentials,
    ) -> AppResult<bool> {
        if !credentials.has_access_token() {
            return Err(AppError::internal(
                "Refusing to authenticate a user without an access token",
            ));
        }
        if self.is_stale(attempt) {
            debug!("Ignoring late authentication success from a superseded request");
            return Ok(false);
        }

        self.store
            .set(&StoredSession::new(credentials, user.clone()))
            .await?;

        {
            let mut inner = self.write();
            inner.status = SessionStatus::Authenticated;
            inner.user = Some(user.clone());
            inner.epoch += 1;
        }
        info!(user_id = %user.id, "Session authenticated");
        self.emit(SessionEvent::Authenticated { user_id: user.id });
        Ok(true)
    }

    /// Record a failed login/register round-trip. No state is retained;
    /// the error is surfaced by the caller.
    pub fn fail_authentication(&self, attempt: AuthAttempt) {
        if self.is_stale(attempt) {
            debug!("Ignoring late authentication failure from a superseded request");
            return;
        }
        let mut inner = self.write();
        inner.status = SessionStatus::Anonymous;
        inner.user = None;
        inner.epoch += 1;
    }

    /// Begin a logout round-trip.
    pub fn begin_logout(&self) -> AuthAttempt {
        let mut inner = self.write();
        inner.status = SessionStatus::Authenticating;
        inner.epoch += 1;
        AuthAttempt { epoch: inner.epoch }
    }

    /// Finish a logout, clearing local state unconditionally.
    ///
    /// Called whether or not the remote logout call succeeded.
    pub async fn finish_logout(&self) -> AppResult<()> {
        self.store.clear().await?;
        {
            let mut inner = self.write();
            inner.status = SessionStatus::Anonymous;
            inner.user = None;
            inner.epoch += 1;
        }
        info!("Session logged out");
        self.emit(SessionEvent::LoggedOut);
        Ok(())
    }

    /// Begin a token validation round-trip. Does not change the status;
    /// the guard renders a waiting indicator off [`Self::is_validating`].
    pub fn begin_validation(&self) -> AuthAttempt {
        let mut inner = self.write();
        inner.validating = true;
        AuthAttempt { epoch: inner.epoch }
    }

    /// Apply the result of a validation round-trip.
    ///
    /// Stale attempts (the state moved on while the round-trip was in
    /// flight) are ignored.
    pub fn complete_validation(&self, attempt: AuthAttempt, outcome: ValidationOutcome) {
        let mut inner = self.write();
        inner.validating = false;
        if inner.epoch != attempt.epoch {
            debug!("Ignoring late validation result from a superseded request");
            return;
        }
        match outcome {
            ValidationOutcome::Valid(user) => {
                debug!(user_id = %user.id, "Token validated");
                inner.status = SessionStatus::Authenticated;
                inner.user = Some(user);
            }
            ValidationOutcome::Unauthorized => {
                // Left for the request pipeline to resolve via refresh;
                // credentials are not cleared here.
                warn!("Access token rejected during validation");
                inner.status = SessionStatus::Expired;
            }
            ValidationOutcome::Failed => {
                inner.status = SessionStatus::Anonymous;
                inner.user = None;
            }
        }
        inner.epoch += 1;
    }

    /// Record that the pipeline refreshed the access token transparently.
    pub fn token_refreshed(&self) {
        let mut inner = self.write();
        if inner.status == SessionStatus::Expired {
            inner.status = SessionStatus::Authenticated;
        }
        drop(inner);
        self.emit(SessionEvent::TokenRefreshed);
    }

    /// Hard logout: clear all credentials and broadcast the invalidation.
    ///
    /// The host application subscribes to [`SessionEvent::Invalidated`]
    /// and performs its own navigation to the login view.
    pub async fn invalidate(&self, reason: InvalidationReason) -> AppResult<()> {
        self.store.clear().await?;
        {
            let mut inner = self.write();
            inner.status = SessionStatus::Anonymous;
            inner.user = None;
            inner.epoch += 1;
        }
        warn!(?reason, "Session invalidated");
        self.emit(SessionEvent::Invalidated { reason });
        Ok(())
    }

    fn is_stale(&self, attempt: AuthAttempt) -> bool {
        self.read().epoch != attempt.epoch
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine; events are advisory.
        let _ = self.events.send(event);
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::MemoryCredentialStore;
    use medtrack_entity::user::Role;

    fn user(id: &str, role: Role) -> User {
        User {
            id: id.to_string(),
            name: "Test".to_string(),
            email: format!("{id}@example.com"),
            role,
            is_active: true,
        }
    }

    async fn anonymous_manager() -> SessionManager {
        SessionManager::initialize(Arc::new(MemoryCredentialStore::new()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_initializes_anonymous_without_credentials() {
        let manager = anonymous_manager().await;
        let session = manager.snapshot();
        assert_eq!(session.status, SessionStatus::Anonymous);
        assert!(!session.is_authenticated);
        assert!(session.user.is_none());
    }

    #[tokio::test]
    async fn test_initializes_authenticated_optimistically() {
        let store = Arc::new(MemoryCredentialStore::with_session(StoredSession::new(
            Credentials::new("acc", "ref"),
            user("u1", Role::Patient),
        )));
        let manager = SessionManager::initialize(store).await.unwrap();
        let session = manager.snapshot();
        assert_eq!(session.status, SessionStatus::Authenticated);
        assert!(session.is_authenticated);
    }

    #[tokio::test]
    async fn test_login_success_persists_user_and_tokens() {
        let manager = anonymous_manager().await;
        let attempt = manager.begin_authentication();
        assert_eq!(manager.snapshot().status, SessionStatus::Authenticating);

        let applied = manager
            .complete_authentication(attempt, user("u1", Role::Doctor), Credentials::new("a", "r"))
            .await
            .unwrap();
        assert!(applied);
        assert!(manager.snapshot().is_authenticated);

        let persisted = manager.store().get().await.unwrap();
        assert_eq!(persisted.credentials.access_token.as_deref(), Some("a"));
        assert_eq!(persisted.user.unwrap().id, "u1");
    }

    #[tokio::test]
    async fn test_login_failure_returns_to_anonymous() {
        let manager = anonymous_manager().await;
        let attempt = manager.begin_authentication();
        manager.fail_authentication(attempt);
        assert_eq!(manager.snapshot().status, SessionStatus::Anonymous);
    }

    #[tokio::test]
    async fn test_late_completion_from_superseded_attempt_is_ignored() {
        let manager = anonymous_manager().await;
        let stale = manager.begin_authentication();
        let current = manager.begin_authentication();

        let applied = manager
            .complete_authentication(stale, user("old", Role::Patient), Credentials::new("a", "r"))
            .await
            .unwrap();
        assert!(!applied);
        assert_eq!(manager.snapshot().status, SessionStatus::Authenticating);

        manager
            .complete_authentication(current, user("new", Role::Nurse), Credentials::new("a", "r"))
            .await
            .unwrap();
        assert_eq!(manager.snapshot().user.unwrap().id, "new");
    }

    #[tokio::test]
    async fn test_authentication_requires_access_token() {
        let manager = anonymous_manager().await;
        let attempt = manager.begin_authentication();
        let result = manager
            .complete_authentication(attempt, user("u1", Role::Patient), Credentials::default())
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_logout_clears_local_state_unconditionally() {
        let store = Arc::new(MemoryCredentialStore::with_session(StoredSession::new(
            Credentials::new("acc", "ref"),
            user("u1", Role::Patient),
        )));
        let manager = SessionManager::initialize(store).await.unwrap();
        let mut events = manager.subscribe();

        manager.begin_logout();
        manager.finish_logout().await.unwrap();

        assert_eq!(manager.snapshot().status, SessionStatus::Anonymous);
        assert!(!manager.store().get().await.unwrap().has_access_token());
        assert!(matches!(events.try_recv(), Ok(SessionEvent::LoggedOut)));
    }

    #[tokio::test]
    async fn test_validation_unauthorized_moves_to_expired_without_clearing() {
        let store = Arc::new(MemoryCredentialStore::with_session(StoredSession::new(
            Credentials::new("acc", "ref"),
            user("u1", Role::Patient),
        )));
        let manager = SessionManager::initialize(store).await.unwrap();

        let attempt = manager.begin_validation();
        manager.complete_validation(attempt, ValidationOutcome::Unauthorized);

        assert_eq!(manager.snapshot().status, SessionStatus::Expired);
        // Credentials are left for the pipeline's refresh path.
        assert!(manager.store().get().await.unwrap().has_access_token());
    }

    #[tokio::test]
    async fn test_validation_failure_moves_to_anonymous() {
        let store = Arc::new(MemoryCredentialStore::with_session(StoredSession::new(
            Credentials::new("acc", "ref"),
            user("u1", Role::Patient),
        )));
        let manager = SessionManager::initialize(store).await.unwrap();

        let attempt = manager.begin_validation();
        manager.complete_validation(attempt, ValidationOutcome::Failed);
        assert_eq!(manager.snapshot().status, SessionStatus::Anonymous);
    }

    #[tokio::test]
    async fn test_late_validation_after_logout_is_ignored() {
        let store = Arc::new(MemoryCredentialStore::with_session(StoredSession::new(
            Credentials::new("acc", "ref"),
            user("u1", Role::Patient),
        )));
        let manager = SessionManager::initialize(store).await.unwrap();

        let attempt = manager.begin_validation();
        manager.finish_logout().await.unwrap();
        manager.complete_validation(attempt, ValidationOutcome::Valid(user("u1", Role::Patient)));

        assert_eq!(manager.snapshot().status, SessionStatus::Anonymous);
        assert!(manager.snapshot().user.is_none());
    }

    #[tokio::test]
    async fn test_token_refreshed_recovers_expired_session() {
        let store = Arc::new(MemoryCredentialStore::with_session(StoredSession::new(
            Credentials::new("acc", "ref"),
            user("u1", Role::Patient),
        )));
        let manager = SessionManager::initialize(store).await.unwrap();
        let attempt = manager.begin_validation();
        manager.complete_validation(attempt, ValidationOutcome::Unauthorized);
        assert_eq!(manager.snapshot().status, SessionStatus::Expired);

        manager.token_refreshed();
        assert!(manager.snapshot().is_authenticated);
    }

    #[tokio::test]
    async fn test_invalidate_clears_and_broadcasts() {
        let store = Arc::new(MemoryCredentialStore::with_session(StoredSession::new(
            Credentials::new("acc", "ref"),
            user("u1", Role::Patient),
        )));
        let manager = SessionManager::initialize(store).await.unwrap();
        let mut events = manager.subscribe();

        manager
            .invalidate(InvalidationReason::RefreshRejected)
            .await
            .unwrap();

        assert_eq!(manager.snapshot().status, SessionStatus::Anonymous);
        assert!(!manager.store().get().await.unwrap().has_access_token());
        assert!(matches!(
            events.try_recv(),
            Ok(SessionEvent::Invalidated {
                reason: InvalidationReason::RefreshRejected
            })
        ));
    }
}
