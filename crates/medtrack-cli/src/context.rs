//! Shared wiring for CLI commands.

use std::sync::Arc;

use tokio::sync::broadcast;

use medtrack_auth::credentials::FileCredentialStore;
use medtrack_auth::guard::{RouteDecision, RouteGuard};
use medtrack_auth::session::SessionManager;
use medtrack_client::services::{AuthApi, MedicationApi, UserApi};
use medtrack_client::transport::HttpTransport;
use medtrack_client::ApiClient;
use medtrack_core::config::AppConfig;
use medtrack_core::events::{InvalidationReason, SessionEvent};
use medtrack_core::{AppError, AppResult};

use crate::output;

/// Everything a command needs: configuration, the session, the request
/// pipeline, and the typed API services sharing it.
pub struct AppContext {
    pub config: AppConfig,
    pub session: Arc<SessionManager>,
    pub guard: RouteGuard,
    pub auth: AuthApi,
    pub medications: MedicationApi,
    pub users: UserApi,
    events: broadcast::Receiver<SessionEvent>,
}

impl AppContext {
    /// Load configuration and assemble the client stack.
    pub async fn init(env: &str) -> AppResult<Self> {
        let config = AppConfig::load(env)?;

        let store = Arc::new(FileCredentialStore::open(&config.credentials.path).await?);
        let session = Arc::new(SessionManager::initialize(store).await?);
        let events = session.subscribe();

        let transport = Arc::new(HttpTransport::new(&config.api)?);
        let client = Arc::new(ApiClient::new(transport, Arc::clone(&session)));

        Ok(Self {
            config,
            guard: RouteGuard::new(Arc::clone(&session)),
            auth: AuthApi::new(Arc::clone(&client)),
            medications: MedicationApi::new(Arc::clone(&client)),
            users: UserApi::new(client),
            session,
            events,
        })
    }

    /// Gate a command behind the navigation rules for `path`.
    ///
    /// Persisted credentials are validated (and transparently refreshed)
    /// before the decision is made.
    pub async fn authorize(&self, path: &str) -> AppResult<()> {
        match self.guard.check(path, &self.auth).await? {
            RouteDecision::Allow => Ok(()),
            RouteDecision::Pending => Err(AppError::not_authenticated(
                "Another sign-in attempt is already in progress",
            )),
            RouteDecision::RedirectToLogin { from } => Err(AppError::not_authenticated(format!(
                "Please log in to access {from} (medtrack auth login)"
            ))),
            RouteDecision::RedirectToUnauthorized => Err(AppError::permission_denied(
                "Your role does not grant access to this command",
            )),
        }
    }

    /// Surface session lifecycle events that fired during the command.
    pub fn report_session_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                SessionEvent::Invalidated {
                    reason: InvalidationReason::RefreshRejected,
                } => output::print_warning("Session expired. Please log in again."),
                SessionEvent::Invalidated {
                    reason: InvalidationReason::MissingRefreshToken,
                } => output::print_warning("Stored session is incomplete; please log in again."),
                SessionEvent::TokenRefreshed => {
                    tracing::debug!("Access token was refreshed during this command");
                }
                SessionEvent::Authenticated { .. } | SessionEvent::LoggedOut => {}
            }
        }
    }
}
