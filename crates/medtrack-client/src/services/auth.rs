//! Login, registration, logout and token validation.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use medtrack_auth::guard::SessionValidator;
use medtrack_auth::session::{SessionManager, ValidationOutcome};
use medtrack_core::AppResult;
use medtrack_entity::auth::{
    AuthResponse, Credentials, LoginRequest, ProfileResponse, RegisterRequest,
};
use medtrack_entity::user::User;

use crate::pipeline::ApiClient;
use crate::transport::ApiRequest;

/// Auth endpoints, wired to drive the session state machine.
pub struct AuthApi {
    client: Arc<ApiClient>,
    session: Arc<SessionManager>,
}

impl AuthApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        let session = client.session();
        Self { client, session }
    }

    /// Log in with email and password.
    pub async fn login(&self, request: &LoginRequest) -> AppResult<User> {
        let attempt = self.session.begin_authentication();
        let body = serde_json::to_value(request)?;
        let auth: AuthResponse = match self
            .client
            .send(ApiRequest::post("/auth/login", body))
            .await
            .and_then(|response| response.json())
        {
            Ok(auth) => auth,
            Err(e) => {
                self.session.fail_authentication(attempt);
                return Err(e);
            }
        };

        let credentials = Credentials::new(auth.access_token, auth.refresh_token);
        self.session
            .complete_authentication(attempt, auth.user.clone(), credentials)
            .await?;
        Ok(auth.user)
    }

    /// Register a new account and sign in with the issued tokens.
    pub async fn register(&self, request: &RegisterRequest) -> AppResult<User> {
        let attempt = self.session.begin_authentication();
        let body = serde_json::to_value(request)?;
        let auth: AuthResponse = match self
            .client
            .send(ApiRequest::post("/auth/register", body))
            .await
            .and_then(|response| response.json())
        {
            Ok(auth) => auth,
            Err(e) => {
                self.session.fail_authentication(attempt);
                return Err(e);
            }
        };

        let credentials = Credentials::new(auth.access_token, auth.refresh_token);
        self.session
            .complete_authentication(attempt, auth.user.clone(), credentials)
            .await?;
        Ok(auth.user)
    }

    /// Log out: the remote call is best-effort, local state is always
    /// cleared.
    pub async fn logout(&self) -> AppResult<()> {
        self.session.begin_logout();
        if let Err(e) = self
            .client
            .send(ApiRequest::post("/auth/logout", serde_json::Value::Null))
            .await
        {
            warn!(error = %e, "Remote logout failed; clearing local session anyway");
        }
        self.session.finish_logout().await
    }

    /// Fetch the profile the current access token belongs to.
    pub async fn profile(&self) -> AppResult<User> {
        let response = self.client.send(ApiRequest::get("/auth/profile")).await?;
        let profile: ProfileResponse = response.json()?;
        Ok(profile.user)
    }

    /// Validate persisted credentials against the server and reconcile the
    /// session accordingly.
    pub async fn validate_session(&self) -> AppResult<Option<User>> {
        let attempt = self.session.begin_validation();
        match self.profile().await {
            Ok(user) => {
                self.session
                    .complete_validation(attempt, ValidationOutcome::Valid(user.clone()));
                Ok(Some(user))
            }
            Err(e) if e.is_authorization_rejected() => {
                self.session
                    .complete_validation(attempt, ValidationOutcome::Unauthorized);
                Ok(None)
            }
            Err(e) => {
                debug!(error = %e, "Session validation failed");
                self.session
                    .complete_validation(attempt, ValidationOutcome::Failed);
                Err(e)
            }
        }
    }
}

#[async_trait]
impl SessionValidator for AuthApi {
    async fn validate(&self) -> AppResult<User> {
        self.profile().await
    }
}
