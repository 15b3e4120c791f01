//! Token-refresh-aware request pipeline.
//!
//! Every outbound call flows through [`ApiClient::send`]: the current
//! access token is re-read from the credential store and attached as a
//! bearer credential, and an authorization rejection triggers at most one
//! refresh per failure episode regardless of how many concurrent callers
//! hit it. Callers arriving while a refresh is in flight park on a FIFO
//! waiter queue and are settled together when it resolves.

use std::sync::Arc;

use http::StatusCode;
use tokio::sync::{Mutex, oneshot};
use tracing::{debug, info, warn};

use medtrack_core::events::InvalidationReason;
use medtrack_core::{AppError, AppResult};
use medtrack_auth::credentials::CredentialStore;
use medtrack_auth::session::SessionManager;
use medtrack_entity::auth::{RefreshRequest, RefreshResponse};

use crate::transport::{ApiRequest, ApiResponse, Transport};

/// How a refresh episode settled, delivered to every parked waiter.
#[derive(Debug, Clone)]
enum RefreshOutcome {
    /// A new access token is in the store; replay once.
    Refreshed,
    /// The refresh failed for a reason other than rejection; each caller
    /// fails with its own original error.
    Failed,
    /// The refresh token itself was rejected; the session is gone.
    LoggedOut,
}

/// The single-flight gate. `None` waiters means no refresh in flight.
#[derive(Debug, Default)]
struct RefreshGate {
    /// FIFO queue of parked callers, present only while a refresh runs.
    waiters: Option<Vec<oneshot::Sender<RefreshOutcome>>>,
}

enum Ticket {
    /// This caller starts the refresh.
    Leader,
    /// A refresh is already in flight; await its outcome.
    Waiter(oneshot::Receiver<RefreshOutcome>),
}

/// The resilient request pipeline.
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    store: Arc<dyn CredentialStore>,
    session: Arc<SessionManager>,
    gate: Mutex<RefreshGate>,
}

impl ApiClient {
    /// Build the pipeline over a transport and session.
    pub fn new(transport: Arc<dyn Transport>, session: Arc<SessionManager>) -> Self {
        Self {
            transport,
            store: session.store(),
            session,
            gate: Mutex::new(RefreshGate::default()),
        }
    }

    /// The session manager this client reports to.
    pub fn session(&self) -> Arc<SessionManager> {
        Arc::clone(&self.session)
    }

    /// Send a request, transparently refreshing the access token when the
    /// server rejects it.
    ///
    /// `Ok` responses are always 2xx; every other status is mapped onto an
    /// [`AppError`]. Network failures propagate immediately with no
    /// refresh attempt.
    pub async fn send(&self, request: ApiRequest) -> AppResult<ApiResponse> {
        // Re-read the token on every attempt; never cache it across an
        // await boundary.
        let token = self.store.get().await?.credentials.access_token;
        let response = self.transport.execute(&request, token.as_deref()).await?;

        if response.status != StatusCode::UNAUTHORIZED || request.is_refresh || request.retried {
            return Self::into_result(response);
        }

        // Authorization rejected on a fresh, non-refresh request.
        let original_error = rejection_error(&response);
        match self.acquire().await {
            Ticket::Waiter(receiver) => {
                debug!(path = %request.path, "Refresh in flight; queueing request");
                let outcome = receiver
                    .await
                    .unwrap_or(RefreshOutcome::Failed);
                self.resolve(request, outcome, original_error).await
            }
            Ticket::Leader => {
                info!(path = %request.path, "Access token rejected; refreshing");
                let outcome = self.run_refresh().await;
                self.settle(&outcome).await;
                self.resolve(request, outcome, original_error).await
            }
        }
    }

    /// Take a ticket from the single-flight gate.
    async fn acquire(&self) -> Ticket {
        let mut gate = self.gate.lock().await;
        match gate.waiters.as_mut() {
            None => {
                gate.waiters = Some(Vec::new());
                Ticket::Leader
            }
            Some(waiters) => {
                let (tx, rx) = oneshot::channel();
                waiters.push(tx);
                Ticket::Waiter(rx)
            }
        }
    }

    /// Close the episode, delivering the outcome to waiters in FIFO order.
    async fn settle(&self, outcome: &RefreshOutcome) {
        let mut gate = self.gate.lock().await;
        if let Some(waiters) = gate.waiters.take() {
            for waiter in waiters {
                // A caller that dropped its future simply misses the wakeup.
                let _ = waiter.send(outcome.clone());
            }
        }
    }

    /// Perform the refresh call itself. Runs once per episode.
    async fn run_refresh(&self) -> RefreshOutcome {
        let stored = match self.store.get().await {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "Credential store read failed during refresh");
                return RefreshOutcome::Failed;
            }
        };

        let Some(refresh_token) = stored.credentials.refresh_token.clone() else {
            warn!("No refresh token available; forcing logout");
            if let Err(e) = self
                .session
                .invalidate(InvalidationReason::MissingRefreshToken)
                .await
            {
                warn!(error = %e, "Failed to clear credentials");
            }
            return RefreshOutcome::Failed;
        };

        let body = match serde_json::to_value(RefreshRequest { refresh_token }) {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "Failed to encode refresh request");
                return RefreshOutcome::Failed;
            }
        };
        let request = ApiRequest::post("/auth/refresh-token", body).refresh_call();

        let response = match self.transport.execute(&request, None).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Refresh call failed to reach the server");
                return RefreshOutcome::Failed;
            }
        };

        if response.status == StatusCode::UNAUTHORIZED {
            warn!("Refresh token rejected; forcing logout");
            if let Err(e) = self
                .session
                .invalidate(InvalidationReason::RefreshRejected)
                .await
            {
                warn!(error = %e, "Failed to clear credentials");
            }
            return RefreshOutcome::LoggedOut;
        }
        if !response.status.is_success() {
            warn!(status = %response.status, "Refresh call rejected");
            return RefreshOutcome::Failed;
        }

        let refreshed: RefreshResponse = match response.json() {
            Ok(refreshed) => refreshed,
            Err(e) => {
                warn!(error = %e, "Malformed refresh response");
                return RefreshOutcome::Failed;
            }
        };

        // Persist the new pair; the user record is untouched.
        let mut stored = stored;
        stored.credentials.access_token = Some(refreshed.access_token);
        if let Some(rotated) = refreshed.refresh_token {
            stored.credentials.refresh_token = Some(rotated);
        }
        if let Err(e) = self.store.set(&stored).await {
            warn!(error = %e, "Failed to persist refreshed tokens");
            return RefreshOutcome::Failed;
        }

        self.session.token_refreshed();
        info!("Access token refreshed");
        RefreshOutcome::Refreshed
    }

    /// Turn a settled episode into this caller's result.
    async fn resolve(
        &self,
        request: ApiRequest,
        outcome: RefreshOutcome,
        original_error: AppError,
    ) -> AppResult<ApiResponse> {
        match outcome {
            RefreshOutcome::Refreshed => {
                // Replay once; the new token is re-read from the store.
                Box::pin(self.send(request.into_retry())).await
            }
            RefreshOutcome::Failed => Err(original_error),
            RefreshOutcome::LoggedOut => Err(AppError::session_expired(
                "Session expired. Please log in again.",
            )),
        }
    }

    fn into_result(response: ApiResponse) -> AppResult<ApiResponse> {
        if response.status.is_success() {
            return Ok(response);
        }
        Err(match response.status {
            StatusCode::UNAUTHORIZED => rejection_error(&response),
            StatusCode::FORBIDDEN => AppError::permission_denied(
                response.message().unwrap_or("Permission denied").to_string(),
            ),
            status => AppError::api(format!(
                "{}: {}",
                status,
                response.message().unwrap_or("Request failed")
            )),
        })
    }
}

fn rejection_error(response: &ApiResponse) -> AppError {
    AppError::authorization_rejected(
        response
            .message()
            .unwrap_or("Authorization rejected")
            .to_string(),
    )
}
