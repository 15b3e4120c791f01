//! Shared test harness: an in-memory transport with a programmable
//! refresh endpoint.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use http::StatusCode;
use serde_json::{Value, json};
use tokio::sync::Notify;

use medtrack_auth::credentials::{CredentialStore, MemoryCredentialStore, StoredSession};
use medtrack_auth::session::SessionManager;
use medtrack_client::{ApiClient, ApiRequest, ApiResponse, Transport};
use medtrack_core::{AppError, AppResult};
use medtrack_entity::auth::Credentials;
use medtrack_entity::user::{Role, User};

/// How the fake server answers the refresh endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshBehavior {
    /// Issue a new token pair.
    Rotate,
    /// Reject the refresh token with 401.
    Reject,
    /// Fail with a server error.
    ServerError,
    /// Issue a token the resource endpoints will not accept.
    RotateStale,
    /// Simulate a network failure (no response at all).
    Unreachable,
}

/// Fake transport: accepts exactly one bearer token at a time and
/// records every request it sees.
pub struct MockTransport {
    valid_token: Mutex<String>,
    refresh_behavior: Mutex<RefreshBehavior>,
    /// When set, the refresh endpoint parks until notified.
    refresh_gate: Mutex<Option<Arc<Notify>>>,
    refresh_count: AtomicUsize,
    offline: Mutex<bool>,
    calls: Mutex<Vec<RecordedCall>>,
    /// Canned responses per path; anything else gets `200 {"ok": true}`.
    responses: Mutex<Vec<(String, StatusCode, Value)>>,
}

/// One request as the fake server saw it.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub path: String,
    pub bearer: Option<String>,
}

impl MockTransport {
    pub fn new(valid_token: &str) -> Arc<Self> {
        Arc::new(Self {
            valid_token: Mutex::new(valid_token.to_string()),
            refresh_behavior: Mutex::new(RefreshBehavior::Rotate),
            refresh_gate: Mutex::new(None),
            refresh_count: AtomicUsize::new(0),
            offline: Mutex::new(false),
            calls: Mutex::new(Vec::new()),
            responses: Mutex::new(Vec::new()),
        })
    }

    pub fn set_refresh_behavior(&self, behavior: RefreshBehavior) {
        *self.refresh_behavior.lock().unwrap() = behavior;
    }

    /// Make the refresh endpoint wait until [`Self::release_refresh`].
    pub fn hold_refresh(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.refresh_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    /// Drop the (fake) network entirely.
    pub fn set_offline(&self, offline: bool) {
        *self.offline.lock().unwrap() = offline;
    }

    pub fn set_body(&self, path: &str, body: Value) {
        self.responses
            .lock()
            .unwrap()
            .push((path.to_string(), StatusCode::OK, body));
    }

    /// Make a path answer with an error status.
    pub fn set_error(&self, path: &str, status: StatusCode, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .push((path.to_string(), status, json!({ "message": message })));
    }

    /// Invalidate the currently accepted token, so the next request 401s.
    pub fn expire_token(&self) {
        *self.valid_token.lock().unwrap() = format!("expired-{}", rand_suffix());
    }

    pub fn refresh_count(&self) -> usize {
        self.refresh_count.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Paths of every non-refresh request, in arrival order.
    pub fn request_paths(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .map(|c| c.path)
            .filter(|p| p != "/auth/refresh-token")
            .collect()
    }

    fn response_for(&self, path: &str) -> ApiResponse {
        self.responses
            .lock()
            .unwrap()
            .iter()
            .find(|(p, _, _)| p == path)
            .map(|(_, status, body)| ApiResponse {
                status: *status,
                body: body.clone(),
            })
            .unwrap_or_else(|| ApiResponse {
                status: StatusCode::OK,
                body: json!({ "ok": true }),
            })
    }

    async fn handle_refresh(&self) -> AppResult<ApiResponse> {
        let gate = self.refresh_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.refresh_count.fetch_add(1, Ordering::SeqCst);

        let behavior = *self.refresh_behavior.lock().unwrap();
        match behavior {
            RefreshBehavior::Rotate => {
                let token = format!("token-{}", self.refresh_count());
                *self.valid_token.lock().unwrap() = token.clone();
                Ok(ApiResponse {
                    status: StatusCode::OK,
                    body: json!({ "accessToken": token, "refreshToken": "refresh-2" }),
                })
            }
            RefreshBehavior::RotateStale => Ok(ApiResponse {
                status: StatusCode::OK,
                body: json!({ "accessToken": "stale-token", "refreshToken": "refresh-2" }),
            }),
            RefreshBehavior::Reject => Ok(ApiResponse {
                status: StatusCode::UNAUTHORIZED,
                body: json!({ "message": "Invalid refresh token" }),
            }),
            RefreshBehavior::ServerError => Ok(ApiResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: json!({ "message": "Refresh unavailable" }),
            }),
            RefreshBehavior::Unreachable => Err(AppError::network("Connection refused")),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: &ApiRequest, bearer: Option<&str>) -> AppResult<ApiResponse> {
        self.calls.lock().unwrap().push(RecordedCall {
            path: request.path.clone(),
            bearer: bearer.map(str::to_string),
        });

        if *self.offline.lock().unwrap() {
            return Err(AppError::network("Connection refused"));
        }
        if request.is_refresh {
            return self.handle_refresh().await;
        }

        // A presented token is checked; token-less calls are the public
        // endpoints (login, register).
        let valid = self.valid_token.lock().unwrap().clone();
        if let Some(token) = bearer {
            if token != valid {
                return Ok(ApiResponse {
                    status: StatusCode::UNAUTHORIZED,
                    body: json!({ "message": "Invalid or expired token" }),
                });
            }
        }
        Ok(self.response_for(&request.path))
    }
}

fn rand_suffix() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default()
}

/// A wired client over the fake transport.
pub struct TestClient {
    pub transport: Arc<MockTransport>,
    pub store: Arc<MemoryCredentialStore>,
    pub session: Arc<SessionManager>,
    pub client: Arc<ApiClient>,
}

pub fn sample_user(role: Role) -> User {
    User {
        id: "u1".to_string(),
        name: "Alex Doe".to_string(),
        email: "alex@example.com".to_string(),
        role,
        is_active: true,
    }
}

/// Build a client whose store already holds a full session.
pub async fn signed_in_client(role: Role) -> TestClient {
    let transport = MockTransport::new("token-0");
    let store = Arc::new(MemoryCredentialStore::with_session(StoredSession::new(
        Credentials::new("token-0", "refresh-1"),
        sample_user(role),
    )));
    build_client(transport, store).await
}

/// Build a client with an empty credential store.
pub async fn anonymous_client() -> TestClient {
    build_client(MockTransport::new("token-0"), Arc::new(MemoryCredentialStore::new())).await
}

/// Build a client with an access token but no refresh token persisted.
pub async fn client_without_refresh_token(role: Role) -> TestClient {
    let transport = MockTransport::new("token-0");
    let credentials = Credentials {
        access_token: Some("token-0".to_string()),
        refresh_token: None,
    };
    let store = Arc::new(MemoryCredentialStore::with_session(StoredSession::new(
        credentials,
        sample_user(role),
    )));
    build_client(transport, store).await
}

/// Wire a [`MockTransport`] and store into a full client stack.
pub async fn build_client(
    transport: Arc<MockTransport>,
    store: Arc<MemoryCredentialStore>,
) -> TestClient {
    let session = Arc::new(
        SessionManager::initialize(store.clone() as Arc<dyn CredentialStore>)
            .await
            .unwrap(),
    );
    let client = Arc::new(ApiClient::new(transport.clone(), Arc::clone(&session)));
    TestClient {
        transport,
        store,
        session,
        client,
    }
}
