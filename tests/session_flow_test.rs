//! Integration tests for the session lifecycle and route guarding.

mod helpers;

use std::sync::Arc;

use serde_json::json;

use medtrack_auth::credentials::{CredentialStore, MemoryCredentialStore, StoredSession};
use medtrack_auth::guard::{RouteDecision, RouteGuard};
use medtrack_client::services::{AuthApi, MedicationApi, MedicationFilter};
use medtrack_core::error::ErrorKind;
use medtrack_core::events::SessionEvent;
use medtrack_entity::auth::{Credentials, LoginRequest};
use medtrack_entity::user::Role;

use helpers::{
    MockTransport, RefreshBehavior, TestClient, anonymous_client, sample_user, signed_in_client,
};

fn profile_body(role: Role) -> serde_json::Value {
    json!({ "user": serde_json::to_value(sample_user(role)).unwrap() })
}

#[tokio::test]
async fn test_login_establishes_session() {
    let app = anonymous_client().await;
    app.transport.set_body(
        "/auth/login",
        json!({
            "user": serde_json::to_value(sample_user(Role::Doctor)).unwrap(),
            "accessToken": "token-0",
            "refreshToken": "refresh-1",
        }),
    );
    let auth = AuthApi::new(Arc::clone(&app.client));
    let mut events = app.session.subscribe();

    let user = auth
        .login(&LoginRequest {
            email: "alex@example.com".to_string(),
            password: "hunter2".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(user.role, Role::Doctor);
    assert!(app.session.snapshot().is_authenticated);
    let stored = app.store.get().await.unwrap();
    assert_eq!(stored.credentials.access_token.as_deref(), Some("token-0"));
    assert_eq!(
        events.recv().await.unwrap(),
        SessionEvent::Authenticated {
            user_id: "u1".to_string()
        }
    );
}

#[tokio::test]
async fn test_failed_login_leaves_session_anonymous() {
    let app = anonymous_client().await;
    app.transport.set_error(
        "/auth/login",
        http::StatusCode::UNAUTHORIZED,
        "Invalid credentials",
    );
    let auth = AuthApi::new(Arc::clone(&app.client));

    let err = auth
        .login(&LoginRequest {
            email: "alex@example.com".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::AuthorizationRejected);
    assert!(!app.session.snapshot().is_authenticated);
    assert!(app.store.get().await.unwrap().credentials.access_token.is_none());
}

#[tokio::test]
async fn test_logout_clears_local_state_even_if_remote_fails() {
    let app = signed_in_client(Role::Patient).await;
    app.transport.set_offline(true);
    let auth = AuthApi::new(Arc::clone(&app.client));
    let mut events = app.session.subscribe();

    auth.logout().await.unwrap();

    assert!(!app.session.snapshot().is_authenticated);
    let stored = app.store.get().await.unwrap();
    assert!(stored.credentials.access_token.is_none());
    assert!(stored.user.is_none());
    assert_eq!(events.recv().await.unwrap(), SessionEvent::LoggedOut);
}

#[tokio::test]
async fn test_guard_allows_public_routes_when_anonymous() {
    let app = anonymous_client().await;
    let auth = AuthApi::new(Arc::clone(&app.client));
    let guard = RouteGuard::new(Arc::clone(&app.session));

    for path in ["/", "/login", "/register", "/unauthorized"] {
        assert_eq!(guard.check(path, &auth).await.unwrap(), RouteDecision::Allow);
    }
}

#[tokio::test]
async fn test_guard_redirects_anonymous_with_origin() {
    let app = anonymous_client().await;
    let auth = AuthApi::new(Arc::clone(&app.client));
    let guard = RouteGuard::new(Arc::clone(&app.session));

    let decision = guard.check("/medications/m1/edit", &auth).await.unwrap();
    let RouteDecision::RedirectToLogin { from } = decision else {
        panic!("expected a login redirect, got {decision:?}");
    };
    assert_eq!(from, "/medications/m1/edit");

    // Sign in and retry the carried location: the round trip completes.
    app.transport.set_body(
        "/auth/login",
        json!({
            "user": serde_json::to_value(sample_user(Role::Doctor)).unwrap(),
            "accessToken": "token-0",
            "refreshToken": "refresh-1",
        }),
    );
    auth.login(&LoginRequest {
        email: "alex@example.com".to_string(),
        password: "hunter2".to_string(),
    })
    .await
    .unwrap();

    assert_eq!(
        guard.check(&from, &auth).await.unwrap(),
        RouteDecision::Allow
    );
}

#[tokio::test]
async fn test_guard_blocks_patient_from_user_admin() {
    let app = signed_in_client(Role::Patient).await;
    let auth = AuthApi::new(Arc::clone(&app.client));
    let guard = RouteGuard::new(Arc::clone(&app.session));

    assert_eq!(
        guard.check("/users", &auth).await.unwrap(),
        RouteDecision::RedirectToUnauthorized
    );
    assert_eq!(
        guard.check("/medications", &auth).await.unwrap(),
        RouteDecision::Allow
    );
}

#[tokio::test]
async fn test_guard_allows_doctor_to_prescribe() {
    let app = signed_in_client(Role::Doctor).await;
    let auth = AuthApi::new(Arc::clone(&app.client));
    let guard = RouteGuard::new(Arc::clone(&app.session));

    assert_eq!(
        guard.check("/medications/new", &auth).await.unwrap(),
        RouteDecision::Allow
    );
    assert_eq!(
        guard.check("/users", &auth).await.unwrap(),
        RouteDecision::RedirectToUnauthorized
    );
}

/// Build a client whose store holds tokens but no cached user, forcing a
/// validation round-trip on the first guarded navigation.
async fn client_with_unvalidated_tokens() -> TestClient {
    let transport = MockTransport::new("token-0");
    let store = Arc::new(MemoryCredentialStore::with_session(StoredSession {
        credentials: Credentials::new("token-0", "refresh-1"),
        user: None,
    }));
    helpers::build_client(transport, store).await
}

#[tokio::test]
async fn test_guard_validates_persisted_credentials() {
    let app = client_with_unvalidated_tokens().await;
    app.transport
        .set_body("/auth/profile", profile_body(Role::Nurse));
    let auth = AuthApi::new(Arc::clone(&app.client));
    let guard = RouteGuard::new(Arc::clone(&app.session));

    assert!(!app.session.snapshot().is_authenticated);
    assert_eq!(
        guard.check("/medications", &auth).await.unwrap(),
        RouteDecision::Allow
    );
    assert!(app.session.snapshot().is_authenticated);
}

#[tokio::test]
async fn test_guard_validation_refreshes_expired_token() {
    let app = client_with_unvalidated_tokens().await;
    app.transport
        .set_body("/auth/profile", profile_body(Role::Patient));
    app.transport.expire_token();
    let auth = AuthApi::new(Arc::clone(&app.client));
    let guard = RouteGuard::new(Arc::clone(&app.session));

    assert_eq!(
        guard.check("/medications", &auth).await.unwrap(),
        RouteDecision::Allow
    );
    assert_eq!(app.transport.refresh_count(), 1);
    assert!(app.session.snapshot().is_authenticated);
}

#[tokio::test]
async fn test_guard_redirects_after_hard_logout() {
    let app = client_with_unvalidated_tokens().await;
    app.transport.expire_token();
    app.transport.set_refresh_behavior(RefreshBehavior::Reject);
    let auth = AuthApi::new(Arc::clone(&app.client));
    let guard = RouteGuard::new(Arc::clone(&app.session));

    let decision = guard.check("/medications", &auth).await.unwrap();
    assert_eq!(
        decision,
        RouteDecision::RedirectToLogin {
            from: "/medications".to_string()
        }
    );
    // Everything was cleared by the failed refresh.
    let stored = app.store.get().await.unwrap();
    assert!(stored.credentials.access_token.is_none());
}

#[tokio::test]
async fn test_expired_session_surfaces_during_api_call() {
    let app = signed_in_client(Role::Patient).await;
    app.transport.expire_token();
    app.transport.set_refresh_behavior(RefreshBehavior::Reject);
    let medications = MedicationApi::new(Arc::clone(&app.client));

    let err = medications
        .list(&MedicationFilter::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::SessionExpired);
    assert!(!app.session.snapshot().is_authenticated);
}

#[tokio::test]
async fn test_transparent_refresh_during_api_call() {
    let app = signed_in_client(Role::Patient).await;
    app.transport.set_body(
        "/medications",
        json!({
            "medications": [],
            "currentPage": 1,
            "totalPages": 1,
            "total": 0,
        }),
    );
    app.transport.expire_token();
    let medications = MedicationApi::new(Arc::clone(&app.client));

    let page = medications.list(&MedicationFilter::default()).await.unwrap();
    assert!(page.medications.is_empty());
    assert_eq!(app.transport.refresh_count(), 1);
    // The session was never torn down.
    assert!(app.session.snapshot().is_authenticated);
}
