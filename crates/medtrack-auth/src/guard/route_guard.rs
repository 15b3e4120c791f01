//! Navigation gating from session state and role requirements.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use medtrack_core::error::ErrorKind;
use medtrack_core::AppResult;
use medtrack_entity::user::User;

use crate::rbac;
use crate::session::{SessionManager, SessionStatus, ValidationOutcome};

use super::route::{Access, RouteTable};

/// Performs the profile round-trip used to validate persisted credentials.
///
/// Implemented by the API layer; injected here so the guard has no HTTP
/// dependency of its own.
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate the current access token, returning the user it belongs to.
    async fn validate(&self) -> AppResult<User>;
}

/// Outcome of a guarded navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Render the requested view.
    Allow,
    /// An authentication or validation round-trip is in flight; render a
    /// waiting indicator and do not redirect yet.
    Pending,
    /// Not authenticated; go to the login view, carrying the originally
    /// requested location for the post-login return.
    RedirectToLogin {
        /// The path the caller wanted.
        from: String,
    },
    /// Authenticated but lacking the required role.
    RedirectToUnauthorized,
}

/// Gates navigation using the session state machine and the predicate
/// engine.
pub struct RouteGuard {
    table: RouteTable,
    session: Arc<SessionManager>,
}

impl RouteGuard {
    /// Create a guard over the standard navigation surface.
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self::with_table(session, RouteTable::standard())
    }

    /// Create a guard with an explicit route table.
    pub fn with_table(session: Arc<SessionManager>, table: RouteTable) -> Self {
        Self { table, session }
    }

    /// Decide whether navigating to `path` is permitted.
    ///
    /// When the session is unauthenticated but credentials are persisted
    /// locally, one validation round-trip is attempted through
    /// `validator` before deciding.
    pub async fn check(
        &self,
        path: &str,
        validator: &dyn SessionValidator,
    ) -> AppResult<RouteDecision> {
        let route = match self.table.resolve(path) {
            // Undeclared paths render the public not-found view.
            None => return Ok(RouteDecision::Allow),
            Some(route) => route,
        };
        if route.access == Access::Public {
            return Ok(RouteDecision::Allow);
        }

        let mut session = self.session.snapshot();
        if session.status == SessionStatus::Authenticating || self.session.is_validating() {
            return Ok(RouteDecision::Pending);
        }

        if !session.is_authenticated && self.session.has_persisted_credentials().await? {
            let attempt = self.session.begin_validation();
            let outcome = match validator.validate().await {
                Ok(user) => ValidationOutcome::Valid(user),
                Err(e)
                    if matches!(
                        e.kind,
                        ErrorKind::AuthorizationRejected | ErrorKind::SessionExpired
                    ) =>
                {
                    ValidationOutcome::Unauthorized
                }
                Err(e) => {
                    debug!(error = %e, "Token validation failed");
                    ValidationOutcome::Failed
                }
            };
            self.session.complete_validation(attempt, outcome);
            session = self.session.snapshot();
        }

        if !session.is_authenticated {
            return Ok(RouteDecision::RedirectToLogin {
                from: path.to_string(),
            });
        }

        match route.access {
            Access::Public => Ok(RouteDecision::Allow),
            Access::Authenticated => Ok(RouteDecision::Allow),
            Access::Roles(roles) => {
                if rbac::has_any_role(session.user.as_ref(), roles) {
                    Ok(RouteDecision::Allow)
                } else {
                    debug!(path, "Navigation denied for role");
                    Ok(RouteDecision::RedirectToUnauthorized)
                }
            }
        }
    }
}
