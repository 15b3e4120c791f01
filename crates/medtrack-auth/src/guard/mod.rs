//! Navigation guarding.

pub mod route;

mod route_guard;

pub use route::{Access, Route, RouteTable};
pub use route_guard::{RouteDecision, RouteGuard, SessionValidator};
