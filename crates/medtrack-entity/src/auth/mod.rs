//! Authentication payloads and credential types.

pub mod credentials;
pub mod payload;

pub use credentials::Credentials;
pub use payload::{
    AuthResponse, LoginRequest, ProfileResponse, RefreshRequest, RefreshResponse, RegisterRequest,
};
