//! # medtrack-client
//!
//! The REST client core: a token-refresh-aware request pipeline over a
//! pluggable transport, typed API services for the auth, medication, and
//! user endpoints, and client-side view state caches.

pub mod pipeline;
pub mod services;
pub mod state;
pub mod transport;

pub use pipeline::ApiClient;
pub use services::{AuthApi, MedicationApi, MedicationFilter, MedicationPage, UserApi};
pub use state::{MedicationsState, Pagination, UsersState};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport};
