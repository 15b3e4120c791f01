//! Typed API surfaces built on the request pipeline.

mod auth;
mod medications;
mod users;

pub use auth::AuthApi;
pub use medications::{MedicationApi, MedicationFilter, MedicationPage};
pub use users::UserApi;
