//! Credential persistence.
//!
//! The store owns the access token, refresh token, and serialized user
//! record. The three slots are always written and cleared together.

pub mod file;
pub mod memory;
pub mod store;

pub use file::FileCredentialStore;
pub use memory::MemoryCredentialStore;
pub use store::{CredentialStore, StoredSession};
