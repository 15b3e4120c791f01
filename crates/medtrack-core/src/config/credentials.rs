//! Local credential persistence configuration.

use serde::{Deserialize, Serialize};

/// Settings for the file-backed credential store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Path to the JSON file holding the persisted session.
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}

fn default_path() -> String {
    "data/credentials.json".to_string()
}
