//! Credential storage settings.

use serde::{Deserialize, Serialize};

/// Length of an accepted API key. A stand-in for "looks like an OpenAI key".
const fn default_expected_length() -> usize {
    51
}

fn default_keyring_service() -> String {
    "rentagpt-cli".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CredentialConfig {
    /// Exact length a saved key must have.
    #[serde(default = "default_expected_length")]
    pub expected_length: usize,

    /// OS keychain service name the key is stored under.
    #[serde(default = "default_keyring_service")]
    pub keyring_service: String,

    /// Skip the OS keychain and only use the credentials file.
    #[serde(default)]
    pub file_only: bool,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            expected_length: default_expected_length(),
            keyring_service: default_keyring_service(),
            file_only: false,
        }
    }
}
