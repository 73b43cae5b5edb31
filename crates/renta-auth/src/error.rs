use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no API key stored; run `renta key set <key>`")]
    NotConfigured,

    #[error("invalid API key: expected {expected} characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("keyring error: {0}")]
    KeyringError(String),

    #[error("credential store error: {0}")]
    StoreError(String),
}
