//! Cross-cutting error types for the RentaGPT client.
//!
//! Transport and storage errors live in their own crates (`ClientError`,
//! `AuthError`, `ConfigError`). They converge into `anyhow` in `renta-cli`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// A frame from the server was not a valid JSON envelope.
    #[error("Malformed frame: {0}")]
    MalformedFrame(String),

    /// An `info` frame carried a `message` that is not a valid source list.
    #[error("Malformed source list: {0}")]
    MalformedSources(String),

    /// A lifecycle transition was attempted that is not allowed.
    #[error("Invalid session transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },
}
