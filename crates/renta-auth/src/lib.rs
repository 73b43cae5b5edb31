//! # renta-auth
//!
//! Storage for the user's OpenAI API key.
//!
//! The key is opaque to the client: it is forwarded to the answer server with
//! each question and its only validation is a length check. It lives in the OS
//! keychain (`keyring`), with a `0600` file under `~/.rentagpt/` as fallback
//! and `RENTA_API_KEY` for CI.

pub mod error;
pub mod store;

pub use error::AuthError;
pub use store::{API_KEY_ENV, CredentialSource, CredentialStore, StoredCredential};
