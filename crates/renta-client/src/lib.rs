//! # renta-client
//!
//! Streaming session controller for the RentaGPT answer server.
//!
//! One question opens one WebSocket. The client sends `{"query", "apiKey"}`
//! once, then forwards every bot frame (`start`, `info`, `stream`, `end`,
//! `error`) to a [`SessionObserver`] as a [`renta_core::SessionEvent`].
//! Connection failures, drops, malformed frames and stalls end the session
//! with a `Failed` event; there is no retry.

mod controller;
mod error;

pub use controller::{SessionController, SessionObserver};
pub use error::ClientError;
