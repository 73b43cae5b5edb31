//! # renta-core
//!
//! Core types for the RentaGPT client.
//!
//! This crate has no I/O. It provides:
//! - The JSON envelope exchanged with the answer server and its decoder
//! - Cited source records
//! - The session lifecycle enum and the session state value object, updated
//!   by a pure reducer
//! - The citation renderer (marker resolution and source host labels)
//! - Response types emitted by the `renta` binary
//! - Cross-cutting error types

pub mod citation;
pub mod errors;
pub mod protocol;
pub mod responses;
pub mod session;
pub mod source;

pub use errors::CoreError;
pub use protocol::{ClientRequest, ServerEvent};
pub use session::{SessionEvent, SessionPhase, SessionState, View};
pub use source::Source;
