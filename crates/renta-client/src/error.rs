use thiserror::Error;
use tokio_tungstenite::tungstenite;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("write a question first")]
    EmptyQuery,

    #[error("no API key available")]
    MissingCredential,

    #[error("failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: Box<tungstenite::Error>,
    },

    #[error("timed out after {secs}s connecting to {url}")]
    ConnectTimeout { url: String, secs: u64 },

    #[error("no data from server for {secs}s")]
    IdleTimeout { secs: u64 },

    #[error("connection lost: {0}")]
    Transport(#[source] Box<tungstenite::Error>),

    #[error("connection closed before the answer finished")]
    ClosedBeforeEnd,

    #[error(transparent)]
    Protocol(#[from] renta_core::CoreError),

    /// The server reported a failure; the message is shown as sent.
    #[error("{0}")]
    Server(String),

    #[error(transparent)]
    Config(#[from] renta_config::ConfigError),
}

impl ClientError {
    /// Input errors are raised before any connection is attempted.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(self, Self::EmptyQuery | Self::MissingCredential)
    }
}
