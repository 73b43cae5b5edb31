use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use renta_core::protocol::{ClientRequest, ServerEvent, decode_frame};
use renta_core::SessionEvent;
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite::Message};

use crate::error::ClientError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Receives session events in arrival order.
///
/// The controller never holds session state itself; whoever owns the
/// [`renta_core::SessionState`] applies these events to it.
pub trait SessionObserver {
    fn on_event(&mut self, event: SessionEvent);
}

impl<F> SessionObserver for F
where
    F: FnMut(SessionEvent),
{
    fn on_event(&mut self, event: SessionEvent) {
        self(event);
    }
}

/// Turns one question into a stream of session events over a WebSocket.
///
/// Each [`submit`](Self::submit) opens exactly one connection and closes it
/// when the session ends. Nothing is retried: a failed session has to be
/// submitted again.
#[derive(Debug, Clone)]
pub struct SessionController {
    endpoint: String,
    connect_timeout: Option<Duration>,
    idle_timeout: Option<Duration>,
}

impl SessionController {
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            connect_timeout: None,
            idle_timeout: None,
        }
    }

    /// Controller for the endpoint and timeouts in `config`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` if the endpoint cannot be resolved.
    pub fn from_config(config: &renta_config::RentaConfig) -> Result<Self, ClientError> {
        let endpoint = config.endpoint.resolve()?;
        Ok(Self::new(endpoint.url)
            .with_connect_timeout(config.client.connect_timeout())
            .with_idle_timeout(config.client.idle_timeout()))
    }

    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.connect_timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.idle_timeout = timeout;
        self
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run one session for `query`.
    ///
    /// An empty query or credential is rejected before anything else happens:
    /// no event is emitted and no connection is opened. Otherwise the
    /// observer first sees `Submitted`, then every decoded bot event. A
    /// transport, protocol or server failure is reported as a final `Failed`
    /// event and also returned.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::EmptyQuery` / `MissingCredential` for rejected
    /// input, and the failure that ended the session otherwise.
    pub async fn submit<O>(
        &self,
        query: &str,
        api_key: &str,
        observer: &mut O,
    ) -> Result<(), ClientError>
    where
        O: SessionObserver + ?Sized,
    {
        if query.is_empty() {
            return Err(ClientError::EmptyQuery);
        }
        if api_key.is_empty() {
            return Err(ClientError::MissingCredential);
        }

        observer.on_event(SessionEvent::Submitted(query.to_string()));

        let result = self.run(query, api_key, observer).await;
        if let Err(error) = &result {
            tracing::warn!(endpoint = %self.endpoint, %error, "session failed");
            observer.on_event(SessionEvent::Failed(error.to_string()));
        }
        result
    }

    async fn run<O>(&self, query: &str, api_key: &str, observer: &mut O) -> Result<(), ClientError>
    where
        O: SessionObserver + ?Sized,
    {
        let mut ws = self.connect().await?;

        let request = ClientRequest::new(query, api_key).to_frame()?;
        ws.send(Message::text(request))
            .await
            .map_err(|e| ClientError::Transport(Box::new(e)))?;
        tracing::debug!(query_len = query.len(), "request sent");

        let mut fragments = 0_usize;
        let mut answer_bytes = 0_usize;

        loop {
            let message = match self.next_message(&mut ws).await? {
                Some(message) => message,
                None => return Err(ClientError::ClosedBeforeEnd),
            };

            let text = match message {
                Message::Text(text) => text,
                Message::Close(frame) => {
                    tracing::debug!(?frame, "server closed the connection");
                    return Err(ClientError::ClosedBeforeEnd);
                }
                other => {
                    tracing::trace!(len = other.len(), "ignoring non-text message");
                    continue;
                }
            };

            let Some(event) = decode_frame(&text)? else {
                continue;
            };
            tracing::debug!(kind = event.kind(), "frame received");

            match event {
                ServerEvent::End => {
                    observer.on_event(SessionEvent::Completed);
                    tracing::info!(fragments, answer_bytes, "answer complete");
                    if let Err(error) = ws.close(None).await {
                        tracing::debug!(%error, "close after completion failed");
                    }
                    return Ok(());
                }
                ServerEvent::Error(message) => return Err(ClientError::Server(message)),
                ServerEvent::Fragment(text) => {
                    fragments += 1;
                    answer_bytes += text.len();
                    observer.on_event(SessionEvent::FragmentReceived(text));
                }
                event => observer.on_event(event.into()),
            }
        }
    }

    async fn connect(&self) -> Result<WsStream, ClientError> {
        tracing::info!(endpoint = %self.endpoint, "connecting");
        let connect = tokio_tungstenite::connect_async(self.endpoint.as_str());

        let result = match self.connect_timeout {
            Some(limit) => tokio::time::timeout(limit, connect).await.map_err(|_| {
                ClientError::ConnectTimeout {
                    url: self.endpoint.clone(),
                    secs: limit.as_secs(),
                }
            })?,
            None => connect.await,
        };

        let (ws, _response) = result.map_err(|e| ClientError::Connect {
            url: self.endpoint.clone(),
            source: Box::new(e),
        })?;
        tracing::debug!(endpoint = %self.endpoint, "connected");
        Ok(ws)
    }

    async fn next_message(&self, ws: &mut WsStream) -> Result<Option<Message>, ClientError> {
        let next = match self.idle_timeout {
            Some(limit) => tokio::time::timeout(limit, ws.next())
                .await
                .map_err(|_| ClientError::IdleTimeout {
                    secs: limit.as_secs(),
                })?,
            None => ws.next().await,
        };

        next.transpose()
            .map_err(|e| ClientError::Transport(Box::new(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn empty_query_emits_nothing() {
        let controller = SessionController::new("ws://127.0.0.1:9/chat");
        let mut events = Vec::new();
        let mut record = |event: SessionEvent| events.push(event);

        let err = controller.submit("", "key", &mut record).await.unwrap_err();
        assert!(matches!(err, ClientError::EmptyQuery));
        assert!(err.is_input_error());
        assert_eq!(events, Vec::new());
    }

    #[tokio::test]
    async fn missing_key_emits_nothing() {
        let controller = SessionController::new("ws://127.0.0.1:9/chat");
        let mut events = Vec::new();
        let mut record = |event: SessionEvent| events.push(event);

        let err = controller.submit("q", "", &mut record).await.unwrap_err();
        assert!(matches!(err, ClientError::MissingCredential));
        assert_eq!(events, Vec::new());
    }

    #[test]
    fn from_config_uses_resolved_endpoint() {
        let mut config = renta_config::RentaConfig::default();
        config.endpoint.host = "rentagpt.com".into();
        let controller = SessionController::from_config(&config).expect("controller");
        assert_eq!(controller.endpoint(), "ws://rentagpt.com/chat");
        assert_eq!(controller.idle_timeout, Some(Duration::from_secs(120)));
    }
}
