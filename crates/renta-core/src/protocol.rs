//! JSON envelope exchanged with the answer server.
//!
//! One request goes out per session, right after the socket opens:
//!
//! ```text
//! {"query": "...", "apiKey": "..."}
//! ```
//!
//! Every inbound text frame is an envelope `{"sender", "type", "message"}`.
//! Only frames from the `bot` sender are acted upon. For `info` frames the
//! `message` is itself JSON (`{"sources": [...]}`); for `stream` frames it is
//! a text fragment of the answer.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::source::{Source, SourcesPayload};

/// The only sender whose frames are processed.
pub const BOT_SENDER: &str = "bot";

/// Outbound request, sent once per session.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ClientRequest {
    pub query: String,
    #[serde(rename = "apiKey")]
    pub api_key: String,
}

impl ClientRequest {
    #[must_use]
    pub fn new(query: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            api_key: api_key.into(),
        }
    }

    /// Encode as the text payload of a WebSocket frame.
    pub fn to_frame(&self) -> Result<String, CoreError> {
        serde_json::to_string(self).map_err(|e| CoreError::MalformedFrame(e.to_string()))
    }
}

/// Raw inbound envelope.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Frame {
    #[serde(default)]
    pub sender: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub message: String,
}

/// Decoded bot event.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    /// The server began producing the answer.
    Start,
    /// Full replacement list of cited sources.
    Sources(Vec<Source>),
    /// Next piece of answer text.
    Fragment(String),
    /// No further fragments follow.
    End,
    /// The server gave up on the question.
    Error(String),
}

impl ServerEvent {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Sources(_) => "info",
            Self::Fragment(_) => "stream",
            Self::End => "end",
            Self::Error(_) => "error",
        }
    }
}

/// Decode one inbound text frame.
///
/// Returns `Ok(None)` for frames that are well formed but not meant for the
/// client: other senders (the server echoes the question as `you`) and
/// unknown event types.
///
/// # Errors
///
/// Returns [`CoreError::MalformedFrame`] if the envelope is not valid JSON, and
/// [`CoreError::MalformedSources`] if an `info` payload cannot be parsed.
pub fn decode_frame(text: &str) -> Result<Option<ServerEvent>, CoreError> {
    let frame: Frame =
        serde_json::from_str(text).map_err(|e| CoreError::MalformedFrame(e.to_string()))?;

    if frame.sender != BOT_SENDER {
        tracing::debug!(sender = %frame.sender, kind = %frame.kind, "ignoring non-bot frame");
        return Ok(None);
    }

    let event = match frame.kind.as_str() {
        "start" => ServerEvent::Start,
        "info" => {
            let payload: SourcesPayload = serde_json::from_str(&frame.message)
                .map_err(|e| CoreError::MalformedSources(e.to_string()))?;
            ServerEvent::Sources(payload.sources)
        }
        "stream" => ServerEvent::Fragment(frame.message),
        "end" => ServerEvent::End,
        "error" => ServerEvent::Error(frame.message),
        other => {
            tracing::debug!(kind = other, "ignoring unknown bot frame type");
            return Ok(None);
        }
    };

    Ok(Some(event))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn request_uses_camel_case_api_key() {
        let frame = ClientRequest::new("¿Qué es el IRPF?", "sk-test").to_frame().unwrap();
        let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(value["query"], "¿Qué es el IRPF?");
        assert_eq!(value["apiKey"], "sk-test");
        assert!(value.get("api_key").is_none());
    }

    #[test]
    fn decodes_stream_fragment() {
        let event = decode_frame(r#"{"sender":"bot","type":"stream","message":"Hola"}"#).unwrap();
        assert_eq!(event, Some(ServerEvent::Fragment("Hola".into())));
    }

    #[test]
    fn decodes_info_with_nested_json() {
        let text = serde_json::json!({
            "sender": "bot",
            "type": "info",
            "message": r#"{"sources": [{"id": 1, "source": "https://a.es/x"}]}"#,
        })
        .to_string();

        let Some(ServerEvent::Sources(sources)) = decode_frame(&text).unwrap() else {
            panic!("expected sources event");
        };
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].source, "https://a.es/x");
    }

    #[test]
    fn end_frame_without_message_decodes() {
        let event = decode_frame(r#"{"sender":"bot","type":"end"}"#).unwrap();
        assert_eq!(event, Some(ServerEvent::End));
    }

    #[test]
    fn echo_from_user_sender_is_ignored() {
        let event = decode_frame(r#"{"sender":"you","type":"stream","message":"q"}"#).unwrap();
        assert_eq!(event, None);
    }

    #[test]
    fn user_frame_without_type_is_ignored() {
        let event = decode_frame(r#"{"sender":"you","message":"¿IRPF?"}"#).unwrap();
        assert_eq!(event, None);
    }

    #[test]
    fn bot_frame_without_type_is_ignored() {
        let event = decode_frame(r#"{"sender":"bot","message":"x"}"#).unwrap();
        assert_eq!(event, None);
    }

    #[test]
    fn unknown_bot_type_is_ignored() {
        let event = decode_frame(r#"{"sender":"bot","type":"typing","message":""}"#).unwrap();
        assert_eq!(event, None);
    }

    #[test]
    fn error_frame_carries_message() {
        let event = decode_frame(
            r#"{"sender":"bot","type":"error","message":"Sorry, something went wrong. Try again."}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            Some(ServerEvent::Error("Sorry, something went wrong. Try again.".into()))
        );
    }

    #[test]
    fn invalid_json_is_malformed_frame() {
        let err = decode_frame("not json").unwrap_err();
        assert!(matches!(err, CoreError::MalformedFrame(_)));
    }

    #[test]
    fn invalid_info_payload_is_malformed_sources() {
        let err = decode_frame(r#"{"sender":"bot","type":"info","message":"[oops"}"#).unwrap_err();
        assert!(matches!(err, CoreError::MalformedSources(_)));
    }
}
