use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A document cited by an answer.
///
/// Only `source` (the document URL) is required. The server also sends the
/// retrieval `id` and may add more fields; those are kept in `extra` so they
/// survive a JSON round trip.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Source {
    pub source: String,

    #[serde(flatten, default)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Source {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            source: url.into(),
            extra: serde_json::Map::new(),
        }
    }
}

/// Payload of an `info` frame, itself JSON-encoded inside the envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SourcesPayload {
    #[serde(default)]
    pub sources: Vec<Source>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extra_fields_are_preserved() {
        let json = r#"{"id": 3, "source": "https://sede.example.es/a.html"}"#;
        let source: Source = serde_json::from_str(json).unwrap();
        assert_eq!(source.source, "https://sede.example.es/a.html");
        assert_eq!(source.extra["id"], 3);

        let back = serde_json::to_value(&source).unwrap();
        assert_eq!(back["id"], 3);
    }

    #[test]
    fn payload_without_sources_is_empty() {
        let payload: SourcesPayload = serde_json::from_str("{}").unwrap();
        assert!(payload.sources.is_empty());
    }
}
