//! Response types returned as JSON by `renta` commands.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::citation::{self, Segment, SourceEntry};
use crate::session::{SessionPhase, SessionState};

/// Response from `renta ask`.
///
/// `sources` is only populated once the session is complete, matching what
/// the answer view shows.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AskResponse {
    pub query: String,
    pub phase: SessionPhase,
    pub answer: String,
    pub segments: Vec<Segment>,
    pub sources: Vec<SourceEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&SessionState> for AskResponse {
    fn from(state: &SessionState) -> Self {
        let sources = if state.done() {
            citation::source_entries(&state.sources)
        } else {
            Vec::new()
        };

        Self {
            query: state.query.clone(),
            phase: state.phase,
            answer: state.answer.clone(),
            segments: citation::segments(&state.answer, &state.sources),
            sources,
            error: state.error.clone(),
        }
    }
}

/// Response from `renta key status`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct KeyStatusResponse {
    pub stored: bool,
    pub valid_length: bool,
    pub source: Option<String>,
}

/// Response from `renta endpoint`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct EndpointResponse {
    pub url: String,
    pub host: Option<String>,
    pub matched_route: Option<String>,
}
