//! Session lifecycle and the session state value object.
//!
//! A session is one question-to-answer cycle. Its state is owned by the
//! caller and advanced by [`SessionState::apply`], a pure function of the
//! previous state and one [`SessionEvent`]. Events that make no sense in the
//! current phase leave the state untouched.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::protocol::ServerEvent;
use crate::source::Source;

// ---------------------------------------------------------------------------
// SessionPhase
// ---------------------------------------------------------------------------

/// Lifecycle of a session.
///
/// ```text
/// idle → submitting → streaming → complete → idle (reset)
///                   → complete
///        submitting → error → idle (reset)
///                     streaming → error
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Idle,
    Submitting,
    Streaming,
    Complete,
    Error,
}

impl SessionPhase {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Idle => &[Self::Submitting],
            Self::Submitting => &[Self::Streaming, Self::Complete, Self::Error],
            Self::Streaming => &[Self::Complete, Self::Error],
            Self::Complete | Self::Error => &[Self::Idle],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Validate a transition, for callers that want to treat a bad one as an error.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTransition`] when `next` is not reachable.
    pub fn transition_to(self, next: Self) -> Result<Self, CoreError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoreError::InvalidTransition {
                from: self.to_string(),
                to: next.to_string(),
            })
        }
    }

    /// Whether a connection is expected to be open.
    #[must_use]
    pub const fn is_loading(self) -> bool {
        matches!(self, Self::Submitting | Self::Streaming)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Submitting => "submitting",
            Self::Streaming => "streaming",
            Self::Complete => "complete",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SessionEvent
// ---------------------------------------------------------------------------

/// Input to the session reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The user submitted a question.
    Submitted(String),
    /// The server announced the start of the answer.
    Started,
    /// A full source list arrived; it replaces the previous one.
    SourcesReceived(Vec<Source>),
    /// An answer fragment arrived.
    FragmentReceived(String),
    /// The server signalled completion.
    Completed,
    /// The session failed (transport, protocol or server error).
    Failed(String),
    /// The user asked to start over.
    Reset,
}

impl From<ServerEvent> for SessionEvent {
    fn from(event: ServerEvent) -> Self {
        match event {
            ServerEvent::Start => Self::Started,
            ServerEvent::Sources(sources) => Self::SourcesReceived(sources),
            ServerEvent::Fragment(text) => Self::FragmentReceived(text),
            ServerEvent::End => Self::Completed,
            ServerEvent::Error(message) => Self::Failed(message),
        }
    }
}

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

/// Which screen the root container shows for a given state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// The question prompt, or the spinner while `loading`.
    Search { loading: bool },
    /// Answer text; sources and the "ask again" affordance only when `done`.
    Answer { done: bool },
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Everything the client knows about the current session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SessionState {
    pub query: String,
    pub answer: String,
    pub sources: Vec<Source>,
    pub phase: SessionPhase,
    /// Reason for the `error` phase, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the server has signalled completion.
    #[must_use]
    pub fn done(&self) -> bool {
        self.phase == SessionPhase::Complete
    }

    /// The screen to show: the answer as soon as any text exists.
    #[must_use]
    pub fn view(&self) -> View {
        if self.answer.is_empty() {
            View::Search {
                loading: self.phase.is_loading(),
            }
        } else {
            View::Answer { done: self.done() }
        }
    }

    /// Advance the state by one event.
    #[must_use]
    pub fn apply(self, event: SessionEvent) -> Self {
        match event {
            SessionEvent::Submitted(query) => self.submitted(query),
            SessionEvent::Started => self.started(),
            SessionEvent::SourcesReceived(sources) => self.sources_received(sources),
            SessionEvent::FragmentReceived(text) => self.fragment_received(&text),
            SessionEvent::Completed => self.completed(),
            SessionEvent::Failed(message) => self.failed(message),
            SessionEvent::Reset => self.reset(),
        }
    }

    fn submitted(self, query: String) -> Self {
        if query.is_empty() || self.phase != SessionPhase::Idle {
            tracing::debug!(phase = %self.phase, "ignoring submission");
            return self;
        }
        Self {
            query,
            phase: SessionPhase::Submitting,
            ..Self::default()
        }
    }

    fn started(mut self) -> Self {
        if self.phase == SessionPhase::Submitting {
            self.phase = SessionPhase::Streaming;
        }
        self
    }

    fn sources_received(mut self, sources: Vec<Source>) -> Self {
        match self.phase {
            SessionPhase::Submitting | SessionPhase::Streaming => {
                self.sources = sources;
                self.phase = SessionPhase::Streaming;
            }
            // A late source list still replaces the shown one.
            SessionPhase::Complete => self.sources = sources,
            SessionPhase::Idle | SessionPhase::Error => {}
        }
        self
    }

    fn fragment_received(mut self, text: &str) -> Self {
        if self.phase.is_loading() {
            self.answer.push_str(text);
            self.phase = SessionPhase::Streaming;
        } else {
            tracing::debug!(phase = %self.phase, "dropping fragment outside an active session");
        }
        self
    }

    fn completed(mut self) -> Self {
        if self.phase.can_transition_to(SessionPhase::Complete) {
            self.phase = SessionPhase::Complete;
        }
        self
    }

    fn failed(mut self, message: String) -> Self {
        if self.phase.can_transition_to(SessionPhase::Error) {
            self.phase = SessionPhase::Error;
            self.error = Some(message);
        }
        self
    }

    fn reset(self) -> Self {
        if self.phase.is_loading() {
            return self;
        }
        Self::default()
    }
}
