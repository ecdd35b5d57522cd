//! Shared types for the exovoice call-turn pipeline.
//!
//! This crate holds the per-turn data model that flows between the
//! transcription client, the call-turn controller and the ExoML renderer.
//! Nothing here performs I/O; every value lives for exactly one webhook
//! invocation and is dropped once the response has been sent.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prompt spoken when a call is first answered.
pub const GREETING: &str = "Hello! How can I help you today?";

/// Message spoken when a turn fails and the call has to be ended.
pub const APOLOGY: &str = "Sorry, something went wrong, goodbye.";

/// Placeholder utterance returned when no transcription credential is configured.
pub const DEMO_PLACEHOLDER: &str = "(demo: no transcription)";

/// Placeholder utterance returned when the provider produced no text.
pub const EMPTY_PLACEHOLDER: &str = "(empty)";

/// Which webhook triggered the turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnKind {
    /// First webhook of a call. There is nothing to transcribe yet.
    Start,
    /// Every later webhook, carrying the caller's last recording.
    Next,
}

impl TurnKind {
    /// Returns the label used in logs and spans.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Next => "next",
        }
    }
}

/// One webhook invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallTurn {
    /// Random id for log correlation within this invocation only.
    pub turn_id: Uuid,
    /// Which webhook was hit.
    pub kind: TurnKind,
    /// URL of the caller's recording. `None` on the first turn.
    pub recording_url: Option<String>,
    /// Carrier call identifier, if the carrier sent one.
    pub call_sid: Option<String>,
}

impl CallTurn {
    /// Creates the turn for a call's first webhook.
    pub fn start(call_sid: Option<String>) -> Self {
        Self {
            turn_id: Uuid::new_v4(),
            kind: TurnKind::Start,
            recording_url: None,
            call_sid: non_blank(call_sid),
        }
    }

    /// Creates a follow-up turn. Blank recording URLs are treated as absent.
    pub fn next(recording_url: Option<String>, call_sid: Option<String>) -> Self {
        Self {
            turn_id: Uuid::new_v4(),
            kind: TurnKind::Next,
            recording_url: non_blank(recording_url),
            call_sid: non_blank(call_sid),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Transcribed caller speech for one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    pub text: String,
}

impl Utterance {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The utterance used in demo mode.
    pub fn demo() -> Self {
        Self::new(DEMO_PLACEHOLDER)
    }

    /// The utterance used when the provider returned no text.
    pub fn empty() -> Self {
        Self::new(EMPTY_PLACEHOLDER)
    }

    /// Returns `true` if this is one of the fixed placeholders rather than real speech.
    pub fn is_placeholder(&self) -> bool {
        self.text == DEMO_PLACEHOLDER || self.text == EMPTY_PLACEHOLDER
    }
}

/// The decision made for a turn.
///
/// Exactly one variant is produced per turn. `End` is terminal: once it is
/// rendered the carrier hangs up and never calls back for that call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TurnOutcome {
    /// Speak `prompt`, then record the caller's next utterance.
    Continue { prompt: String },
    /// Speak `message`, then hang up.
    End { message: String },
}

impl TurnOutcome {
    pub fn greeting() -> Self {
        Self::Continue {
            prompt: GREETING.to_string(),
        }
    }

    pub fn apology() -> Self {
        Self::End {
            message: APOLOGY.to_string(),
        }
    }

    /// Returns `true` for `End`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::End { .. })
    }

    /// Returns the text spoken to the caller.
    pub fn spoken_text(&self) -> &str {
        match self {
            Self::Continue { prompt } => prompt,
            Self::End { message } => message,
        }
    }

    /// Returns the label used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Continue { .. } => "continue",
            Self::End { .. } => "end",
        }
    }
}
