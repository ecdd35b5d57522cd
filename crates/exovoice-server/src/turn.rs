//! Call-turn controller.
//!
//! Every webhook is an independent turn. The carrier keeps calling
//! `/exotel/next` until it receives a hangup document, so nothing here
//! remembers anything between turns.

use exovoice_types::{CallTurn, TurnKind, TurnOutcome, Utterance};
use exovoice_voice::{matched_phrase, TranscriptionClient, VoiceError};
use tracing::Instrument;

/// Decides the outcome of each turn.
#[derive(Debug, Clone)]
pub struct CallTurnController {
    transcriber: TranscriptionClient,
}

impl CallTurnController {
    pub fn new(transcriber: TranscriptionClient) -> Self {
        Self { transcriber }
    }

    /// Runs one turn and always produces an outcome.
    ///
    /// Transcription failures end the call with an apology instead of
    /// surfacing as a server error, so the caller never hears dead air.
    pub async fn run_turn(&self, turn: &CallTurn) -> TurnOutcome {
        let span = tracing::info_span!(
            "call_turn",
            turn_id = %turn.turn_id,
            kind = turn.kind.as_str(),
            call_sid = turn.call_sid.as_deref().unwrap_or("-")
        );

        async move {
            let outcome = match self.try_turn(turn).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::warn!(error_kind = e.kind(), "turn failed, ending call: {}", e);
                    TurnOutcome::apology()
                }
            };
            tracing::info!(outcome = outcome.label(), "turn complete");
            outcome
        }
        .instrument(span)
        .await
    }

    /// Runs one turn without the error boundary.
    ///
    /// # Errors
    ///
    /// Propagates [`VoiceError::Fetch`] and [`VoiceError::Transcription`]
    /// from the transcription client.
    pub async fn try_turn(&self, turn: &CallTurn) -> Result<TurnOutcome, VoiceError> {
        match turn.kind {
            TurnKind::Start => Ok(TurnOutcome::greeting()),
            TurnKind::Next => {
                let utterance = self
                    .transcriber
                    .transcribe(turn.recording_url.as_deref())
                    .await?;
                Ok(respond_to(&utterance))
            }
        }
    }
}

/// Chooses the reply to a caller utterance.
pub fn respond_to(utterance: &Utterance) -> TurnOutcome {
    if utterance.is_placeholder() {
        tracing::info!(placeholder = %utterance.text, "no caller speech available for turn");
    }
    let text = &utterance.text;
    match matched_phrase(text) {
        Some(phrase) => {
            tracing::debug!(phrase, "exit phrase detected");
            TurnOutcome::End {
                message: format!("You said: {}. Goodbye.", text),
            }
        }
        None => TurnOutcome::Continue {
            prompt: format!("You said: {}. Anything else?", text),
        },
    }
}
