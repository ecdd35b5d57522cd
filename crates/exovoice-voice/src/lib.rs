//! Voice plumbing for exovoice.
//!
//! Fetches a caller's recording from the carrier, submits it to a hosted
//! Whisper transcription endpoint, and classifies the resulting text as
//! ending the conversation or not.

pub mod config;
pub mod error;
pub mod exit;
pub mod stt;

pub use config::{
    TranscriptionConfig, DEFAULT_TRANSCRIPTION_ENDPOINT, DEFAULT_TRANSCRIPTION_MODEL,
    DEFAULT_TRANSCRIPTION_TIMEOUT_SECS,
};
pub use error::VoiceError;
pub use exit::{matched_phrase, should_end, EXIT_PHRASES};
pub use stt::TranscriptionClient;
