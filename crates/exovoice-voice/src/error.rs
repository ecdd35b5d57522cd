use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoiceError {
    /// Downloading the caller's recording failed.
    #[error("recording fetch failed: {0}")]
    Fetch(String),

    /// The transcription provider rejected or failed the upload.
    #[error("transcription failed: {0}")]
    Transcription(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl VoiceError {
    /// Stable label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "fetch",
            Self::Transcription(_) => "transcription",
            Self::Config(_) => "config",
        }
    }
}
