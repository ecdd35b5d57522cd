use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Groq's OpenAI-compatible transcription endpoint.
pub const DEFAULT_TRANSCRIPTION_ENDPOINT: &str =
    "https://api.groq.com/openai/v1/audio/transcriptions";

pub const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-large-v3";

pub const DEFAULT_TRANSCRIPTION_TIMEOUT_SECS: u64 = 60;

fn default_endpoint() -> String {
    DEFAULT_TRANSCRIPTION_ENDPOINT.to_string()
}

fn default_model() -> String {
    DEFAULT_TRANSCRIPTION_MODEL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TRANSCRIPTION_TIMEOUT_SECS
}

/// Settings for the hosted transcription provider.
///
/// Without an `api_key` the client runs in demo mode and never touches the
/// network.
#[derive(Clone, Deserialize)]
pub struct TranscriptionConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Upload timeout in seconds. Default: 60.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_endpoint(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl fmt::Debug for TranscriptionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranscriptionConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl TranscriptionConfig {
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Returns the credential, treating blank values as absent.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Returns `true` when no credential is configured.
    pub fn is_demo_mode(&self) -> bool {
        self.credential().is_none()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
