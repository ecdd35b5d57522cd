use crate::config::TranscriptionConfig;
use crate::error::VoiceError;
use exovoice_types::Utterance;
use reqwest::multipart::{Form, Part};
use reqwest::Response;

/// Maximum recording size accepted for upload (10 MiB). A five-second
/// carrier recording is a few hundred KiB at most.
const MAX_RECORDING_BYTES: usize = 10 * 1024 * 1024;

/// Longest slice of an error body kept in error messages.
const MAX_ERROR_BODY_CHARS: usize = 512;

const AUDIO_FILE_NAME: &str = "audio.wav";
const AUDIO_MIME: &str = "audio/wav";

/// Downloads a caller recording and transcribes it with a hosted Whisper endpoint.
///
/// Holds one pooled `reqwest::Client`; cloning the client is cheap and shares
/// the pool.
#[derive(Debug, Clone)]
pub struct TranscriptionClient {
    config: TranscriptionConfig,
    http: reqwest::Client,
}

impl TranscriptionClient {
    pub fn new(config: TranscriptionConfig) -> Result<Self, VoiceError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("exovoice/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| VoiceError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { config, http })
    }

    /// Returns `true` when no credential is configured.
    pub fn is_demo_mode(&self) -> bool {
        self.config.is_demo_mode()
    }

    /// Transcribes the recording at `recording_url`.
    ///
    /// In demo mode this returns the demo placeholder without any network
    /// call, whatever the URL. A missing or blank URL returns the empty
    /// placeholder, also without a network call.
    ///
    /// # Errors
    ///
    /// Returns [`VoiceError::Fetch`] if the recording cannot be downloaded and
    /// [`VoiceError::Transcription`] if the provider call fails.
    pub async fn transcribe(&self, recording_url: Option<&str>) -> Result<Utterance, VoiceError> {
        let Some(api_key) = self.config.credential() else {
            tracing::debug!("no transcription credential configured, returning demo placeholder");
            return Ok(Utterance::demo());
        };

        let Some(url) = recording_url.map(str::trim).filter(|url| !url.is_empty()) else {
            tracing::debug!("no recording reference on turn, skipping transcription");
            return Ok(Utterance::empty());
        };

        let audio = self.fetch_recording(url).await?;
        self.upload(api_key, audio).await
    }

    /// Downloads the raw recording bytes.
    pub async fn fetch_recording(&self, url: &str) -> Result<Vec<u8>, VoiceError> {
        let mut response = self
            .http
            .get(url)
            .timeout(self.config.timeout())
            .send()
            .await
            .map_err(|e| VoiceError::Fetch(format!("request to recording host failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(VoiceError::Fetch(format!(
                "recording host returned {}",
                status
            )));
        }

        if let Some(len) = response.content_length() {
            if len > MAX_RECORDING_BYTES as u64 {
                return Err(oversized(len));
            }
        }

        // Content-Length may be absent (chunked), so the cap is enforced per chunk.
        let mut audio = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| VoiceError::Fetch(format!("failed to read recording body: {}", e)))?
        {
            if audio.len() + chunk.len() > MAX_RECORDING_BYTES {
                return Err(oversized((audio.len() + chunk.len()) as u64));
            }
            audio.extend_from_slice(&chunk);
        }

        tracing::debug!(bytes = audio.len(), "downloaded recording");
        Ok(audio)
    }

    async fn upload(&self, api_key: &str, audio: Vec<u8>) -> Result<Utterance, VoiceError> {
        let part = Part::bytes(audio)
            .file_name(AUDIO_FILE_NAME)
            .mime_str(AUDIO_MIME)
            .map_err(|e| VoiceError::Transcription(e.to_string()))?;
        let form = Form::new()
            .part("file", part)
            .text("model", self.config.model.clone());

        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .multipart(form)
            .timeout(self.config.timeout())
            .send()
            .await
            .map_err(|e| {
                VoiceError::Transcription(format!("request to provider failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(provider_error(response).await);
        }

        let json: serde_json::Value = response.json().await.map_err(|e| {
            VoiceError::Transcription(format!("invalid provider response: {}", e))
        })?;

        Ok(utterance_from_response(&json))
    }
}

fn oversized(len: u64) -> VoiceError {
    VoiceError::Fetch(format!(
        "recording exceeds maximum size: at least {} bytes (limit: {} bytes)",
        len, MAX_RECORDING_BYTES
    ))
}

async fn provider_error(response: Response) -> VoiceError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let body: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    VoiceError::Transcription(format!("provider returned {}: {}", status, body))
}

/// Extracts the transcript, falling back to the empty placeholder when the
/// provider sent no usable `text`.
fn utterance_from_response(json: &serde_json::Value) -> Utterance {
    json.get("text")
        .and_then(|t| t.as_str())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(Utterance::new)
        .unwrap_or_else(Utterance::empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_field_becomes_utterance() {
        let utterance = utterance_from_response(&json!({ "text": " I am done, thanks" }));
        assert_eq!(utterance.text, "I am done, thanks");
    }

    #[test]
    fn missing_or_unusable_text_is_empty_placeholder() {
        assert_eq!(utterance_from_response(&json!({})), Utterance::empty());
        assert_eq!(utterance_from_response(&json!({ "text": 42 })), Utterance::empty());
        assert_eq!(utterance_from_response(&json!({ "text": "  " })), Utterance::empty());
    }

    #[tokio::test]
    async fn demo_mode_ignores_recording_url() {
        let client = TranscriptionClient::new(TranscriptionConfig::default()).unwrap();
        assert!(client.is_demo_mode());

        // Port 1 is never listening; demo mode must not try it.
        let utterance = client
            .transcribe(Some("http://127.0.0.1:1/recording.wav"))
            .await
            .unwrap();
        assert_eq!(utterance, Utterance::demo());
    }

    #[tokio::test]
    async fn missing_recording_skips_network() {
        let config = TranscriptionConfig {
            endpoint: "http://127.0.0.1:1/transcribe".to_string(),
            ..TranscriptionConfig::with_api_key("gsk_test")
        };
        let client = TranscriptionClient::new(config).unwrap();

        assert_eq!(client.transcribe(None).await.unwrap(), Utterance::empty());
        assert_eq!(client.transcribe(Some("  ")).await.unwrap(), Utterance::empty());
    }
}
