//! Exotel voice webhook server.
//!
//! Answers inbound calls, transcribes each caller recording, and replies with
//! ExoML that either records the next utterance or hangs up.

pub mod api_exotel;
pub mod config;
pub mod turn;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Json, Router,
};
use exovoice_voice::{TranscriptionClient, VoiceError};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use turn::CallTurnController;

/// Application state shared across all request handlers.
///
/// Immutable after startup. Concurrent turns share nothing mutable.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Turn controller wrapping the transcription client.
    pub controller: Arc<CallTurnController>,
    /// Public base URL used for the `Record` action.
    pub callback_base: String,
}

impl AppState {
    /// Builds the state from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`VoiceError::Config`] if the HTTP client cannot be built.
    pub fn from_config(config: &config::Config) -> Result<Self, VoiceError> {
        let transcriber = TranscriptionClient::new(config.transcription.clone())?;
        Ok(Self {
            controller: Arc::new(CallTurnController::new(transcriber)),
            callback_base: config.callback.base_url.clone(),
        })
    }
}

/// Maximum request body size (64 KiB). Webhook form posts are tiny.
const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health))
        .route("/exotel/start", post(api_exotel::start_handler))
        .route("/exotel/next", post(api_exotel::next_handler))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(Arc::new(state)))
}
