//! Exotel webhook handlers.

use crate::AppState;
use axum::{
    extract::{rejection::FormRejection, Extension, Form},
    http::header,
    response::{IntoResponse, Response},
};
use exovoice_types::CallTurn;
use serde::Deserialize;
use std::sync::Arc;

/// Form fields the carrier posts to the webhooks. Everything else is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct WebhookForm {
    /// URL of the caller's last recording.
    #[serde(rename = "RecordingUrl", default)]
    pub recording_url: Option<String>,
    /// Carrier call identifier.
    #[serde(rename = "CallSid", default)]
    pub call_sid: Option<String>,
}

/// Accepts a missing or non-form body as an empty form.
fn form_or_default(form: Result<Form<WebhookForm>, FormRejection>) -> WebhookForm {
    match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::debug!("webhook body is not a form, treating as empty: {}", rejection);
            WebhookForm::default()
        }
    }
}

fn exoml(body: String) -> Response {
    (
        [(header::CONTENT_TYPE, exovoice_exoml::APPLICATION_XML)],
        body,
    )
        .into_response()
}

/// Handler for `POST /exotel/start`.
pub async fn start_handler(
    Extension(state): Extension<Arc<AppState>>,
    form: Result<Form<WebhookForm>, FormRejection>,
) -> Response {
    let form = form_or_default(form);
    let turn = CallTurn::start(form.call_sid);
    let outcome = state.controller.run_turn(&turn).await;
    exoml(exovoice_exoml::render(&outcome, &state.callback_base))
}

/// Handler for `POST /exotel/next`.
pub async fn next_handler(
    Extension(state): Extension<Arc<AppState>>,
    form: Result<Form<WebhookForm>, FormRejection>,
) -> Response {
    let form = form_or_default(form);
    let turn = CallTurn::next(form.recording_url, form.call_sid);
    let outcome = state.controller.run_turn(&turn).await;
    exoml(exovoice_exoml::render(&outcome, &state.callback_base))
}
