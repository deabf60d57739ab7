#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! Text-to-speech proxy endpoint
//!
//! Thin relay between the conversational UI and a synthesis service, plus
//! the sentence splitter used to feed long answers to synthesis in
//! listenable pieces.

mod error;
mod http_client;
mod sentence;
mod server;
mod types;

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::post};

pub use error::{Result, TtsError};
pub use sentence::split_sentences;
pub use server::Server;
pub use types::{SpeechRequest, SpeechResponse};

/// Build the TTS proxy from configuration
///
/// Returns `None` when no upstream is configured — the route is simply not
/// mounted in that case.
///
/// # Errors
///
/// Returns an error if the HTTP client fails to initialize
pub fn build_server(config: &parley_config::Config) -> anyhow::Result<Option<Arc<Server>>> {
    let Some(upstream) = config.tts.upstream.clone() else {
        tracing::debug!("no TTS upstream configured");
        return Ok(None);
    };

    let server = Server::new(upstream, config.tts.default_voice.clone())
        .map_err(|e| anyhow::anyhow!("failed to initialize TTS proxy: {e}"))?;
    Ok(Some(Arc::new(server)))
}

/// Create the endpoint router for TTS
pub fn endpoint_router() -> Router<Arc<Server>> {
    Router::new().route("/api/tts", post(synthesize))
}

/// Handle speech synthesis requests
async fn synthesize(
    State(server): State<Arc<Server>>,
    Json(request): Json<SpeechRequest>,
) -> Result<Json<SpeechResponse>> {
    tracing::debug!(chars = request.text.len(), "TTS synthesis handler called");

    let response = server.synthesize(request).await?;

    tracing::debug!("speech synthesis complete");

    Ok(Json(response))
}
