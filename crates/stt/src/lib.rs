#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! Speech-to-text proxy endpoint
//!
//! Thin relay between the conversational UI and a transcription service:
//! the audio payload passes through unchanged and the upstream response is
//! relayed back as-is.

mod error;
mod http_client;
mod server;
mod types;

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::post};

pub use error::{Result, SttError};
pub use server::Server;
pub use types::{TranscriptionRequest, TranscriptionResponse};

/// Build the STT proxy from configuration
///
/// Returns `None` when no upstream is configured — the route is simply not
/// mounted in that case.
///
/// # Errors
///
/// Returns an error if the HTTP client fails to initialize
pub fn build_server(config: &parley_config::Config) -> anyhow::Result<Option<Arc<Server>>> {
    let Some(upstream) = config.stt.upstream.clone() else {
        tracing::debug!("no STT upstream configured");
        return Ok(None);
    };

    let server = Server::new(upstream).map_err(|e| anyhow::anyhow!("failed to initialize STT proxy: {e}"))?;
    Ok(Some(Arc::new(server)))
}

/// Create the endpoint router for STT
pub fn endpoint_router() -> Router<Arc<Server>> {
    Router::new().route("/api/stt", post(transcribe))
}

/// Handle transcription requests
async fn transcribe(
    State(server): State<Arc<Server>>,
    Json(request): Json<TranscriptionRequest>,
) -> Result<Json<TranscriptionResponse>> {
    tracing::debug!(samples = request.wav.len(), "STT transcription handler called");

    let response = server.transcribe(request).await?;

    tracing::debug!("transcription complete");

    Ok(Json(response))
}
