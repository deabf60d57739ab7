//! Mock upstream audio service for the STT/TTS proxy tests

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use axum::extract::State;
use axum::{Json, Router, routing};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

/// Mock service implementing the `/transcribe` and `/tts` upstream API
pub struct MockAudio {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockAudioState>,
}

struct MockAudioState {
    transcribe_count: AtomicU32,
    synthesize_count: AtomicU32,
    last_sample_count: AtomicUsize,
}

#[derive(Deserialize)]
struct TranscribePayload {
    wav: Vec<i16>,
}

#[derive(Deserialize)]
struct TtsPayload {
    #[allow(dead_code)]
    text: String,
    #[allow(dead_code)]
    voice_name: String,
}

impl MockAudio {
    /// Start the mock service
    pub async fn start() -> anyhow::Result<Self> {
        let state = Arc::new(MockAudioState {
            transcribe_count: AtomicU32::new(0),
            synthesize_count: AtomicU32::new(0),
            last_sample_count: AtomicUsize::new(0),
        });

        let app = Router::new()
            .route("/transcribe", routing::post(handle_transcribe))
            .route("/tts", routing::post(handle_tts))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for configuring the mock as an audio upstream
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of transcription requests received
    pub fn transcribe_count(&self) -> u32 {
        self.state.transcribe_count.load(Ordering::Relaxed)
    }

    /// Number of synthesis requests received
    pub fn synthesize_count(&self) -> u32 {
        self.state.synthesize_count.load(Ordering::Relaxed)
    }

    /// Sample count of the last transcription request
    pub fn last_sample_count(&self) -> usize {
        self.state.last_sample_count.load(Ordering::Relaxed)
    }
}

impl Drop for MockAudio {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_transcribe(
    State(state): State<Arc<MockAudioState>>,
    Json(payload): Json<TranscribePayload>,
) -> Json<serde_json::Value> {
    state.transcribe_count.fetch_add(1, Ordering::Relaxed);
    state.last_sample_count.store(payload.wav.len(), Ordering::Relaxed);
    Json(serde_json::json!({"text": "hello from mock"}))
}

async fn handle_tts(
    State(state): State<Arc<MockAudioState>>,
    Json(_payload): Json<TtsPayload>,
) -> Json<serde_json::Value> {
    state.synthesize_count.fetch_add(1, Ordering::Relaxed);
    Json(serde_json::json!({"samplerate": 22050, "wav": [0.0, 0.25, -0.25]}))
}
