//! Mock OpenAI-compatible generation backend for integration tests
//!
//! Returns canned responses: a single completion for non-streaming
//! requests, a scripted SSE chunk sequence for streaming ones.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use futures_util::{StreamExt, stream};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

/// Mock generation backend with predictable responses
pub struct MockBackend {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

struct MockState {
    completion_count: AtomicU32,
    /// Content returned for non-streaming requests
    response_content: String,
    /// Deltas emitted one chunk at a time for streaming requests
    stream_script: Vec<String>,
    /// Pause before each streamed chunk
    chunk_delay: Duration,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionRequest {
    #[allow(dead_code)]
    model: String,
    #[allow(dead_code)]
    messages: Vec<serde_json::Value>,
    #[serde(default)]
    stream: Option<bool>,
}

impl MockBackend {
    /// Start a mock that answers non-streaming requests with `content`
    pub async fn start(content: &str) -> anyhow::Result<Self> {
        Self::start_inner(content.to_owned(), Vec::new(), Duration::ZERO).await
    }

    /// Start a mock that streams the given deltas, pausing `chunk_delay`
    /// before each one
    pub async fn start_streaming(deltas: &[&str], chunk_delay: Duration) -> anyhow::Result<Self> {
        Self::start_inner(
            deltas.concat(),
            deltas.iter().map(|d| (*d).to_owned()).collect(),
            chunk_delay,
        )
        .await
    }

    async fn start_inner(content: String, script: Vec<String>, chunk_delay: Duration) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            completion_count: AtomicU32::new(0),
            response_content: content,
            stream_script: script,
            chunk_delay,
        });

        let app = Router::new()
            .route("/v1/chat/completions", routing::post(handle_chat_completions))
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

    /// Base URL for configuring the mock as an endpoint
    ///
    /// Includes `/v1` since the endpoint appends `/chat/completions`
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Number of completion requests received
    pub fn completion_count(&self) -> u32 {
        self.state.completion_count.load(Ordering::Relaxed)
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_chat_completions(
    State(state): State<Arc<MockState>>,
    Json(request): Json<ChatCompletionRequest>,
) -> Response {
    state.completion_count.fetch_add(1, Ordering::Relaxed);

    if request.stream.unwrap_or(false) {
        let delay = state.chunk_delay;
        let chunks = state.stream_script.clone();

        let events = stream::iter(chunks)
            .then(move |delta| async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok::<_, Infallible>(Event::default().data(chunk_json(&delta)))
            })
            .chain(stream::once(async {
                Ok(Event::default().data("[DONE]".to_owned()))
            }));

        Sse::new(events).into_response()
    } else {
        Json(serde_json::json!({
            "id": "chatcmpl-mock",
            "object": "chat.completion",
            "created": 0,
            "model": "mock",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": state.response_content},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 1, "completion_tokens": 1, "total_tokens": 2}
        }))
        .into_response()
    }
}

fn chunk_json(delta: &str) -> String {
    serde_json::json!({
        "id": "chatcmpl-mock",
        "object": "chat.completion.chunk",
        "created": 0,
        "model": "mock",
        "choices": [{
            "index": 0,
            "delta": {"content": delta},
            "finish_reason": serde_json::Value::Null
        }]
    })
    .to_string()
}
