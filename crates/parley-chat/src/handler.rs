//! Axum route handlers for the chat API

use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use futures_util::{Stream, StreamExt};
use http::StatusCode;
use parley_config::GenerationParameters;
use parley_core::{HttpError, unix_millis};
use serde::{Deserialize, Serialize};

use crate::error::ChatError;
use crate::generate::{GenerateContext, generate};
use crate::state::ChatState;
use crate::types::{ChatMessage, MessageUpdate, ToolResult};

/// Build the chat router with all endpoints
pub fn chat_router(state: ChatState) -> Router {
    Router::new()
        .route("/api/models", routing::get(list_models))
        .route("/api/conversation/{id}", routing::post(conversation))
        .route("/api/conversation/{id}/stop", routing::post(stop_conversation))
        .with_state(state)
}

/// Body of `POST /api/conversation/{id}`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Name of the configured model to generate with
    pub model: String,
    /// Conversation messages, oldest first
    pub messages: Vec<ChatMessage>,
    /// System preprompt overriding the model default
    #[serde(default)]
    pub preprompt: Option<String>,
    /// Continue the last assistant message instead of starting a new one
    #[serde(default)]
    pub continue_message: bool,
    /// Per-request generation parameter overrides
    #[serde(default)]
    pub settings: Option<GenerationParameters>,
    /// Results of earlier tool invocations
    #[serde(default)]
    pub tool_results: Vec<ToolResult>,
}

/// Handle `POST /api/conversation/{id}`
///
/// Responds with an SSE stream of message updates. A stream that ends
/// without a `finalAnswer` event was aborted.
async fn conversation(
    State(state): State<ChatState>,
    Path(conversation_id): Path<String>,
    Json(request): Json<ChatRequest>,
) -> Response {
    let model = match state.model(&request.model) {
        Ok(model) => model,
        Err(e) => return error_response(&e),
    };

    if let Some(settings) = &request.settings
        && settings.stop.iter().any(String::is_empty)
    {
        return error_response(&ChatError::InvalidRequest(
            "stop sequences must not be empty".to_owned(),
        ));
    }

    let context = GenerateContext {
        model,
        conversation_id,
        prompted_at: unix_millis(),
        messages: request.messages,
        continue_message: request.continue_message,
        settings: request.settings,
        aborts: state.aborts().clone(),
    };

    update_stream_response(generate(context, request.tool_results, request.preprompt)).into_response()
}

/// Handle `POST /api/conversation/{id}/stop`
///
/// Records a stop request for the conversation; any generation started
/// before this moment halts at its next opportunity.
async fn stop_conversation(State(state): State<ChatState>, Path(conversation_id): Path<String>) -> StatusCode {
    state.aborts().request_stop(&conversation_id);
    tracing::debug!(conversation = %conversation_id, "stop requested");
    StatusCode::OK
}

/// Model descriptor returned by `GET /api/models`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ModelInfo {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    preprompt: Option<String>,
    parameters: GenerationParameters,
}

/// Handle `GET /api/models`
async fn list_models(State(state): State<ChatState>) -> Json<Vec<ModelInfo>> {
    let models = state
        .models()
        .map(|model| ModelInfo {
            name: model.name.clone(),
            preprompt: model.preprompt.clone(),
            parameters: model.parameters.clone(),
        })
        .collect();

    Json(models)
}

/// Build the SSE response for a stream of message updates
///
/// Each update is one `data:` event. Errors surface as a terminal event
/// carrying an error payload — the HTTP status is already committed by the
/// time a mid-stream failure happens.
fn update_stream_response(
    updates: impl Stream<Item = Result<MessageUpdate, ChatError>> + Send + 'static,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let events = updates.map(|result| match result {
        Ok(update) => {
            let data = serde_json::to_string(&update).unwrap_or_default();
            Ok(Event::default().data(data))
        }
        Err(e) => {
            let data = serde_json::json!({
                "error": {
                    "message": e.client_message(),
                    "type": e.error_type(),
                }
            });
            Ok(Event::default().data(data.to_string()))
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Convert a chat error to a JSON error response
fn error_response(error: &ChatError) -> Response {
    let status = error.status_code();
    let body = serde_json::json!({
        "error": {
            "message": error.client_message(),
            "type": error.error_type(),
        }
    });

    (status, Json(body)).into_response()
}
