//! OpenAI-compatible generation endpoint

use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures_util::StreamExt;
use http::{HeaderMap, HeaderName, HeaderValue};
use parley_config::EndpointConfig;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use super::{ChunkStream, Endpoint, EndpointOutput, EndpointRequest};
use crate::error::ChatError;
use crate::protocol::openai::{
    OpenAiContent, OpenAiContentPart, OpenAiImageUrl, OpenAiMessage, OpenAiRequest, OpenAiResponse, OpenAiStreamChunk,
};
use crate::types::{ChatMessage, Role};

/// Default `OpenAI` API base URL
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI-compatible chat completions endpoint
pub struct OpenAiEndpoint {
    model: String,
    client: Client,
    base_url: Url,
    api_key: Option<SecretString>,
    stream: bool,
    extra_headers: HeaderMap,
}

impl OpenAiEndpoint {
    /// Create from endpoint configuration
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Internal` if a configured extra header is not a
    /// valid HTTP header.
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded default base URL is invalid (should never happen).
    pub fn new(model: String, config: &EndpointConfig) -> Result<Self, ChatError> {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| Url::parse(DEFAULT_BASE_URL).expect("valid default URL"));

        let mut extra_headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name = name
                .parse::<HeaderName>()
                .map_err(|e| ChatError::Internal(anyhow::anyhow!("invalid endpoint header name '{name}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ChatError::Internal(anyhow::anyhow!("invalid endpoint header value for '{name}': {e}")))?;
            extra_headers.insert(name, value);
        }

        Ok(Self {
            model,
            client: Client::new(),
            base_url,
            api_key: config.api_key.clone(),
            stream: config.stream,
            extra_headers,
        })
    }

    /// Build the chat completions URL
    fn completions_url(&self) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/chat/completions")
    }
}

#[async_trait]
impl Endpoint for OpenAiEndpoint {
    async fn invoke(&self, request: EndpointRequest<'_>) -> Result<EndpointOutput, ChatError> {
        let wire_request = wire_request(&self.model, &request, self.stream);

        tracing::debug!(
            model = %self.model,
            stream = self.stream,
            continue_message = request.continue_message,
            messages = wire_request.messages.len(),
            "invoking generation endpoint"
        );

        let mut builder = self
            .client
            .post(self.completions_url())
            .json(&wire_request)
            .headers(self.extra_headers.clone());

        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!(model = %self.model, error = %e, "backend request failed");
            ChatError::Upstream(e.to_string())
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(model = %self.model, status = %status, "backend returned error");
            return Err(ChatError::Upstream(format!("backend returned {status}: {body}")));
        }

        if self.stream {
            Ok(EndpointOutput::Stream(sse_chunks(response)))
        } else {
            let completion: OpenAiResponse = response
                .json()
                .await
                .map_err(|e| ChatError::Upstream(format!("failed to parse backend response: {e}")))?;
            Ok(EndpointOutput::Complete(completion))
        }
    }
}

/// Decode an SSE response body into a stream of completion chunks
///
/// `[DONE]` terminates the stream; data that fails to parse as a chunk is
/// skipped with a debug log, matching how compatible backends interleave
/// comments and vendor extensions.
fn sse_chunks(response: reqwest::Response) -> ChunkStream {
    Box::pin(async_stream::try_stream! {
        let mut events = std::pin::pin!(response.bytes_stream().eventsource());

        while let Some(event) = events.next().await {
            let event = event.map_err(|e| ChatError::Streaming(e.to_string()))?;
            let data = event.data.trim().to_owned();
            if data == "[DONE]" {
                break;
            }

            match serde_json::from_str::<OpenAiStreamChunk>(&data) {
                Ok(chunk) => yield chunk,
                Err(e) => {
                    tracing::debug!(error = %e, data = %data, "skipping unparseable stream chunk");
                }
            }
        }
    })
}

/// Build the wire request for one generation
///
/// The first wire message is always a system message carrying the preprompt
/// (empty when none was supplied); tool results append as `tool` messages
/// after the conversation.
fn wire_request(model: &str, request: &EndpointRequest<'_>, stream: bool) -> OpenAiRequest {
    let mut messages: Vec<OpenAiMessage> = request.messages.iter().map(wire_message).collect();

    for result in request.tool_results {
        messages.push(OpenAiMessage {
            role: "tool".to_owned(),
            content: Some(OpenAiContent::Text(result.content.clone())),
            tool_call_id: Some(result.tool_call_id.clone()),
        });
    }

    if messages.first().is_none_or(|m| m.role != "system") {
        messages.insert(
            0,
            OpenAiMessage {
                role: "system".to_owned(),
                content: None,
                tool_call_id: None,
            },
        );
    }

    if let Some(first) = messages.first_mut() {
        first.content = Some(OpenAiContent::Text(request.preprompt.unwrap_or_default().to_owned()));
    }

    let parameters = &request.parameters;

    OpenAiRequest {
        model: model.to_owned(),
        messages,
        max_tokens: parameters.max_new_tokens,
        stop: if parameters.stop.is_empty() {
            None
        } else {
            Some(parameters.stop.clone())
        },
        temperature: parameters.temperature,
        top_p: parameters.top_p,
        frequency_penalty: parameters.repetition_penalty,
        stream: if stream { Some(true) } else { None },
    }
}

/// Convert a conversation message to the wire format
///
/// User messages become multipart content so attached images ride along as
/// data URIs; other roles pass their text through unchanged.
fn wire_message(message: &ChatMessage) -> OpenAiMessage {
    let role = match message.role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
    };

    let content = match message.role {
        Role::User => {
            let mut parts: Vec<OpenAiContentPart> = message
                .files
                .iter()
                .map(|file| OpenAiContentPart::ImageUrl {
                    image_url: OpenAiImageUrl {
                        url: format!("data:{};base64,{}", file.mime, file.data),
                    },
                })
                .collect();
            parts.push(OpenAiContentPart::Text {
                text: message.content.clone(),
            });
            OpenAiContent::Parts(parts)
        }
        _ => OpenAiContent::Text(message.content.clone()),
    };

    OpenAiMessage {
        role: role.to_owned(),
        content: Some(content),
        tool_call_id: None,
    }
}
