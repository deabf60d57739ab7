//! Generation backends
//!
//! A backend is an opaque capability that turns a conversation into either
//! an incremental chunk stream or one complete completion. The two shapes
//! are resolved once, here at the invocation boundary, so downstream code
//! never inspects the response at runtime.

pub mod openai;

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;
use parley_config::GenerationParameters;

pub use openai::OpenAiEndpoint;

use crate::error::ChatError;
use crate::protocol::openai::{OpenAiResponse, OpenAiStreamChunk};
use crate::types::{ChatMessage, ToolResult};

/// Request bundle passed to a generation endpoint
#[derive(Debug)]
pub struct EndpointRequest<'a> {
    /// Conversation messages, oldest first
    pub messages: &'a [ChatMessage],
    /// System preprompt for this generation
    pub preprompt: Option<&'a str>,
    /// The last assistant message is being continued rather than replaced
    pub continue_message: bool,
    /// Merged generation parameters
    pub parameters: GenerationParameters,
    /// Results of earlier tool invocations
    pub tool_results: &'a [ToolResult],
}

/// Stream of partial completion chunks from a streaming backend
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<OpenAiStreamChunk, ChatError>> + Send>>;

/// Backend response shape, resolved once per invocation
pub enum EndpointOutput {
    /// Incrementally updating stream of partial completions
    Stream(ChunkStream),
    /// One complete chat completion
    Complete(OpenAiResponse),
}

/// A generation backend capable of producing chat completions
#[async_trait]
pub trait Endpoint: Send + Sync {
    /// Invoke the backend once for the given conversation
    ///
    /// Backend failures (network errors, non-2xx statuses, malformed
    /// payloads) propagate unchanged; no retry happens at this layer.
    async fn invoke(&self, request: EndpointRequest<'_>) -> Result<EndpointOutput, ChatError>;
}
