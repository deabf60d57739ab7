//! Normalization of backend responses into generation events
//!
//! Both backend shapes collapse into one lazy event sequence: zero or more
//! tokens followed by exactly one final answer. Backend failures propagate
//! unchanged through the stream; nothing is retried or masked here because
//! callers surface generation failures to the end user.

use std::pin::Pin;

use futures_util::{Stream, StreamExt, stream};

use crate::endpoint::EndpointOutput;
use crate::error::ChatError;
use crate::types::{GenerationEvent, GenerationToken};

/// Lazy, finite, non-restartable sequence of generation events
pub type GenerationStream = Pin<Box<dyn Stream<Item = Result<GenerationEvent, ChatError>> + Send>>;

/// Normalize a backend response into a stream of generation events
///
/// Streaming responses yield one token per content delta (synthetic id,
/// never special) and a final answer with the accumulated text once the
/// chunk stream ends. Single-shot responses yield the final answer
/// immediately, with an empty text when the backend returned no content.
pub fn generation_events(output: EndpointOutput) -> GenerationStream {
    match output {
        EndpointOutput::Complete(completion) => {
            let text = completion
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content)
                .unwrap_or_default();
            let event: Result<GenerationEvent, ChatError> = Ok(GenerationEvent::FinalAnswer { text });
            Box::pin(stream::once(async move { event }))
        }
        EndpointOutput::Stream(chunks) => Box::pin(async_stream::try_stream! {
            let mut chunks = chunks;
            let mut generated = String::new();

            while let Some(chunk) = chunks.next().await {
                let chunk = chunk?;
                let Some(delta) = chunk
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|choice| choice.delta.content)
                else {
                    continue;
                };

                generated.push_str(&delta);
                yield GenerationEvent::Token(GenerationToken {
                    id: 0,
                    text: delta,
                    special: false,
                });
            }

            yield GenerationEvent::FinalAnswer { text: generated };
        }),
    }
}
