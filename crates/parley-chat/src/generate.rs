//! Drives one generation and relays it to the caller as message updates
//!
//! The relay is a pull-driven stream: it suspends between updates and only
//! advances when the caller asks for the next one, so dropping the stream
//! (client disconnect) cancels the in-flight backend request.

use std::sync::Arc;

use async_stream::try_stream;
use futures_util::{Stream, StreamExt};
use parley_config::GenerationParameters;

use crate::abort::AbortRegistry;
use crate::convert::{GenerationStream, generation_events};
use crate::endpoint::EndpointRequest;
use crate::error::ChatError;
use crate::state::ChatModel;
use crate::types::{ChatMessage, GenerationEvent, GenerationToken, MessageUpdate, ToolResult};

/// Everything one generation run needs
pub struct GenerateContext {
    /// Model to generate with (declared stop sequences, endpoint handle)
    pub model: Arc<ChatModel>,
    /// Conversation this generation belongs to
    pub conversation_id: String,
    /// When the generation started, unix milliseconds
    pub prompted_at: u64,
    /// Conversation messages, oldest first
    pub messages: Vec<ChatMessage>,
    /// The last assistant message is being continued rather than replaced
    pub continue_message: bool,
    /// Per-request parameter overrides
    pub settings: Option<GenerationParameters>,
    /// Shared stop-request registry
    pub aborts: AbortRegistry,
}

/// How a generation run ended
///
/// `Exhausted` — the backend stream ended with neither a final answer nor
/// an observed stop request. Callers cannot tell it apart from `Aborted`
/// (the update stream just ends); the distinction exists for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Completed { interrupted: bool },
    Aborted,
    Exhausted,
}

/// Run one generation and stream back message updates
///
/// Yields a `Stream` update per visible token and at most one terminal
/// `FinalAnswer`. The sequence ends without a final answer when a stop was
/// requested for the conversation after `prompted_at`, or when the backend
/// stopped producing events without completing.
pub fn generate(
    context: GenerateContext,
    tool_results: Vec<ToolResult>,
    preprompt: Option<String>,
) -> impl Stream<Item = Result<MessageUpdate, ChatError>> {
    try_stream! {
        let parameters = context.model.parameters.merged(context.settings.as_ref());
        let stop = parameters.stop.clone();
        let preprompt = preprompt.or_else(|| context.model.preprompt.clone());

        let output = context
            .model
            .endpoint
            .invoke(EndpointRequest {
                messages: &context.messages,
                preprompt: preprompt.as_deref(),
                continue_message: context.continue_message,
                parameters,
                tool_results: &tool_results,
            })
            .await?;

        let mut updates = std::pin::pin!(relay_updates(
            generation_events(output),
            stop,
            context.conversation_id,
            context.prompted_at,
            context.aborts,
        ));

        while let Some(update) = updates.next().await {
            yield update?;
        }
    }
}

/// Relay generation events as message updates
///
/// Special tokens and tokens that are themselves declared stop sequences
/// are withheld — they mark structure, not content, and emitting them would
/// leave the streamed prefix inconsistent with the final trimmed text. The
/// stop registry is consulted after every event, emitted or skipped.
fn relay_updates(
    events: GenerationStream,
    stop: Vec<String>,
    conversation_id: String,
    prompted_at: u64,
    aborts: AbortRegistry,
) -> impl Stream<Item = Result<MessageUpdate, ChatError>> {
    try_stream! {
        let mut events = events;
        let mut last_token: Option<GenerationToken> = None;
        let mut token_count: u32 = 0;
        let mut outcome = Outcome::Exhausted;

        while let Some(event) = events.next().await {
            match event? {
                GenerationEvent::FinalAnswer { text } => {
                    let (text, interrupted) = finish_answer(&text, last_token.as_ref(), &stop);
                    yield MessageUpdate::FinalAnswer { text, interrupted };
                    outcome = Outcome::Completed { interrupted };
                    break;
                }
                GenerationEvent::Token(token) => {
                    if token.special {
                        tracing::trace!(token = %token.text, "skipping special token");
                    } else if stop.iter().any(|sequence| *sequence == token.text) {
                        tracing::trace!(token = %token.text, "withholding stop sequence token");
                    } else {
                        token_count += 1;
                        yield MessageUpdate::Stream {
                            token: token.text.clone(),
                        };
                    }
                    last_token = Some(token);
                }
            }

            if aborts.stop_requested_after(&conversation_id, prompted_at) {
                outcome = Outcome::Aborted;
                break;
            }
        }

        tracing::debug!(
            conversation = %conversation_id,
            token_count,
            ?outcome,
            "generation finished"
        );
    }
}

/// Trim and classify the accumulated text of a completed generation
///
/// Trailing whitespace goes first. Stop sequences are checked in the order
/// the model declares them; the first one found to be a suffix is stripped
/// and marks the completion clean. With no suffix match, the completion is
/// interrupted when the last observed token exists, is not special, and is
/// not itself a declared stop sequence — the backend stopped without
/// reaching a recognized boundary.
fn finish_answer(text: &str, last_token: Option<&GenerationToken>, stop: &[String]) -> (String, bool) {
    let mut text = text.trim_end().to_owned();
    let mut interrupted =
        last_token.is_some_and(|token| !token.special && !stop.iter().any(|sequence| *sequence == token.text));

    for sequence in stop {
        if sequence.is_empty() {
            continue;
        }
        if text.ends_with(sequence.as_str()) {
            text.truncate(text.len() - sequence.len());
            interrupted = false;
            tracing::trace!(stop = %sequence, "stripped stop sequence from final answer");
            break;
        }
    }

    (text, interrupted)
}

#[cfg(test)]
mod tests {
    use futures_util::{TryStreamExt, stream};

    use super::*;

    fn token(text: &str) -> GenerationEvent {
        GenerationEvent::Token(GenerationToken::content(text))
    }

    fn special(text: &str) -> GenerationEvent {
        GenerationEvent::Token(GenerationToken {
            id: 0,
            text: text.to_owned(),
            special: true,
        })
    }

    fn final_answer(text: &str) -> GenerationEvent {
        GenerationEvent::FinalAnswer { text: text.to_owned() }
    }

    fn events(items: Vec<GenerationEvent>) -> GenerationStream {
        Box::pin(stream::iter(items.into_iter().map(Ok)))
    }

    async fn run(items: Vec<GenerationEvent>, stop: &[&str], aborts: AbortRegistry, prompted_at: u64) -> Vec<MessageUpdate> {
        relay_updates(
            events(items),
            stop.iter().map(|s| (*s).to_owned()).collect(),
            "conv".to_owned(),
            prompted_at,
            aborts,
        )
        .try_collect()
        .await
        .unwrap()
    }

    async fn run_plain(items: Vec<GenerationEvent>, stop: &[&str]) -> Vec<MessageUpdate> {
        run(items, stop, AbortRegistry::new(), 0).await
    }

    #[tokio::test]
    async fn single_shot_without_stops_is_clean() {
        let updates = run_plain(vec![final_answer("hello world \n")], &[]).await;
        assert_eq!(
            updates,
            vec![MessageUpdate::FinalAnswer {
                text: "hello world".to_owned(),
                interrupted: false,
            }]
        );
    }

    #[tokio::test]
    async fn stop_suffix_is_stripped_and_token_withheld() {
        let updates = run_plain(
            vec![token("hel"), token("lo"), token("</s>"), final_answer("hello</s>")],
            &["</s>"],
        )
        .await;

        assert_eq!(
            updates,
            vec![
                MessageUpdate::Stream { token: "hel".to_owned() },
                MessageUpdate::Stream { token: "lo".to_owned() },
                MessageUpdate::FinalAnswer {
                    text: "hello".to_owned(),
                    interrupted: false,
                },
            ]
        );
    }

    #[tokio::test]
    async fn missing_stop_suffix_marks_interrupted() {
        let updates = run_plain(vec![token("hel"), token("lo"), final_answer("hello")], &["</s>"]).await;

        assert_eq!(
            updates.last(),
            Some(&MessageUpdate::FinalAnswer {
                text: "hello".to_owned(),
                interrupted: true,
            })
        );
    }

    #[tokio::test]
    async fn special_terminating_token_is_not_interrupted() {
        let updates = run_plain(vec![token("hi"), special("<|end|>"), final_answer("hi")], &["</s>"]).await;

        assert_eq!(
            updates,
            vec![
                MessageUpdate::Stream { token: "hi".to_owned() },
                MessageUpdate::FinalAnswer {
                    text: "hi".to_owned(),
                    interrupted: false,
                },
            ]
        );
    }

    #[tokio::test]
    async fn terminating_token_in_stop_list_is_not_interrupted() {
        // Backend already trimmed the boundary from the accumulated text
        let updates = run_plain(vec![token("hi"), token("</s>"), final_answer("hi")], &["</s>"]).await;

        assert_eq!(
            updates,
            vec![
                MessageUpdate::Stream { token: "hi".to_owned() },
                MessageUpdate::FinalAnswer {
                    text: "hi".to_owned(),
                    interrupted: false,
                },
            ]
        );
    }

    #[tokio::test]
    async fn first_declared_stop_suffix_wins() {
        let updates = run_plain(vec![final_answer("data</s>")], &["a</s>", "</s>"]).await;
        assert_eq!(
            updates,
            vec![MessageUpdate::FinalAnswer {
                text: "dat".to_owned(),
                interrupted: false,
            }]
        );
    }

    #[tokio::test]
    async fn only_one_stop_suffix_is_stripped() {
        let updates = run_plain(vec![final_answer("hi</s></s>")], &["</s>"]).await;
        assert_eq!(
            updates,
            vec![MessageUpdate::FinalAnswer {
                text: "hi</s>".to_owned(),
                interrupted: false,
            }]
        );
    }

    #[tokio::test]
    async fn whitespace_is_trimmed_before_suffix_check() {
        let updates = run_plain(vec![final_answer("hello</s>  \n")], &["</s>"]).await;
        assert_eq!(
            updates,
            vec![MessageUpdate::FinalAnswer {
                text: "hello".to_owned(),
                interrupted: false,
            }]
        );
    }

    #[tokio::test]
    async fn special_tokens_are_never_emitted() {
        let updates = run_plain(
            vec![special("<s>"), token("hi"), special("<pad>"), final_answer("hi")],
            &[],
        )
        .await;

        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0], MessageUpdate::Stream { token: "hi".to_owned() });
    }

    #[tokio::test]
    async fn nothing_follows_the_final_answer() {
        let updates = run_plain(vec![final_answer("done"), token("late")], &[]).await;
        assert_eq!(updates.len(), 1);
        assert!(matches!(updates[0], MessageUpdate::FinalAnswer { .. }));
    }

    #[tokio::test]
    async fn stop_request_halts_without_final_answer() {
        let aborts = AbortRegistry::new();
        aborts.request_stop("conv");

        // Stop was requested after a start time of zero, so the relay halts
        // right after the first event.
        let updates = run(
            vec![token("hel"), token("lo"), final_answer("hello")],
            &[],
            aborts,
            0,
        )
        .await;

        assert_eq!(updates, vec![MessageUpdate::Stream { token: "hel".to_owned() }]);
    }

    #[tokio::test]
    async fn stop_requested_before_start_is_ignored() {
        let aborts = AbortRegistry::new();
        aborts.request_stop("conv");

        let updates = run(
            vec![token("hi"), final_answer("hi")],
            &[],
            aborts,
            u64::MAX,
        )
        .await;

        assert!(matches!(updates.last(), Some(MessageUpdate::FinalAnswer { .. })));
    }

    #[tokio::test]
    async fn exhausted_stream_ends_without_final_answer() {
        let updates = run_plain(vec![token("par"), token("tial")], &[]).await;
        assert_eq!(
            updates,
            vec![
                MessageUpdate::Stream { token: "par".to_owned() },
                MessageUpdate::Stream { token: "tial".to_owned() },
            ]
        );
    }

    #[tokio::test]
    async fn replay_of_fixed_events_is_identical() {
        let items = vec![token("a"), special("<x>"), token("b"), final_answer("ab</s>")];
        let first = run_plain(items.clone(), &["</s>"]).await;
        let second = run_plain(items, &["</s>"]).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn normalizer_errors_propagate_without_terminal_update() {
        let stream = relay_updates(
            Box::pin(stream::iter(vec![
                Ok(token("hi")),
                Err(ChatError::Upstream("boom".to_owned())),
            ])),
            vec![],
            "conv".to_owned(),
            0,
            AbortRegistry::new(),
        );
        let collected: Vec<Result<MessageUpdate, ChatError>> = stream.collect().await;

        assert_eq!(collected.len(), 2);
        assert!(collected[0].is_ok());
        assert!(matches!(collected[1], Err(ChatError::Upstream(_))));
    }

    #[test]
    fn finish_answer_with_no_tokens_is_clean() {
        let (text, interrupted) = finish_answer("T  ", None, &[]);
        assert_eq!(text, "T");
        assert!(!interrupted);
    }
}
