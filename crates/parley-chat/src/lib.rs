#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! Chat relay between a conversational UI and an OpenAI-compatible
//! generation backend
//!
//! A backend invocation resolves to one of two response shapes — an
//! incremental chunk stream or a single complete completion — which is
//! normalized into a uniform sequence of generation events and then relayed
//! to the caller as typed message updates, with stop-sequence trimming and
//! out-of-band cancellation applied along the way.

mod abort;
mod convert;
pub mod endpoint;
mod error;
mod generate;
mod handler;
pub mod protocol;
mod state;
pub mod types;

pub use abort::AbortRegistry;
pub use convert::{GenerationStream, generation_events};
pub use error::ChatError;
pub use generate::{GenerateContext, generate};
pub use handler::{ChatRequest, chat_router};
pub use state::{ChatModel, ChatState};
