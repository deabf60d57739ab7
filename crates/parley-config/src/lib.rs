#![allow(clippy::must_use_candidate)]

//! Configuration for the parley server
//!
//! Loaded from a TOML file with `{{ env.VAR }}` expansion applied to the
//! raw text before deserialization.

pub mod chat;
pub mod cors;
mod env;
pub mod health;
mod loader;
pub mod server;
pub mod stt;
pub mod telemetry;
pub mod tts;

use serde::Deserialize;

pub use chat::*;
pub use cors::*;
pub use health::*;
pub use server::*;
pub use stt::*;
pub use telemetry::TelemetryConfig;
pub use tts::*;

/// Top-level parley configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Chat models and their generation endpoints
    #[serde(default)]
    pub chat: ChatConfig,
    /// Speech-to-text proxy configuration
    #[serde(default)]
    pub stt: SttConfig,
    /// Text-to-speech proxy configuration
    #[serde(default)]
    pub tts: TtsConfig,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
