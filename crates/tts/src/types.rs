use serde::{Deserialize, Serialize};

/// Speech synthesis request
#[derive(Debug, Serialize, Deserialize)]
pub struct SpeechRequest {
    /// Text to synthesize
    pub text: String,
    /// Voice to synthesize with (falls back to the configured default)
    #[serde(default)]
    pub voice_name: Option<String>,
}

/// Synthesized audio from the upstream service
#[derive(Debug, Serialize, Deserialize)]
pub struct SpeechResponse {
    /// Sample rate of the audio
    pub samplerate: u32,
    /// Audio samples
    pub wav: Vec<f32>,
}
