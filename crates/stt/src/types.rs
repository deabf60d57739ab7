use serde::{Deserialize, Serialize};

/// Transcription request: raw 16-bit PCM samples
#[derive(Debug, Serialize, Deserialize)]
pub struct TranscriptionRequest {
    /// Audio samples
    pub wav: Vec<i16>,
}

/// Transcription response from the upstream service
#[derive(Debug, Serialize, Deserialize)]
pub struct TranscriptionResponse {
    /// Transcribed text
    pub text: String,
}
