use indexmap::IndexMap;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use url::Url;

/// Top-level chat configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChatConfig {
    /// Chat model configurations keyed by model name
    #[serde(default)]
    pub models: IndexMap<String, ModelConfig>,
}

/// Configuration for a single chat model
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    /// Default system preprompt for conversations with this model
    #[serde(default)]
    pub preprompt: Option<String>,
    /// Default generation parameters
    #[serde(default)]
    pub parameters: GenerationParameters,
    /// Generation endpoint serving this model
    pub endpoint: EndpointConfig,
}

/// Parameters controlling text generation
///
/// Used both for model defaults (from this config) and per-request
/// overrides (from the chat API); `merged` combines the two.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationParameters {
    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_new_tokens: Option<u32>,
    /// Stop sequences marking clean completion, in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Nucleus sampling threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// Repetition penalty (mapped to the backend's frequency penalty)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repetition_penalty: Option<f64>,
}

impl GenerationParameters {
    /// Combine model defaults with per-request overrides
    ///
    /// Overrides win field-by-field where present; an empty override stop
    /// list means "inherit the model's declared stop sequences".
    #[must_use]
    pub fn merged(&self, overrides: Option<&Self>) -> Self {
        let Some(overrides) = overrides else {
            return self.clone();
        };

        Self {
            max_new_tokens: overrides.max_new_tokens.or(self.max_new_tokens),
            stop: if overrides.stop.is_empty() {
                self.stop.clone()
            } else {
                overrides.stop.clone()
            },
            temperature: overrides.temperature.or(self.temperature),
            top_p: overrides.top_p.or(self.top_p),
            repetition_penalty: overrides.repetition_penalty.or(self.repetition_penalty),
        }
    }
}

/// Configuration for a generation endpoint
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointConfig {
    /// Endpoint protocol type
    #[serde(rename = "type")]
    pub endpoint_type: EndpointType,
    /// Base URL of the endpoint (e.g. `http://localhost:8080/v1`)
    #[serde(default)]
    pub base_url: Option<Url>,
    /// API key for authentication
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Request incremental (SSE) responses from the backend
    #[serde(default)]
    pub stream: bool,
    /// Extra headers attached to every backend request
    #[serde(default)]
    pub headers: IndexMap<String, String>,
}

/// Supported generation endpoint protocols
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointType {
    /// OpenAI-compatible chat completions API
    Openai,
}
