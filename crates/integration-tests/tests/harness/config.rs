//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use indexmap::IndexMap;
use parley_config::{
    ChatConfig, Config, EndpointConfig, EndpointType, GenerationParameters, HealthConfig, ModelConfig, ServerConfig,
    SttConfig, TtsConfig,
};
use secrecy::SecretString;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with minimal defaults
    pub fn new() -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    health: HealthConfig {
                        enabled: true,
                        ..HealthConfig::default()
                    },
                    cors: None,
                },
                chat: ChatConfig::default(),
                stt: SttConfig::default(),
                tts: TtsConfig::default(),
                telemetry: None,
            },
        }
    }

    /// Add a model pointed at a mock backend
    pub fn with_model(mut self, name: &str, base_url: &str, stream: bool, stop: &[&str]) -> Self {
        self.config.chat.models.insert(
            name.to_owned(),
            ModelConfig {
                preprompt: None,
                parameters: GenerationParameters {
                    stop: stop.iter().map(|s| (*s).to_owned()).collect(),
                    ..GenerationParameters::default()
                },
                endpoint: EndpointConfig {
                    endpoint_type: EndpointType::Openai,
                    base_url: Some(base_url.parse().expect("valid URL")),
                    api_key: Some(SecretString::from("test-key")),
                    stream,
                    headers: IndexMap::new(),
                },
            },
        );
        self
    }

    /// Set the STT upstream
    pub fn with_stt_upstream(mut self, base_url: &str) -> Self {
        self.config.stt.upstream = Some(base_url.parse().expect("valid URL"));
        self
    }

    /// Set the TTS upstream
    pub fn with_tts_upstream(mut self, base_url: &str) -> Self {
        self.config.tts.upstream = Some(base_url.parse().expect("valid URL"));
        self
    }

    /// Change the health endpoint path
    pub fn with_health_path(mut self, path: &str) -> Self {
        self.config.server.health.path = path.to_owned();
        self
    }

    /// Disable the health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
