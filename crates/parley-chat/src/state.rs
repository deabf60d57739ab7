//! Chat state shared across route handlers

use std::sync::Arc;

use indexmap::IndexMap;
use parley_config::{ChatConfig, EndpointType, GenerationParameters};

use crate::abort::AbortRegistry;
use crate::endpoint::{Endpoint, OpenAiEndpoint};
use crate::error::ChatError;

/// A configured chat model with its generation endpoint
pub struct ChatModel {
    /// Model name as configured
    pub name: String,
    /// Default generation parameters (including declared stop sequences)
    pub parameters: GenerationParameters,
    /// Default system preprompt
    pub preprompt: Option<String>,
    /// Backend serving this model
    pub endpoint: Arc<dyn Endpoint>,
}

/// Shared state for chat route handlers
#[derive(Clone)]
pub struct ChatState {
    inner: Arc<ChatStateInner>,
}

struct ChatStateInner {
    models: IndexMap<String, Arc<ChatModel>>,
    aborts: AbortRegistry,
}

impl ChatState {
    /// Build the chat state from configuration, constructing one endpoint
    /// per model
    ///
    /// # Errors
    ///
    /// Returns an error if any endpoint fails to initialize.
    pub fn from_config(config: &ChatConfig) -> Result<Self, ChatError> {
        let mut models = IndexMap::new();

        for (name, model_config) in &config.models {
            let endpoint: Arc<dyn Endpoint> = match model_config.endpoint.endpoint_type {
                EndpointType::Openai => Arc::new(OpenAiEndpoint::new(name.clone(), &model_config.endpoint)?),
            };

            models.insert(
                name.clone(),
                Arc::new(ChatModel {
                    name: name.clone(),
                    parameters: model_config.parameters.clone(),
                    preprompt: model_config.preprompt.clone(),
                    endpoint,
                }),
            );
        }

        Ok(Self {
            inner: Arc::new(ChatStateInner {
                models,
                aborts: AbortRegistry::new(),
            }),
        })
    }

    /// Look up a configured model by name
    ///
    /// # Errors
    ///
    /// Returns `ChatError::ModelNotFound` for unknown names.
    pub fn model(&self, name: &str) -> Result<Arc<ChatModel>, ChatError> {
        self.inner
            .models
            .get(name)
            .cloned()
            .ok_or_else(|| ChatError::ModelNotFound { model: name.to_owned() })
    }

    /// Iterate configured models in declaration order
    pub fn models(&self) -> impl Iterator<Item = &Arc<ChatModel>> {
        self.inner.models.values()
    }

    /// The shared stop-request registry
    pub fn aborts(&self) -> &AbortRegistry {
        &self.inner.aborts
    }
}
