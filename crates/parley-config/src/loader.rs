use std::path::Path;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        let expanded =
            crate::env::expand_env(&raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if no downstream is configured or a model's
    /// parameters are invalid
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_has_downstreams()?;
        self.validate_chat_config()?;
        Ok(())
    }

    /// Ensure the server has something to serve
    fn validate_has_downstreams(&self) -> anyhow::Result<()> {
        let has_models = !self.chat.models.is_empty();
        let has_stt = self.stt.upstream.is_some();
        let has_tts = self.tts.upstream.is_some();

        if !has_models && !has_stt && !has_tts {
            anyhow::bail!("at least one downstream must be configured (chat model, STT upstream, or TTS upstream)");
        }

        Ok(())
    }

    /// Validate chat model configuration
    fn validate_chat_config(&self) -> anyhow::Result<()> {
        for (name, model) in &self.chat.models {
            if model.parameters.stop.iter().any(String::is_empty) {
                anyhow::bail!("model '{name}' declares an empty stop sequence");
            }
        }

        Ok(())
    }
}
