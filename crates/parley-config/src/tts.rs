use serde::Deserialize;
use url::Url;

/// Text-to-speech proxy configuration
///
/// The proxy route is only mounted when an upstream is configured.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TtsConfig {
    /// Base URL of the synthesis service (requests go to `{upstream}/tts`)
    #[serde(default)]
    pub upstream: Option<Url>,
    /// Voice used when a request does not name one
    #[serde(default)]
    pub default_voice: Option<String>,
}
