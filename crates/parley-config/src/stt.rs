use serde::Deserialize;
use url::Url;

/// Speech-to-text proxy configuration
///
/// The proxy route is only mounted when an upstream is configured.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SttConfig {
    /// Base URL of the transcription service (requests go to `{upstream}/transcribe`)
    #[serde(default)]
    pub upstream: Option<Url>,
}
