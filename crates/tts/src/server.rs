use reqwest::Client;
use serde::Serialize;
use url::Url;

use crate::{
    error::TtsError,
    http_client::http_client,
    types::{SpeechRequest, SpeechResponse},
};

/// Voice used when neither the request nor the config names one
const FALLBACK_VOICE: &str = "default";

/// TTS proxy forwarding text to the configured synthesis service
pub struct Server {
    client: Client,
    upstream: Url,
    default_voice: Option<String>,
}

/// Payload sent to the upstream synthesis service
#[derive(Debug, Serialize)]
struct UpstreamRequest<'a> {
    text: &'a str,
    voice_name: &'a str,
}

impl Server {
    /// Create a proxy for the given upstream base URL
    pub(crate) fn new(upstream: Url, default_voice: Option<String>) -> reqwest::Result<Self> {
        Ok(Self {
            client: http_client()?,
            upstream,
            default_voice,
        })
    }

    /// Forward the text to `{upstream}/tts` and relay the synthesized audio
    pub async fn synthesize(&self, request: SpeechRequest) -> crate::error::Result<SpeechResponse> {
        if request.text.trim().is_empty() {
            return Err(TtsError::InvalidRequest("no text provided".to_string()));
        }

        let voice = request
            .voice_name
            .as_deref()
            .or(self.default_voice.as_deref())
            .unwrap_or(FALLBACK_VOICE);
        let url = tts_url(&self.upstream);

        tracing::debug!(chars = request.text.len(), voice, %url, "forwarding synthesis request");

        let payload = UpstreamRequest {
            text: &request.text,
            voice_name: voice,
        };

        let response = self.client.post(url).json(&payload).send().await.map_err(|e| {
            tracing::error!(error = %e, "synthesis request failed");
            TtsError::Connection(format!("failed to reach synthesis service: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            tracing::error!(%status, "synthesis service returned error");
            return Err(TtsError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let result: SpeechResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse synthesis response");
            TtsError::Upstream {
                status: status.as_u16(),
                message: format!("malformed synthesis response: {e}"),
            }
        })?;

        Ok(result)
    }
}

/// Build the upstream synthesis URL
fn tts_url(upstream: &Url) -> String {
    let base = upstream.as_str().trim_end_matches('/');
    format!("{base}/tts")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tts_url_handles_trailing_slash() {
        let upstream = Url::parse("http://127.0.0.1:8001/").unwrap();
        assert_eq!(tts_url(&upstream), "http://127.0.0.1:8001/tts");
    }
}
