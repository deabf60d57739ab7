use reqwest::Client;
use url::Url;

use crate::{
    error::SttError,
    http_client::http_client,
    types::{TranscriptionRequest, TranscriptionResponse},
};

/// STT proxy forwarding audio to the configured transcription service
pub struct Server {
    client: Client,
    upstream: Url,
}

impl Server {
    /// Create a proxy for the given upstream base URL
    pub(crate) fn new(upstream: Url) -> reqwest::Result<Self> {
        Ok(Self {
            client: http_client()?,
            upstream,
        })
    }

    /// Forward the audio payload to `{upstream}/transcribe` and relay the
    /// upstream response
    ///
    /// Empty audio is rejected before anything goes over the wire.
    pub async fn transcribe(&self, request: TranscriptionRequest) -> crate::error::Result<TranscriptionResponse> {
        if request.wav.is_empty() {
            return Err(SttError::InvalidRequest("no audio data provided".to_string()));
        }

        let url = transcribe_url(&self.upstream);

        tracing::debug!(samples = request.wav.len(), %url, "forwarding transcription request");

        let response = self.client.post(url).json(&request).send().await.map_err(|e| {
            tracing::error!(error = %e, "transcription request failed");
            SttError::Connection(format!("failed to reach transcription service: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            tracing::error!(%status, "transcription service returned error");
            return Err(SttError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let result: TranscriptionResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse transcription response");
            SttError::Upstream {
                status: status.as_u16(),
                message: format!("malformed transcription response: {e}"),
            }
        })?;

        Ok(result)
    }
}

/// Build the upstream transcription URL
fn transcribe_url(upstream: &Url) -> String {
    let base = upstream.as_str().trim_end_matches('/');
    format!("{base}/transcribe")
}
