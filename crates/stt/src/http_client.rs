use std::time::Duration;

use reqwest::Client;

/// HTTP client for upstream audio requests
///
/// Transcription of long clips is slow; the overall timeout is generous
/// while connects stay short so a dead upstream fails fast.
pub(crate) fn http_client() -> reqwest::Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(5))
        .timeout(Duration::from_secs(120))
        .build()
}
