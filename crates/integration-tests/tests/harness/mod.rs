//! Shared test harness
#![allow(dead_code)]

pub mod config;
pub mod mock_audio;
pub mod mock_backend;
pub mod server;

/// Extract the `data:` payloads from a raw SSE response body
pub fn sse_data_lines(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| line.starts_with("data: "))
        .map(|line| line.trim_start_matches("data: ").to_owned())
        .collect()
}

/// Parse SSE payloads into message update JSON values
pub fn parse_updates(text: &str) -> Vec<serde_json::Value> {
    sse_data_lines(text)
        .iter()
        .filter_map(|data| serde_json::from_str(data).ok())
        .collect()
}
