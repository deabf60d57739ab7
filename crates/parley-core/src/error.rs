use http::StatusCode;

/// Trait for domain errors that can be rendered as HTTP responses
///
/// Each feature crate implements this on its own error type; the server
/// layer turns implementors into actual responses, so domain errors never
/// depend on axum.
pub trait HttpError: std::error::Error {
    /// HTTP status code for this error
    fn status_code(&self) -> StatusCode;

    /// Machine-readable error type (e.g. `invalid_request_error`)
    fn error_type(&self) -> &str;

    /// Message safe to expose to API consumers
    fn client_message(&self) -> String;
}
