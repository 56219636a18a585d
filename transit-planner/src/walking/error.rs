//! Walking-time service error types.

/// Errors from a walking-time measurement service.
///
/// None of these abort planning: the caller falls back to a straight-line
/// estimate and marks the result as estimated.
#[derive(Debug, thiserror::Error)]
pub enum WalkingError {
    /// Request never got an answer (connection, timeout, TLS)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("no walking service API key configured")]
    MissingCredentials,

    /// Response body was not a Distance Matrix document
    #[error("JSON parse error: {message}{}", body_suffix(.body))]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Non-success HTTP status, or a request-level API status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Service answered but found no walking route between the points
    #[error("no walking route ({status})")]
    NoRoute { status: String },

    #[error("rate limited by walking service")]
    RateLimited,

    #[error("unauthorized (invalid API key)")]
    Unauthorized,
}

fn body_suffix(body: &Option<String>) -> String {
    body.as_deref()
        .map(|b| format!(" (body: {b})"))
        .unwrap_or_default()
}
