use thiserror::Error;

/// Failures talking to the payment processor
///
/// None of these are retried; the caller gets a generic upstream failure.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Payment processor request failed: {0}")]
    Transport(String),

    #[error("Payment processor rejected the request with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Failed to parse payment processor response: {0}")]
    MalformedResponse(String),

    #[error("Payment processor returned no checkout URL for session {0}")]
    MissingUrl(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Transport(err.to_string())
    }
}
