// Error types shared by the Benchling client.

use thiserror::Error;

/// Unified error type for all client operations.
#[derive(Debug, Error)]
pub enum BenchlingError {
    /// The request could not be sent or the response body could not be read.
    #[error("failed to send request: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a status code the endpoint does not accept.
    /// The body is kept as returned so callers see the API's own message.
    #[error("HTTP response failed {status} {reason}: {body}")]
    Status {
        status: u16,
        reason: String,
        body: String,
    },

    /// The response body was not the JSON shape we expected.
    #[error("unexpected JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Bad arguments, caught before any request is made.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A search referenced a field the records do not carry.
    #[error("query field '{0}' not understood")]
    UnknownField(String),

    #[error("no items found with {field} '{value}'")]
    NoMatch { field: String, value: String },

    #[error("share link error: {0}")]
    ShareLink(String),

    #[error("Benchling authentication required, check your API key: {0}")]
    Login(String),

    #[error("configuration error: {0}")]
    Config(String),

    /// The create call succeeded but the new record could not be located.
    #[error("unable to return newly created sequence '{0}'; it may have been created nevertheless")]
    Creation(String),
}

impl BenchlingError {
    /// Build a status error, attaching the reason phrase for well-known codes.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        BenchlingError::Status {
            status,
            reason: reason_phrase(status).to_string(),
            body: body.into(),
        }
    }

    /// True when the API reported that the identifier does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, BenchlingError::Status { status: 404, .. })
    }
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        403 => "FORBIDDEN",
        404 => "NOT FOUND",
        500 => "INTERNAL SERVER ERROR",
        503 => "SERVICE UNAVAILABLE",
        504 => "SERVER TIMEOUT",
        _ => "",
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BenchlingError>;
