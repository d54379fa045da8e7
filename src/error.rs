//! Error types shared by the backend client and the stores.
use thiserror::Error;

/// Errors raised while talking to the XANO backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, TLS or timeout failures.
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    #[error("Backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The body could not be decoded into the expected record.
    #[error("Failed to decode backend response: {0}")]
    Decode(String),

    /// XANO is disabled or missing required settings.
    #[error("Backend not configured: {0}")]
    NotConfigured(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

/// Errors raised by the unit, settings and user stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unit {0} not found")]
    NotFound(i64),

    #[error("Invalid input: {0}")]
    Invalid(String),
}
