//! Error types for Mixpanel plugin operations

use nestor_utils::EnvError;
use thiserror::Error;

/// Mixpanel plugin specific errors
#[derive(Debug, Error)]
pub enum MixpanelError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Network or HTTP transport error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Non-success status with a body that is not an API payload
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The host failed to deliver a reply
    #[error("Send error: {0}")]
    SendError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type alias for Mixpanel plugin operations
pub type Result<T> = std::result::Result<T, MixpanelError>;

impl From<EnvError> for MixpanelError {
    fn from(err: EnvError) -> Self {
        MixpanelError::ConfigError(err.to_string())
    }
}

impl From<url::ParseError> for MixpanelError {
    fn from(err: url::ParseError) -> Self {
        MixpanelError::ConfigError(format!("invalid API base URL: {err}"))
    }
}
