//! Error types for SupportLine

/// Result type alias using SupportLine's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for SupportLine operations
///
/// Unusable model output is not represented here. The classifier recovers from it
/// locally, so only caller mistakes and infrastructure failures reach this type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The caller supplied a request that cannot be classified
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The model API could not be reached
    #[error("transport error: {0}")]
    Transport(String),

    /// The model API answered with a non-success status
    #[error("model api error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a new invalid request error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Create a new transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a new API error
    pub fn api(status: u16, msg: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: msg.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the failure happened while talking to the model API
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Api { .. })
    }
}
