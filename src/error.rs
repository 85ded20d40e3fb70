//! Error types for the graph sync client

use thiserror::Error;

/// Reasons an inbound frame is dropped
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Payload is not valid JSON or does not match the envelope schema
    #[error("malformed envelope: {0}")]
    Malformed(#[source] serde_json::Error),
    /// JSON object without a string `type` field
    #[error("envelope has no type tag")]
    MissingType,
    /// `type` tag outside the known set
    #[error("unrecognized envelope type: {0}")]
    UnknownType(String),
    /// Binary frame that is not valid UTF-8
    #[error("non-text frame")]
    NonText,
}

/// Errors that can occur when loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Top-level error surfaced to consumers
#[derive(Debug, Error)]
pub enum SyncError {
    /// Channel closed or failed to open; retried per the backoff policy
    #[error("connection error: {reason}")]
    Connection { reason: String },
    /// Reconnect attempts reached the configured maximum
    #[error("gave up reconnecting after {attempts} attempts")]
    ConnectionExhausted { attempts: u32 },
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl SyncError {
    pub fn connection(reason: impl Into<String>) -> Self {
        SyncError::Connection {
            reason: reason.into(),
        }
    }

    /// Handled locally by retrying
    pub fn is_transient(&self) -> bool {
        matches!(self, SyncError::Connection { .. })
    }

    /// Should be shown to the end user
    pub fn is_user_visible(&self) -> bool {
        matches!(self, SyncError::ConnectionExhausted { .. })
    }
}

/// Result type for sync operations
pub type SyncResult<T> = Result<T, SyncError>;
