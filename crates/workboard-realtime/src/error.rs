//! Error types for real-time channel handling.

use thiserror::Error;
use workboard_core::error::WorkboardError;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Malformed channel name: {0}")]
    MalformedName(String),

    #[error("Unknown channel kind: {0}")]
    UnknownKind(String),
}

impl From<ChannelError> for WorkboardError {
    fn from(err: ChannelError) -> Self {
        WorkboardError::Validation {
            message: err.to_string(),
        }
    }
}
