use thiserror::Error;

/// Error type for session issuance.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    #[error("Failed to encode session: {0}")]
    EncodingFailed(String),
}
