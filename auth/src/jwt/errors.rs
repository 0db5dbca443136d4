use jsonwebtoken::errors::ErrorKind;
use thiserror::Error;

/// Error type for token issuance.
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),
}

/// Single outcome for every credential that fails validation.
///
/// Callers cannot tell an expired token from a forged one; the specific cause
/// is only written to the debug log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid credential")]
pub struct InvalidToken;

/// Short label for a decoding failure, for logs only.
pub(crate) fn rejection_reason(kind: &ErrorKind) -> &'static str {
    match kind {
        ErrorKind::ExpiredSignature => "expired",
        ErrorKind::InvalidSignature => "bad signature",
        ErrorKind::InvalidIssuer => "issuer mismatch",
        ErrorKind::InvalidAudience => "audience mismatch",
        ErrorKind::ImmatureSignature => "not yet valid",
        ErrorKind::InvalidAlgorithm => "unexpected algorithm",
        ErrorKind::MissingRequiredClaim(_) => "missing claim",
        ErrorKind::Json(_) => "malformed claims",
        _ => "malformed token",
    }
}
