use thiserror::Error;

use crate::domain::user::errors::UserError;

/// Failures of the sign-in and registration flows.
///
/// Unknown usernames and wrong passwords share one variant so callers cannot
/// tell which accounts exist.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("User account is inactive")]
    AccountInactive,

    #[error("Username already exists")]
    DuplicateUsername(String),

    #[error("Credential issuance failed: {0}")]
    Credential(#[from] auth::CredentialError),

    #[error(transparent)]
    Store(#[from] UserError),
}
