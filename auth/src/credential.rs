use thiserror::Error;

use crate::claims::AuthClaims;
use crate::jwt::BearerToken;
use crate::jwt::TokenError;
use crate::jwt::TokenService;
use crate::session::Session;
use crate::session::SessionAuthenticator;
use crate::session::SessionError;

/// Proof of identity handed out after a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    Bearer(BearerToken),
    Session(Session),
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Turns verified claims into a credential the caller can present later.
///
/// Sign-in flows depend on this rather than on a concrete credential form,
/// so the same flow serves API clients and browsers.
pub trait CredentialIssuer: Send + Sync {
    /// # Errors
    /// * `CredentialError` - Credential could not be produced
    fn issue_credential(
        &self,
        claims: &AuthClaims,
        remember_me: bool,
    ) -> Result<Credential, CredentialError>;
}

/// Bearer tokens have a single lifetime, so `remember_me` is ignored.
impl CredentialIssuer for TokenService {
    fn issue_credential(
        &self,
        claims: &AuthClaims,
        _remember_me: bool,
    ) -> Result<Credential, CredentialError> {
        Ok(Credential::Bearer(self.issue(claims)?))
    }
}

impl CredentialIssuer for SessionAuthenticator {
    fn issue_credential(
        &self,
        claims: &AuthClaims,
        remember_me: bool,
    ) -> Result<Credential, CredentialError> {
        Ok(Credential::Session(self.begin_session(claims, remember_me)?))
    }
}
