use async_trait::async_trait;
use auth::CredentialIssuer;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::models::LoginOutcome;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::user::models::User;

/// Port for the sign-in and registration flows.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Verify credentials and issue a credential through `issuer`.
    ///
    /// Checks run in order and stop at the first failure: account lookup,
    /// password, active flag.
    ///
    /// # Arguments
    /// * `command` - Username, password and remember-me choice
    /// * `issuer` - Produces a bearer token or a session
    ///
    /// # Returns
    /// Issued credential and the signed-in user
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong password
    /// * `AccountInactive` - Correct password for a deactivated account
    /// * `Credential` - Credential could not be issued
    /// * `Store` - Credential store failed
    async fn login(
        &self,
        command: LoginCommand,
        issuer: &dyn CredentialIssuer,
    ) -> Result<LoginOutcome, AuthError>;

    /// Create a regular, active account. No credential is issued.
    ///
    /// # Errors
    /// * `DuplicateUsername` - Username is already taken
    /// * `Store` - Hashing or persistence failed (including a taken email)
    async fn register(&self, command: RegisterCommand) -> Result<User, AuthError>;
}
