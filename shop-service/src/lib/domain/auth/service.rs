use std::sync::Arc;

use async_trait::async_trait;
use auth::CredentialIssuer;
use auth::Role;
use chrono::Utc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::models::LoginOutcome;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::passwords::BlockingHasher;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;

/// Sign-in and registration against the credential store.
///
/// Credential form is the caller's choice: the API passes a token service,
/// the web front end a session authenticator.
pub struct AuthService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    hasher: BlockingHasher,
}

impl<UR> AuthService<UR>
where
    UR: UserRepository,
{
    pub fn new(repository: Arc<UR>, hasher: BlockingHasher) -> Self {
        Self { repository, hasher }
    }

    async fn find_user(&self, username: &str) -> Result<Option<User>, AuthError> {
        let Ok(username) = Username::new(username.to_string()) else {
            return Ok(None);
        };

        Ok(self.repository.find_by_username(&username).await?)
    }
}

#[async_trait]
impl<UR> AuthServicePort for AuthService<UR>
where
    UR: UserRepository,
{
    async fn login(
        &self,
        command: LoginCommand,
        issuer: &dyn CredentialIssuer,
    ) -> Result<LoginOutcome, AuthError> {
        let Some(user) = self.find_user(&command.username).await? else {
            tracing::warn!(username = %command.username, reason = "unknown user", "Login failed");
            return Err(AuthError::InvalidCredentials);
        };

        if !self
            .hasher
            .verify(&command.password, &user.password_hash)
            .await
        {
            tracing::warn!(username = %user.username, reason = "wrong password", "Login failed");
            return Err(AuthError::InvalidCredentials);
        }

        if !user.is_active {
            tracing::warn!(username = %user.username, reason = "inactive", "Login failed");
            return Err(AuthError::AccountInactive);
        }

        let credential = issuer.issue_credential(&user.claims(), command.remember_me)?;
        tracing::info!(
            user_id = %user.id,
            username = %user.username,
            remember_me = command.remember_me,
            "Login succeeded"
        );

        Ok(LoginOutcome { credential, user })
    }

    async fn register(&self, command: RegisterCommand) -> Result<User, AuthError> {
        if self
            .repository
            .find_by_username(&command.username)
            .await?
            .is_some()
        {
            tracing::warn!(username = %command.username, "Registration rejected: username taken");
            return Err(AuthError::DuplicateUsername(command.username.to_string()));
        }

        let password_hash = self.hasher.hash(&command.password).await?;

        let user = User {
            id: UserId::new(),
            username: command.username,
            email: command.email,
            password_hash,
            role: Role::User,
            is_active: true,
            created_at: Utc::now(),
        };

        let created = self.repository.create(user).await.map_err(|e| match e {
            UserError::UsernameAlreadyExists(username) => AuthError::DuplicateUsername(username),
            other => AuthError::Store(other),
        })?;

        tracing::info!(user_id = %created.id, username = %created.username, "User registered");

        Ok(created)
    }
}
