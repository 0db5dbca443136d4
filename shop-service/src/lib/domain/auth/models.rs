use std::fmt;

use auth::Credential;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::User;
use crate::domain::user::models::Username;

/// Sign-in attempt as submitted by the caller.
///
/// The username is kept raw: a syntactically impossible username is just
/// another failed sign-in.
#[derive(Clone)]
pub struct LoginCommand {
    pub username: String,
    pub password: String,
    pub remember_me: bool,
}

impl LoginCommand {
    pub fn new(username: String, password: String, remember_me: bool) -> Self {
        Self {
            username,
            password,
            remember_me,
        }
    }
}

impl fmt::Debug for LoginCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCommand")
            .field("username", &self.username)
            .field("password", &"***")
            .field("remember_me", &self.remember_me)
            .finish()
    }
}

/// Successful sign-in.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginOutcome {
    pub credential: Credential,
    pub user: User,
}

/// Self-service account creation with validated fields.
#[derive(Debug)]
pub struct RegisterCommand {
    pub username: Username,
    pub email: EmailAddress,
    pub password: Password,
}

impl RegisterCommand {
    pub fn new(username: Username, email: EmailAddress, password: Password) -> Self {
        Self {
            username,
            email,
            password,
        }
    }
}
