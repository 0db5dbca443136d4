use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::claims::AuthClaims;
use crate::claims::UnknownRole;

/// Session cookie payload.
///
/// Same identity claims as a bearer token, plus the original sign-in time
/// that caps sliding renewal. Bearer tokens lack `auth_time` and
/// `persistent`, so they never decode as a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionClaims {
    pub sub: String,
    pub name: String,
    pub email: String,
    pub role: String,

    /// Sign-in time (Unix timestamp), unchanged across renewals
    pub auth_time: i64,

    /// Issued at (Unix timestamp), reset on renewal
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Remember-me session
    pub persistent: bool,
}

impl SessionClaims {
    pub fn new(
        claims: &AuthClaims,
        authenticated_at: DateTime<Utc>,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
        persistent: bool,
    ) -> Self {
        Self {
            sub: claims.subject_id.clone(),
            name: claims.username.clone(),
            email: claims.email.clone(),
            role: claims.role.as_str().to_string(),
            auth_time: authenticated_at.timestamp(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            persistent,
        }
    }

    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp <= current_timestamp
    }

    /// Extract the identity claims.
    ///
    /// # Errors
    /// * `UnknownRole` - Role label is not one of the known roles
    pub fn to_auth_claims(&self) -> Result<AuthClaims, UnknownRole> {
        Ok(AuthClaims {
            subject_id: self.sub.clone(),
            username: self.name.clone(),
            email: self.email.clone(),
            role: self.role.parse()?,
        })
    }
}
