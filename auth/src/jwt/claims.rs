use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::claims::AuthClaims;
use crate::claims::UnknownRole;

/// Bearer token payload.
///
/// Standard RFC 7519 registered claims plus the identity claims. The role is
/// stored as its string label so the same scheme decodes it on validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenClaims {
    /// Subject (user identifier)
    pub sub: String,

    /// Username
    pub name: String,

    pub email: String,

    /// Role label ("User" or "Admin")
    pub role: String,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl TokenClaims {
    /// Build the payload for `claims`, valid for `ttl` from `issued_at`.
    pub fn new(
        claims: &AuthClaims,
        issuer: &str,
        audience: &str,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            sub: claims.subject_id.clone(),
            name: claims.username.clone(),
            email: claims.email.clone(),
            role: claims.role.as_str().to_string(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        }
    }

    /// Check if token is expired.
    ///
    /// No clock skew: a token whose expiry equals `current_timestamp` is
    /// already expired.
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::Role;

    fn alice() -> AuthClaims {
        AuthClaims::new("user123", "alice", "alice@example.com", Role::Admin)
    }

    #[test]
    fn test_new_sets_expiry_from_ttl() {
        let issued_at = Utc::now();
        let claims = TokenClaims::new(&alice(), "shop", "clients", issued_at, Duration::minutes(60));

        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.role, "Admin");
        assert_eq!(claims.iss, "shop");
        assert_eq!(claims.aud, "clients");
        assert_eq!(claims.exp - claims.iat, 60 * 60);
    }

    #[test]
    fn test_is_expired() {
        let mut claims = TokenClaims::new(&alice(), "shop", "clients", Utc::now(), Duration::minutes(1));
        claims.exp = 1000;

        assert!(!claims.is_expired(999)); // Not expired
        assert!(claims.is_expired(1000)); // Exactly at expiration
        assert!(claims.is_expired(1001)); // Expired
    }

    #[test]
    fn test_to_auth_claims() {
        let claims = TokenClaims::new(&alice(), "shop", "clients", Utc::now(), Duration::minutes(1));
        assert_eq!(claims.to_auth_claims(), Ok(alice()));

        let mut tampered = claims.clone();
        tampered.role = "Root".to_string();
        assert!(tampered.to_auth_claims().is_err());
    }
}
