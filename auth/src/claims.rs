use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Closed set of roles a caller can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    /// Label used on the wire and in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for role labels outside the known set.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "User" => Ok(Role::User),
            "Admin" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Identity payload carried by every credential.
///
/// Bearer tokens and sessions embed exactly this claim set, which keeps
/// authorization independent of how the caller authenticated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthClaims {
    pub subject_id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl AuthClaims {
    pub fn new(
        subject_id: impl ToString,
        username: impl ToString,
        email: impl ToString,
        role: Role,
    ) -> Self {
        Self {
            subject_id: subject_id.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_labels_round_trip() {
        for role in [Role::User, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
    }

    #[test]
    fn test_role_rejects_unknown_label() {
        assert_eq!(
            "superuser".parse::<Role>(),
            Err(UnknownRole("superuser".to_string()))
        );
        // Labels are case sensitive
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_default_role_is_user() {
        assert_eq!(Role::default(), Role::User);
    }

    #[test]
    fn test_claims_json_shape() {
        let claims = AuthClaims::new("u1", "alice", "alice@example.com", Role::Admin);

        assert_eq!(
            serde_json::to_value(&claims).unwrap(),
            serde_json::json!({
                "subject_id": "u1",
                "username": "alice",
                "email": "alice@example.com",
                "role": "Admin"
            })
        );
    }

    #[test]
    fn test_is_admin() {
        let user = AuthClaims::new("1", "alice", "alice@example.com", Role::User);
        let admin = AuthClaims::new("2", "root", "root@example.com", Role::Admin);

        assert!(!user.is_admin());
        assert!(admin.is_admin());
    }
}
