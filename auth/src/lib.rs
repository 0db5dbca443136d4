//! Authentication and authorization core
//!
//! Provides the credential machinery shared by the API and the web front end:
//! - Password hashing (Argon2id)
//! - Bearer tokens (HS256 JWT with issuer, audience and expiry)
//! - Signed cookie sessions with sliding expiration
//! - Identity resolution and route policy enforcement
//!
//! Both credential forms carry the same [`AuthClaims`], so policy checks never
//! care which one the caller presented.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("other_password", &hash));
//! ```
//!
//! ## Bearer Tokens
//! ```
//! use auth::{AuthClaims, AuthConfig, Role, TokenService};
//!
//! let config = AuthConfig::new("secret_key_at_least_32_bytes_long!", "shop", "shop-clients");
//! let tokens = TokenService::new(&config).unwrap();
//!
//! let claims = AuthClaims::new("user123", "alice", "alice@example.com", Role::User);
//! let token = tokens.issue(&claims).unwrap();
//! assert_eq!(tokens.validate(&token.value).unwrap(), claims);
//! ```
//!
//! ## Route Policies
//! ```
//! use std::sync::Arc;
//!
//! use auth::{AuthClaims, AuthConfig, AuthorizationGate, BearerResolver, GateOutcome, Policy, Role, TokenService};
//!
//! let config = AuthConfig::new("secret_key_at_least_32_bytes_long!", "shop", "shop-clients");
//! let tokens = Arc::new(TokenService::new(&config).unwrap());
//! let gate = AuthorizationGate::new(vec![Arc::new(BearerResolver::new(Arc::clone(&tokens)))]);
//!
//! let claims = AuthClaims::new("user123", "alice", "alice@example.com", Role::User);
//! let token = tokens.issue(&claims).unwrap();
//!
//! let mut headers = http::HeaderMap::new();
//! headers.insert(http::header::AUTHORIZATION, format!("Bearer {}", token.value).parse().unwrap());
//!
//! assert_eq!(gate.check(Policy::Authenticated, &headers).outcome, GateOutcome::Allow);
//! assert_eq!(gate.check(Policy::ADMIN, &headers).outcome, GateOutcome::Forbidden);
//! ```

pub mod claims;
pub mod config;
pub mod credential;
pub mod gate;
pub mod identity;
pub mod jwt;
pub mod password;
pub mod session;

// Re-export commonly used items
pub use claims::AuthClaims;
pub use claims::Role;
pub use claims::UnknownRole;
pub use config::AuthConfig;
pub use config::ConfigError;
pub use config::SessionSettings;
pub use credential::Credential;
pub use credential::CredentialError;
pub use credential::CredentialIssuer;
pub use gate::AuthorizationGate;
pub use gate::GateDecision;
pub use gate::GateOutcome;
pub use gate::Policy;
pub use identity::BearerResolver;
pub use identity::Identity;
pub use identity::IdentityResolver;
pub use identity::ResolvedIdentity;
pub use identity::SessionResolver;
pub use jwt::BearerToken;
pub use jwt::InvalidToken;
pub use jwt::TokenError;
pub use jwt::TokenService;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use session::Session;
pub use session::SessionAuthenticator;
pub use session::SessionError;
pub use session::SessionState;
