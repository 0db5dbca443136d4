use std::sync::Arc;

use http::header::AUTHORIZATION;
use http::HeaderMap;

use crate::claims::AuthClaims;
use crate::jwt::TokenService;
use crate::session::Session;
use crate::session::SessionAuthenticator;

/// Who is making the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Anonymous,
    Authenticated(AuthClaims),
}

impl Identity {
    pub fn claims(&self) -> Option<&AuthClaims> {
        match self {
            Identity::Anonymous => None,
            Identity::Authenticated(claims) => Some(claims),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Identity::Authenticated(_))
    }
}

/// Result of identity resolution for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub identity: Identity,
    /// Replacement session to hand back to the browser (sliding expiration)
    pub renewed_session: Option<Session>,
}

impl ResolvedIdentity {
    pub fn anonymous() -> Self {
        Self {
            identity: Identity::Anonymous,
            renewed_session: None,
        }
    }

    pub fn authenticated(claims: AuthClaims) -> Self {
        Self {
            identity: Identity::Authenticated(claims),
            renewed_session: None,
        }
    }
}

/// One way of proving identity on a request.
///
/// Implementations return `None` when their credential form is absent, so the
/// next resolver gets a chance. A present but invalid credential resolves to
/// [`Identity::Anonymous`].
pub trait IdentityResolver: Send + Sync {
    /// Credential scheme name, for logs.
    fn scheme(&self) -> &'static str;

    fn resolve(&self, headers: &HeaderMap) -> Option<ResolvedIdentity>;
}

/// Resolves `Authorization: Bearer <token>` headers.
pub struct BearerResolver {
    tokens: Arc<TokenService>,
}

impl BearerResolver {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }
}

impl IdentityResolver for BearerResolver {
    fn scheme(&self) -> &'static str {
        "bearer"
    }

    fn resolve(&self, headers: &HeaderMap) -> Option<ResolvedIdentity> {
        let header = headers.get(AUTHORIZATION)?;

        let Ok(value) = header.to_str() else {
            tracing::debug!("Authorization header is not valid text");
            return Some(ResolvedIdentity::anonymous());
        };

        let token = bearer_token(value)?;

        match self.tokens.validate(token) {
            Ok(claims) => Some(ResolvedIdentity::authenticated(claims)),
            Err(_) => Some(ResolvedIdentity::anonymous()),
        }
    }
}

/// Token part of a `Bearer` authorization value. Other schemes yield `None`.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token.trim())
}

/// Resolves the session cookie.
pub struct SessionResolver {
    sessions: Arc<SessionAuthenticator>,
}

impl SessionResolver {
    pub fn new(sessions: Arc<SessionAuthenticator>) -> Self {
        Self { sessions }
    }
}

impl IdentityResolver for SessionResolver {
    fn scheme(&self) -> &'static str {
        "session"
    }

    fn resolve(&self, headers: &HeaderMap) -> Option<ResolvedIdentity> {
        self.sessions.resolve(headers)
    }
}

#[cfg(test)]
mod tests {
    use http::HeaderValue;

    use super::*;
    use crate::claims::Role;
    use crate::config::AuthConfig;

    fn tokens() -> Arc<TokenService> {
        let config = AuthConfig::new("resolver_secret_at_least_32_bytes!", "shop", "clients");
        Arc::new(TokenService::new(&config).unwrap())
    }

    fn with_authorization(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("bearer abc"), Some("abc"));
        assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(bearer_token("Bearer"), None);
    }

    #[test]
    fn test_bearer_resolver_valid_token() {
        let tokens = tokens();
        let resolver = BearerResolver::new(Arc::clone(&tokens));
        let claims = AuthClaims::new("user123", "alice", "alice@example.com", Role::User);
        let token = tokens.issue(&claims).unwrap();

        let resolved = resolver
            .resolve(&with_authorization(&format!("Bearer {}", token.value)))
            .unwrap();

        assert_eq!(resolved.identity, Identity::Authenticated(claims));
    }

    #[test]
    fn test_bearer_resolver_absent_header() {
        let resolver = BearerResolver::new(tokens());

        assert!(resolver.resolve(&HeaderMap::new()).is_none());
        assert!(resolver
            .resolve(&with_authorization("Basic dXNlcjpwYXNz"))
            .is_none());
    }

    #[test]
    fn test_bearer_resolver_invalid_token_is_anonymous() {
        let resolver = BearerResolver::new(tokens());

        let resolved = resolver
            .resolve(&with_authorization("Bearer invalid.token.here"))
            .unwrap();

        assert_eq!(resolved.identity, Identity::Anonymous);
    }
}
