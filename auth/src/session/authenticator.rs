use chrono::DateTime;
use chrono::TimeZone;
use chrono::Utc;
use cookie::time::Duration as CookieDuration;
use cookie::time::OffsetDateTime;
use cookie::Cookie;
use cookie::SameSite;
use http::header::COOKIE;
use http::HeaderMap;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::SessionClaims;
use super::errors::SessionError;
use crate::claims::AuthClaims;
use crate::config::AuthConfig;
use crate::config::ConfigError;
use crate::config::SessionSettings;
use crate::identity::Identity;
use crate::identity::ResolvedIdentity;
use crate::jwt::errors::rejection_reason;
use crate::jwt::keys::SigningKeys;
use crate::jwt::keys::ALGORITHM;
use crate::jwt::InvalidToken;

/// Signed session artifact, delivered to the browser as a cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Compact JWS string stored in the cookie
    pub value: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Survives browser restarts (remember me)
    pub persistent: bool,
}

/// A validated session as presented by the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub claims: AuthClaims,
    pub authenticated_at: DateTime<Utc>,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub persistent: bool,
}

/// Cookie-backed authentication for the web surface.
///
/// Sessions are self-contained: the server keeps no session table, so ending
/// a session means telling the browser to drop its cookie.
///
/// Regular sessions last [`SessionSettings::lifetime`] and slide forward on
/// use once less than half of the window remains, never past
/// [`SessionSettings::max_lifetime`] after sign-in. Remember-me sessions get
/// a persistent cookie with a fixed [`SessionSettings::remember_me_lifetime`]
/// and do not slide.
pub struct SessionAuthenticator {
    keys: SigningKeys,
    settings: SessionSettings,
}

impl SessionAuthenticator {
    /// Create a session authenticator from configuration.
    ///
    /// # Errors
    /// * `MissingSecret` - No signing secret configured
    pub fn new(config: &AuthConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            keys: SigningKeys::from_config(config)?,
            settings: config.session.clone(),
        })
    }

    pub fn cookie_name(&self) -> &str {
        &self.settings.cookie_name
    }

    /// Start a session for `claims`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Session encoding failed
    pub fn begin_session(
        &self,
        claims: &AuthClaims,
        remember_me: bool,
    ) -> Result<Session, SessionError> {
        self.begin_session_at(claims, remember_me, Utc::now())
    }

    /// Start a session as if the current time were `now`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Session encoding failed
    pub fn begin_session_at(
        &self,
        claims: &AuthClaims,
        remember_me: bool,
        now: DateTime<Utc>,
    ) -> Result<Session, SessionError> {
        let expires_at = if remember_me {
            now + self.settings.remember_me_lifetime()
        } else {
            now + self.settings.lifetime()
        };

        self.sign(claims, now, now, expires_at, remember_me)
    }

    /// Cookie that makes the browser drop its session.
    ///
    /// Ending a session that is already gone produces the same cookie.
    pub fn end_session(&self) -> Cookie<'static> {
        Cookie::build((self.settings.cookie_name.clone(), ""))
            .path("/")
            .http_only(true)
            .secure(self.settings.secure_cookie)
            .same_site(SameSite::Lax)
            .max_age(CookieDuration::ZERO)
            .expires(OffsetDateTime::UNIX_EPOCH)
            .build()
    }

    /// Cookie carrying `session`.
    ///
    /// Only persistent sessions get an `Expires` attribute; regular sessions
    /// end with the browser and are bounded server side by their signed expiry.
    pub fn session_cookie(&self, session: &Session) -> Cookie<'static> {
        let mut builder = Cookie::build((self.settings.cookie_name.clone(), session.value.clone()))
            .path("/")
            .http_only(true)
            .secure(self.settings.secure_cookie)
            .same_site(SameSite::Lax);

        if session.persistent {
            if let Ok(expires) = OffsetDateTime::from_unix_timestamp(session.expires_at.timestamp())
            {
                builder = builder.expires(expires);
            }
        }

        builder.build()
    }

    /// Verify a session cookie value.
    ///
    /// # Errors
    /// * `InvalidToken` - Signature, expiry or structure check failed
    pub fn validate(&self, value: &str) -> Result<SessionState, InvalidToken> {
        let token_data = decode::<SessionClaims>(value, &self.keys.decoding, &self.validation())
            .map_err(|e| {
                tracing::debug!(reason = rejection_reason(e.kind()), "Session rejected");
                InvalidToken
            })?;

        let payload = token_data.claims;
        if payload.is_expired(Utc::now().timestamp()) {
            tracing::debug!(reason = "expired", "Session rejected");
            return Err(InvalidToken);
        }

        let claims = payload.to_auth_claims().map_err(|e| {
            tracing::debug!(reason = "unknown role", error = %e, "Session rejected");
            InvalidToken
        })?;

        Ok(SessionState {
            claims,
            authenticated_at: timestamp(payload.auth_time)?,
            issued_at: timestamp(payload.iat)?,
            expires_at: timestamp(payload.exp)?,
            persistent: payload.persistent,
        })
    }

    /// Sliding renewal for a validated session at time `now`.
    ///
    /// Returns a fresh session when the window is more than half used and
    /// can still be extended; `None` otherwise.
    ///
    /// # Errors
    /// * `EncodingFailed` - Session encoding failed
    pub fn renew_at(
        &self,
        state: &SessionState,
        now: DateTime<Utc>,
    ) -> Result<Option<Session>, SessionError> {
        if state.persistent || !self.settings.sliding_expiration {
            return Ok(None);
        }

        let lifetime = self.settings.lifetime();
        if state.expires_at - now > lifetime / 2 {
            return Ok(None);
        }

        let cap = state.authenticated_at + self.settings.max_lifetime();
        let expires_at = (now + lifetime).min(cap);
        if expires_at <= state.expires_at {
            return Ok(None);
        }

        self.sign(&state.claims, state.authenticated_at, now, expires_at, false)
            .map(Some)
    }

    /// Resolve the caller from the session cookie in `headers`.
    ///
    /// `None` when no session cookie is present. A present but invalid
    /// cookie resolves to an anonymous caller.
    pub fn resolve(&self, headers: &HeaderMap) -> Option<ResolvedIdentity> {
        let value = self.read_cookie(headers)?;

        let state = match self.validate(&value) {
            Ok(state) => state,
            Err(_) => return Some(ResolvedIdentity::anonymous()),
        };

        let renewed_session = self.renew_at(&state, Utc::now()).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to renew session");
            None
        });

        Some(ResolvedIdentity {
            identity: Identity::Authenticated(state.claims),
            renewed_session,
        })
    }

    fn read_cookie(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|header| header.to_str().ok())
            .flat_map(|header| Cookie::split_parse(header))
            .filter_map(Result::ok)
            .find(|cookie| cookie.name() == self.settings.cookie_name)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    }

    fn sign(
        &self,
        claims: &AuthClaims,
        authenticated_at: DateTime<Utc>,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
        persistent: bool,
    ) -> Result<Session, SessionError> {
        let payload =
            SessionClaims::new(claims, authenticated_at, issued_at, expires_at, persistent);

        let value = encode(&Header::new(ALGORITHM), &payload, &self.keys.encoding)
            .map_err(|e| SessionError::EncodingFailed(e.to_string()))?;

        Ok(Session {
            value,
            issued_at,
            expires_at,
            persistent,
        })
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = true;
        // Audience stays validated with none expected, which rejects bearer tokens
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation
    }
}

fn timestamp(seconds: i64) -> Result<DateTime<Utc>, InvalidToken> {
    Utc.timestamp_opt(seconds, 0).single().ok_or(InvalidToken)
}
