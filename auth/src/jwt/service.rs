use chrono::DateTime;
use chrono::Duration;
use chrono::TimeZone;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::TokenClaims;
use super::errors::rejection_reason;
use super::errors::InvalidToken;
use super::errors::TokenError;
use super::keys::SigningKeys;
use super::keys::ALGORITHM;
use crate::claims::AuthClaims;
use crate::config::AuthConfig;
use crate::config::ConfigError;

/// Signed bearer credential handed to API clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken {
    /// Compact JWS string
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and validates bearer tokens.
///
/// Stateless: nothing about issued tokens is remembered. Validation checks
/// signature, issuer, audience and expiry with zero clock skew.
pub struct TokenService {
    keys: SigningKeys,
    issuer: String,
    audience: String,
    ttl: Duration,
}

impl TokenService {
    /// Create a token service from configuration.
    ///
    /// # Errors
    /// * `MissingSecret` - No signing secret configured
    pub fn new(config: &AuthConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            keys: SigningKeys::from_config(config)?,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            ttl: config.token_ttl(),
        })
    }

    /// Issue a token for `claims`, expiring after the configured lifetime.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(&self, claims: &AuthClaims) -> Result<BearerToken, TokenError> {
        self.issue_at(claims, Utc::now())
    }

    /// Issue a token as if the current time were `issued_at`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue_at(
        &self,
        claims: &AuthClaims,
        issued_at: DateTime<Utc>,
    ) -> Result<BearerToken, TokenError> {
        let payload = TokenClaims::new(claims, &self.issuer, &self.audience, issued_at, self.ttl);

        let value = encode(&Header::new(ALGORITHM), &payload, &self.keys.encoding)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))?;

        let expires_at = Utc
            .timestamp_opt(payload.exp, 0)
            .single()
            .ok_or_else(|| TokenError::EncodingFailed("expiry out of range".to_string()))?;

        Ok(BearerToken { value, expires_at })
    }

    /// Validate a token and extract its identity claims.
    ///
    /// # Errors
    /// * `InvalidToken` - Signature, issuer, audience, expiry or structure
    ///   check failed
    pub fn validate(&self, token: &str) -> Result<AuthClaims, InvalidToken> {
        let token_data = decode::<TokenClaims>(token, &self.keys.decoding, &self.validation())
            .map_err(|e| {
                tracing::debug!(reason = rejection_reason(e.kind()), "Bearer token rejected");
                InvalidToken
            })?;

        let payload = token_data.claims;
        if payload.is_expired(Utc::now().timestamp()) {
            tracing::debug!(reason = "expired", "Bearer token rejected");
            return Err(InvalidToken);
        }

        payload.to_auth_claims().map_err(|e| {
            tracing::debug!(reason = "unknown role", error = %e, "Bearer token rejected");
            InvalidToken
        })
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation
    }
}
