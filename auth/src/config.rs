use chrono::Duration;
use thiserror::Error;

/// Token lifetime used when none is configured or the value cannot be parsed.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60;

/// Upper bound for every configured lifetime (100 years).
pub const MAX_LIFETIME_MINUTES: i64 = 100 * 365 * 24 * 60;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Error for configuration that must stop the process at startup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Signing secret is missing or empty")]
    MissingSecret,

    #[error("Session lifetime must be positive, got {0} minutes")]
    InvalidSessionLifetime(i64),

    #[error("Session max lifetime ({max} minutes) is shorter than the session lifetime ({lifetime} minutes)")]
    MaxLifetimeTooShort { max: i64, lifetime: i64 },

    #[error("Remember-me lifetime must be positive, got {0} days")]
    InvalidRememberMeLifetime(i64),

    #[error("{setting} is too long: {minutes} minutes, at most {max} allowed", max = MAX_LIFETIME_MINUTES)]
    LifetimeTooLong { setting: &'static str, minutes: i64 },
}

/// Immutable authentication settings, built once at startup.
///
/// Handed by reference to [`TokenService`](crate::TokenService) and
/// [`SessionAuthenticator`](crate::SessionAuthenticator); nothing in the crate
/// reads secrets from the environment on its own.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub token_ttl_minutes: i64,
    pub session: SessionSettings,
}

/// Cookie session policy for the web surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub cookie_name: String,
    /// Lifetime of a regular (non remember-me) session.
    pub lifetime_minutes: i64,
    /// Extend regular sessions on use.
    pub sliding_expiration: bool,
    /// Absolute cap for sliding renewal, counted from sign-in.
    pub max_lifetime_minutes: i64,
    /// Fixed lifetime of remember-me sessions.
    pub remember_me_days: i64,
    pub secure_cookie: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            cookie_name: "shop_session".to_string(),
            lifetime_minutes: 60,
            sliding_expiration: true,
            max_lifetime_minutes: 12 * 60,
            remember_me_days: 14,
            secure_cookie: true,
        }
    }
}

impl SessionSettings {
    pub fn lifetime(&self) -> Duration {
        Duration::minutes(self.lifetime_minutes)
    }

    pub fn max_lifetime(&self) -> Duration {
        Duration::minutes(self.max_lifetime_minutes)
    }

    pub fn remember_me_lifetime(&self) -> Duration {
        Duration::days(self.remember_me_days)
    }
}

impl AuthConfig {
    /// Create a configuration with default token lifetime and session policy.
    pub fn new(secret: impl ToString, issuer: impl ToString, audience: impl ToString) -> Self {
        Self {
            secret: secret.to_string(),
            issuer: issuer.to_string(),
            audience: audience.to_string(),
            token_ttl_minutes: DEFAULT_TOKEN_TTL_MINUTES,
            session: SessionSettings::default(),
        }
    }

    /// Set token lifetime in minutes; non-positive values fall back to the default.
    pub fn with_token_ttl_minutes(mut self, minutes: i64) -> Self {
        self.token_ttl_minutes = if minutes > 0 {
            minutes
        } else {
            DEFAULT_TOKEN_TTL_MINUTES
        };
        self
    }

    pub fn with_session(mut self, session: SessionSettings) -> Self {
        self.session = session;
        self
    }

    /// Check everything a running server depends on.
    ///
    /// # Errors
    /// * `MissingSecret` - Secret is empty or whitespace
    /// * `InvalidSessionLifetime` - Session lifetime is not positive
    /// * `MaxLifetimeTooShort` - Sliding cap is below the session lifetime
    /// * `InvalidRememberMeLifetime` - Remember-me lifetime is not positive
    /// * `LifetimeTooLong` - A lifetime exceeds [`MAX_LIFETIME_MINUTES`]
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.signing_secret()?;

        let session = &self.session;
        if session.lifetime_minutes <= 0 {
            return Err(ConfigError::InvalidSessionLifetime(session.lifetime_minutes));
        }
        if session.max_lifetime_minutes < session.lifetime_minutes {
            return Err(ConfigError::MaxLifetimeTooShort {
                max: session.max_lifetime_minutes,
                lifetime: session.lifetime_minutes,
            });
        }
        if session.remember_me_days <= 0 {
            return Err(ConfigError::InvalidRememberMeLifetime(
                session.remember_me_days,
            ));
        }

        let remember_me_minutes = session
            .remember_me_days
            .checked_mul(MINUTES_PER_DAY)
            .unwrap_or(i64::MAX);
        for (setting, minutes) in [
            ("Token lifetime", self.token_ttl_minutes),
            ("Session lifetime", session.lifetime_minutes),
            ("Session max lifetime", session.max_lifetime_minutes),
            ("Remember-me lifetime", remember_me_minutes),
        ] {
            if minutes > MAX_LIFETIME_MINUTES {
                return Err(ConfigError::LifetimeTooLong { setting, minutes });
            }
        }

        Ok(())
    }

    /// Secret bytes used for HMAC signing.
    ///
    /// # Errors
    /// * `MissingSecret` - Secret is empty or whitespace
    pub fn signing_secret(&self) -> Result<&[u8], ConfigError> {
        if self.secret.trim().is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        Ok(self.secret.as_bytes())
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::minutes(self.token_ttl_minutes)
    }
}

/// Parse a configured token lifetime, falling back to
/// [`DEFAULT_TOKEN_TTL_MINUTES`] when absent, unparseable or non-positive.
pub fn parse_ttl_minutes(raw: Option<&str>) -> i64 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|minutes| *minutes > 0)
        .unwrap_or(DEFAULT_TOKEN_TTL_MINUTES)
}
