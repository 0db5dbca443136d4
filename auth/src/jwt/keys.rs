use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;

use crate::config::AuthConfig;
use crate::config::ConfigError;

/// HMAC family algorithm used for every artifact this crate signs.
pub const ALGORITHM: Algorithm = Algorithm::HS256;

/// Symmetric key pair derived from the configured secret.
pub struct SigningKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
}

impl SigningKeys {
    /// Derive keys from configuration.
    ///
    /// # Errors
    /// * `MissingSecret` - Secret is empty or whitespace
    pub fn from_config(config: &AuthConfig) -> Result<Self, ConfigError> {
        let secret = config.signing_secret()?;

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        })
    }
}
