use std::env;

use auth::config::parse_ttl_minutes;
use auth::AuthConfig;
use auth::SessionSettings;
use config::builder::DefaultState;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL URL; the in-memory store is used when absent
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    #[serde(default)]
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    /// Raw token lifetime in minutes; anything unusable falls back to 60
    #[serde(default)]
    pub expiry_minutes: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub lifetime_minutes: i64,
    pub sliding_expiration: bool,
    pub max_lifetime_minutes: i64,
    pub remember_me_days: i64,
    pub secure_cookie: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let defaults = SessionSettings::default();
        Self {
            cookie_name: defaults.cookie_name,
            lifetime_minutes: defaults.lifetime_minutes,
            sliding_expiration: defaults.sliding_expiration,
            max_lifetime_minutes: defaults.max_lifetime_minutes,
            remember_me_days: defaults.remember_me_days,
            secure_cookie: defaults.secure_cookie,
        }
    }
}

impl From<&SessionConfig> for SessionSettings {
    fn from(config: &SessionConfig) -> Self {
        Self {
            cookie_name: config.cookie_name.clone(),
            lifetime_minutes: config.lifetime_minutes,
            sliding_expiration: config.sliding_expiration,
            max_lifetime_minutes: config.max_lifetime_minutes,
            remember_me_days: config.remember_me_days,
            secure_cookie: config.secure_cookie,
        }
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        Self::build(
            ConfigBuilder::builder()
                .add_source(File::with_name("config/default").required(false))
                .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
                // DATABASE__URL=postgres://... overrides database.url
                .add_source(Environment::default().separator("__")),
        )
    }

    fn build(builder: config::builder::ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }

    /// Immutable authentication settings derived from the `jwt` and
    /// `session` sections.
    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig::new(&self.jwt.secret, &self.jwt.issuer, &self.jwt.audience)
            .with_token_ttl_minutes(parse_ttl_minutes(self.jwt.expiry_minutes.as_deref()))
            .with_session(SessionSettings::from(&self.session))
    }
}
