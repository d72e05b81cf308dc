// Application configuration
// Loaded once at startup from the environment (and `.env`) and passed by value

use std::fmt;
use thiserror::Error;

/// Deployment environment; controls whether internal error detail is echoed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_development(self) -> bool {
        self == Environment::Development
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set in environment")]
    MissingJwtSecret,

    #[error("PORT must be a valid port number, got '{0}'")]
    InvalidPort(String),

    #[error("APP_ENV must be 'development' or 'production', got '{0}'")]
    InvalidEnvironment(String),
}

/// Process-wide configuration
#[derive(Clone)]
pub struct AppConfig {
    /// Symmetric secret used to sign and verify tokens
    pub jwt_secret: String,
    /// Postgres connection string; the in-memory store is used when absent
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub environment: Environment,
}

// Keeps the secret out of logs
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("jwt_secret", &"<redacted>")
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("environment", &self.environment)
            .finish()
    }
}

impl AppConfig {
    /// Read configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::MissingJwtSecret)?;
        let database_url = get("DATABASE_URL");
        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => 3000,
        };

        let environment = match get("APP_ENV") {
            None => Environment::Development,
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "development" | "dev" => Environment::Development,
                "production" | "prod" => Environment::Production,
                _ => return Err(ConfigError::InvalidEnvironment(raw)),
            },
        };

        Ok(Self {
            jwt_secret,
            database_url,
            host,
            port,
            environment,
        })
    }

    /// Address the HTTP listener binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
