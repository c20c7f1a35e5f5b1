use core_config::{ConfigError, FromEnv, env_or_default, env_required};
use sea_orm::ConnectOptions;
use std::str::FromStr;
use std::time::Duration;
use tracing::log::LevelFilter;

/// PostgreSQL connection pool configuration.
///
/// Construct manually with [`PostgresConfig::new`] or load from the
/// environment via [`FromEnv`], then hand it to
/// `postgres::connect_from_config`.
#[derive(Clone, Debug)]
pub struct PostgresConfig {
    /// Database connection URL (required)
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections kept open
    pub min_connections: u32,

    /// Timeout for establishing a new connection, in seconds
    pub connect_timeout_secs: u64,

    /// Timeout for acquiring a pooled connection, in seconds
    pub acquire_timeout_secs: u64,

    /// Idle time before a pooled connection is closed, in seconds
    pub idle_timeout_secs: u64,

    /// Maximum lifetime of a pooled connection, in seconds
    pub max_lifetime_secs: u64,

    /// Enable SQL statement logging
    pub sqlx_logging: bool,
}

impl PostgresConfig {
    /// Create a config with default pool settings for the given URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Convert this config into SeaORM [`ConnectOptions`].
    pub fn into_connect_options(self) -> ConnectOptions {
        let mut opt = ConnectOptions::new(&self.url);
        opt.max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(self.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(self.max_lifetime_secs))
            .sqlx_logging(self.sqlx_logging)
            .sqlx_logging_level(LevelFilter::Debug);
        opt
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 25,
            min_connections: 5,
            connect_timeout_secs: 8,
            acquire_timeout_secs: 8,
            idle_timeout_secs: 600,
            max_lifetime_secs: 1800,
            sqlx_logging: true,
        }
    }
}

fn env_parsed<T: FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    env_or_default(key, default)
        .parse()
        .map_err(|e: T::Err| ConfigError::ParseError {
            key: key.to_string(),
            details: format!("{}", e),
        })
}

/// Load a [`PostgresConfig`] from environment variables.
///
/// - `DATABASE_URL` (required)
/// - `DB_MAX_CONNECTIONS` (default: 25)
/// - `DB_MIN_CONNECTIONS` (default: 5)
/// - `DB_CONNECT_TIMEOUT_SECS` (default: 8)
/// - `DB_ACQUIRE_TIMEOUT_SECS` (default: 8)
/// - `DB_IDLE_TIMEOUT_SECS` (default: 600)
/// - `DB_MAX_LIFETIME_SECS` (default: 1800)
/// - `DB_SQLX_LOGGING` (default: true)
impl FromEnv for PostgresConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env_required("DATABASE_URL")?,
            max_connections: env_parsed("DB_MAX_CONNECTIONS", "25")?,
            min_connections: env_parsed("DB_MIN_CONNECTIONS", "5")?,
            connect_timeout_secs: env_parsed("DB_CONNECT_TIMEOUT_SECS", "8")?,
            acquire_timeout_secs: env_parsed("DB_ACQUIRE_TIMEOUT_SECS", "8")?,
            idle_timeout_secs: env_parsed("DB_IDLE_TIMEOUT_SECS", "600")?,
            max_lifetime_secs: env_parsed("DB_MAX_LIFETIME_SECS", "1800")?,
            sqlx_logging: env_parsed("DB_SQLX_LOGGING", "true")?,
        })
    }
}
