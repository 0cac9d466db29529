use sea_orm::ConnectOptions;
use std::time::Duration;
use tracing::log::LevelFilter;

#[cfg(feature = "config")]
use core_config::{database::DatabaseConfig, env_parse, ConfigError, FromEnv};

/// PostgreSQL pool settings plus the startup migration switch.
///
/// # Example
///
/// ```ignore
/// use database::postgres::PostgresConfig;
///
/// let config = PostgresConfig::new("postgres://postgres@localhost:5432/users");
/// let options = config.into_connect_options();
/// ```
#[derive(Clone, Debug)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
    /// Log every statement at `sqlx_logging_level`
    pub sqlx_logging: bool,
    pub sqlx_logging_level: LevelFilter,
    /// Apply pending migrations after connecting
    pub migrate: bool,
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_pool_size(mut self, max_connections: u32, min_connections: u32) -> Self {
        self.max_connections = max_connections;
        self.min_connections = min_connections.min(max_connections);
        self
    }

    pub fn into_connect_options(self) -> ConnectOptions {
        let mut opt = ConnectOptions::new(self.url);
        opt.max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(self.connect_timeout)
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(self.idle_timeout)
            .max_lifetime(self.max_lifetime)
            .sqlx_logging(self.sqlx_logging)
            .sqlx_logging_level(self.sqlx_logging_level);
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
            max_connections: 20,
            min_connections: 2,
            connect_timeout: Duration::from_secs(8),
            acquire_timeout: Duration::from_secs(8),
            idle_timeout: Duration::from_secs(300),
            max_lifetime: Duration::from_secs(1800),
            sqlx_logging: false,
            sqlx_logging_level: LevelFilter::Debug,
            migrate: false,
        }
    }
}

#[cfg(feature = "config")]
impl From<DatabaseConfig> for PostgresConfig {
    fn from(db: DatabaseConfig) -> Self {
        Self {
            url: db.url,
            sqlx_logging: db.debug,
            migrate: db.migrate,
            ..Self::default()
        }
    }
}

/// Environment variables:
/// - everything [`DatabaseConfig`] reads (`DATABASE_URL` or its parts,
///   `DATABASE_DEBUG`, `DATABASE_MIGRATE`)
/// - `DB_MAX_CONNECTIONS` (default: 20), `DB_MIN_CONNECTIONS` (default: 2)
/// - `DB_CONNECT_TIMEOUT_SECS`, `DB_ACQUIRE_TIMEOUT_SECS` (default: 8)
/// - `DB_IDLE_TIMEOUT_SECS` (default: 300), `DB_MAX_LIFETIME_SECS` (default: 1800)
#[cfg(feature = "config")]
impl FromEnv for PostgresConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base = PostgresConfig::from(DatabaseConfig::from_env()?);

        let secs = |key: &str, default: &str| -> Result<Duration, ConfigError> {
            env_parse::<u64>(key, default).map(Duration::from_secs)
        };

        Ok(Self {
            max_connections: env_parse("DB_MAX_CONNECTIONS", "20")?,
            min_connections: env_parse("DB_MIN_CONNECTIONS", "2")?,
            connect_timeout: secs("DB_CONNECT_TIMEOUT_SECS", "8")?,
            acquire_timeout: secs("DB_ACQUIRE_TIMEOUT_SECS", "8")?,
            idle_timeout: secs("DB_IDLE_TIMEOUT_SECS", "300")?,
            max_lifetime: secs("DB_MAX_LIFETIME_SECS", "1800")?,
            ..base
        })
    }
}
