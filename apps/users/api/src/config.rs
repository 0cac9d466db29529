use core_config::{app_info, env_parse, server::ServerConfig, AppInfo, ConfigError, FromEnv};
use database::postgres::PostgresConfig;
use domain_users::PageLimits;

pub use core_config::Environment;

/// Page size bounds for `GET /users`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaginationConfig {
    pub default_page_size: u64,
    pub max_page_size: u64,
}

impl PaginationConfig {
    pub fn limits(&self) -> PageLimits {
        PageLimits::new(self.default_page_size, self.max_page_size)
    }
}

impl FromEnv for PaginationConfig {
    /// - USERS_DEFAULT_PAGE_SIZE: defaults to 10
    /// - USERS_MAX_PAGE_SIZE: defaults to 100
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            default_page_size: env_parse("USERS_DEFAULT_PAGE_SIZE", "10")?,
            max_page_size: env_parse("USERS_MAX_PAGE_SIZE", "100")?,
        })
    }
}

/// Application configuration composed from the shared config pieces
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub server: ServerConfig,
    pub pagination: PaginationConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Ok(Self {
            app: app_info!(),
            database: PostgresConfig::from_env()?,
            server: ServerConfig::from_env()?,
            pagination: PaginationConfig::from_env()?,
            environment: Environment::from_env(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env_defaults() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgres://localhost/users")),
                ("USERS_DEFAULT_PAGE_SIZE", None),
                ("USERS_MAX_PAGE_SIZE", None),
                ("PORT", None),
                ("APP_ENV", None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.app.name, "users_api");
                assert_eq!(config.database.url, "postgres://localhost/users");
                assert_eq!(config.server.port, 8080);
                assert_eq!(config.pagination.limits(), PageLimits::default());
                assert!(config.environment.is_development());
            },
        );
    }

    #[test]
    fn test_pagination_config_custom() {
        temp_env::with_vars(
            [
                ("USERS_DEFAULT_PAGE_SIZE", Some("25")),
                ("USERS_MAX_PAGE_SIZE", Some("50")),
            ],
            || {
                let limits = PaginationConfig::from_env().unwrap().limits();
                assert_eq!(limits.default_limit(), 25);
                assert_eq!(limits.max_limit(), 50);
            },
        );
    }

    #[test]
    fn test_pagination_config_invalid() {
        temp_env::with_var("USERS_MAX_PAGE_SIZE", Some("lots"), || {
            let err = PaginationConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("USERS_MAX_PAGE_SIZE"));
        });
    }
}
