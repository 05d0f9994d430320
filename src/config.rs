//! Process configuration from environment variables
//!
//! `.env` is loaded by the binaries before calling [`AppConfig::from_env`].

use sea_orm::ConnectOptions;
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use thiserror::Error;

use crate::services::pagination::{PaginationLimits, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};

/// Database connection string (required)
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";

/// Listen address for the HTTP server
const ENV_BIND_ADDR: &str = "BIND_ADDR";

/// Upper bound on pooled database connections
const ENV_DB_MAX_CONNECTIONS: &str = "DB_MAX_CONNECTIONS";

/// Page size used when a request omits `limit`
const ENV_DEFAULT_PAGE_LIMIT: &str = "DEFAULT_PAGE_LIMIT";

/// Largest `limit` a request may ask for
const ENV_MAX_PAGE_LIMIT: &str = "MAX_PAGE_LIMIT";

/// Set to "false" to skip migrations at startup
const ENV_RUN_MIGRATIONS: &str = "RUN_MIGRATIONS";

const DEFAULT_BIND_ADDR: ([u8; 4], u16) = ([0, 0, 0, 0], 3000);
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub db_max_connections: u32,
    pub pagination: PaginationLimits,
    pub run_migrations: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the config from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup(ENV_DATABASE_URL)
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing(ENV_DATABASE_URL))?;

        let bind_addr: SocketAddr = parse_var(&lookup, ENV_BIND_ADDR, || DEFAULT_BIND_ADDR.into())?;
        let db_max_connections =
            parse_var(&lookup, ENV_DB_MAX_CONNECTIONS, || DEFAULT_DB_MAX_CONNECTIONS)?;
        let default_limit = parse_var(&lookup, ENV_DEFAULT_PAGE_LIMIT, || DEFAULT_PAGE_LIMIT)?;
        let max_limit = parse_var(&lookup, ENV_MAX_PAGE_LIMIT, || MAX_PAGE_LIMIT)?;
        let run_migrations = parse_var(&lookup, ENV_RUN_MIGRATIONS, || true)?;

        if db_max_connections == 0 {
            return Err(ConfigError::Invalid {
                name: ENV_DB_MAX_CONNECTIONS,
                value: db_max_connections.to_string(),
            });
        }
        if max_limit == 0 {
            return Err(ConfigError::Invalid {
                name: ENV_MAX_PAGE_LIMIT,
                value: max_limit.to_string(),
            });
        }
        if default_limit == 0 || default_limit > max_limit {
            return Err(ConfigError::Invalid {
                name: ENV_DEFAULT_PAGE_LIMIT,
                value: default_limit.to_string(),
            });
        }

        Ok(Self {
            database_url,
            bind_addr,
            db_max_connections,
            pagination: PaginationLimits {
                default_limit,
                max_limit,
            },
            run_migrations,
        })
    }

    pub fn connect_options(&self) -> ConnectOptions {
        let mut options = ConnectOptions::new(self.database_url.clone());
        options
            .max_connections(self.db_max_connections)
            .sqlx_logging(false);
        options
    }
}

fn parse_var<T, F, D>(lookup: &F, name: &'static str, default: D) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
    D: FnOnce() -> T,
{
    match lookup(name) {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim()
                .to_lowercase()
                .parse()
                .map_err(|_| ConfigError::Invalid { name, value: raw })
        }
        _ => Ok(default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("DATABASE_URL", "postgres://localhost/stocks")]).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.db_max_connections, 10);
        assert_eq!(config.pagination, PaginationLimits::default());
        assert!(config.run_migrations);
    }

    #[test]
    fn test_database_url_required() {
        assert!(matches!(config_from(&[]), Err(ConfigError::Missing("DATABASE_URL"))));
        assert!(matches!(
            config_from(&[("DATABASE_URL", "  ")]),
            Err(ConfigError::Missing(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("DEFAULT_PAGE_LIMIT", "25"),
            ("MAX_PAGE_LIMIT", "200"),
            ("RUN_MIGRATIONS", "FALSE"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.pagination.default_limit, 25);
        assert_eq!(config.pagination.max_limit, 200);
        assert!(!config.run_migrations);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            config_from(&[("DATABASE_URL", "x"), ("MAX_PAGE_LIMIT", "lots")]),
            Err(ConfigError::Invalid { name: "MAX_PAGE_LIMIT", .. })
        ));
        assert!(matches!(
            config_from(&[("DATABASE_URL", "x"), ("DEFAULT_PAGE_LIMIT", "500"), ("MAX_PAGE_LIMIT", "100")]),
            Err(ConfigError::Invalid { name: "DEFAULT_PAGE_LIMIT", .. })
        ));
    }
}
