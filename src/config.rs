use std::net::SocketAddr;

use sqlx::mysql::MySqlConnectOptions;
use thiserror::Error;

const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} must be set")]
    Missing(&'static str),

    #[error("environment variable {name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Connection parameters for the MySQL backend.
#[derive(Clone)]
pub struct MySqlSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

impl std::fmt::Debug for MySqlSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .field("database", &self.database)
            .finish()
    }
}

impl MySqlSettings {
    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
            .database(&self.database)
    }
}

#[derive(Debug, Clone)]
pub enum StorageConfig {
    MySql(MySqlSettings),
    Sqlite { url: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub storage: StorageConfig,
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup. Empty
    /// values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let require = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let server_addr = get("SERVER_ADDR")
            .unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                name: "SERVER_ADDR",
                reason: e.to_string(),
            })?;

        let storage = match get("DATABASE_URL") {
            Some(url) if url.starts_with("sqlite:") => StorageConfig::Sqlite { url },
            _ => {
                let port = require("DB_PORT")?
                    .trim()
                    .parse::<u16>()
                    .map_err(|e| ConfigError::Invalid {
                        name: "DB_PORT",
                        reason: e.to_string(),
                    })?;

                StorageConfig::MySql(MySqlSettings {
                    host: require("DB_HOST")?,
                    port,
                    username: require("DB_USERNAME")?,
                    password: require("DB_PASSWORD")?,
                    database: require("DB_TABLE")?,
                })
            }
        };

        Ok(Self {
            server_addr,
            storage,
        })
    }
}
