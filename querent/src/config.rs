//! Connection settings

use serde::Deserialize;

use crate::{Error, Result};

pub const ENV_HOST: &str = "QUERENT_DB_HOST";
pub const ENV_PORT: &str = "QUERENT_DB_PORT";
pub const ENV_DATABASE: &str = "QUERENT_DB_NAME";
pub const ENV_USERNAME: &str = "QUERENT_DB_USER";
pub const ENV_PASSWORD: &str = "QUERENT_DB_PASSWORD";

/// Where and how to connect to the database server
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            database: String::new(),
            username: "root".to_string(),
            password: String::new(),
        }
    }
}

impl ConnectionConfig {
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            ..Self::default()
        }
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    /// Read the `QUERENT_DB_*` variables, loading a `.env` file first if present.
    ///
    /// Only the database name is required.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let database = lookup(ENV_DATABASE)
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| Error::configuration(format!("{} is not set", ENV_DATABASE)))?;

        let port = match lookup(ENV_PORT) {
            Some(port) => port.trim().parse::<u16>().map_err(|_| {
                Error::configuration(format!("{} must be a port number, got '{}'", ENV_PORT, port))
            })?,
            None => defaults.port,
        };

        Ok(Self {
            host: lookup(ENV_HOST).unwrap_or(defaults.host),
            port,
            database,
            username: lookup(ENV_USERNAME).unwrap_or(defaults.username),
            password: lookup(ENV_PASSWORD).unwrap_or(defaults.password),
        })
    }

    /// Connection URL without the password, safe to log
    pub fn url(&self) -> String {
        format!(
            "mysql://{}@{}:{}/{}",
            self.username, self.host, self.port, self.database
        )
    }
}
