//! Database connection settings

use std::path::Path;

use serde::{Deserialize, Serialize};
use sqlx::mysql::MySqlConnectOptions;

use crate::error::{ResultsError, Result};

/// Environment variable holding a full connection URL
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// MySQL connection settings, usually read from a TOML file:
///
/// ```toml
/// host = "localhost"
/// user = "animalai"
/// password = "secret"
/// database = "aai_results"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Server host name
    pub host: String,
    /// User name
    pub user: String,
    /// Password
    #[serde(default)]
    pub password: String,
    /// Database (schema) name
    pub database: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Pool size
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_port() -> u16 {
    3306
}

fn default_max_connections() -> u32 {
    5
}

impl DatabaseConfig {
    /// Parse settings from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read settings from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Driver connection options
    #[must_use]
    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
    }
}

/// Where to connect: a settings file, or `DATABASE_URL`
#[derive(Debug, Clone)]
pub enum ConnectionSource {
    /// Explicit settings
    Config(DatabaseConfig),
    /// Full `mysql://` URL
    Url(String),
}

impl ConnectionSource {
    /// Settings from `path` when given, otherwise from `DATABASE_URL`
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return DatabaseConfig::from_file(path).map(Self::Config);
        }
        std::env::var(DATABASE_URL_VAR).map(Self::Url).map_err(|_| {
            ResultsError::Config(format!(
                "no database settings file given and {DATABASE_URL_VAR} is not set"
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let config = DatabaseConfig::from_toml(
            "host = \"db\"\nuser = \"aai\"\ndatabase = \"results\"\n",
        )
        .unwrap();
        assert_eq!(config.port, 3306);
        assert_eq!(config.max_connections, 5);
        assert!(config.password.is_empty());
    }

    #[test]
    fn test_missing_field_is_an_error() {
        assert!(matches!(
            DatabaseConfig::from_toml("host = \"db\"\n"),
            Err(ResultsError::Toml(_))
        ));
    }

    #[test]
    fn test_file_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.toml");
        std::fs::write(
            &path,
            "host = \"db\"\nuser = \"aai\"\npassword = \"p@ss\"\ndatabase = \"results\"\nport = 3307\n",
        )
        .unwrap();
        match ConnectionSource::resolve(Some(&path)).unwrap() {
            ConnectionSource::Config(config) => {
                assert_eq!(config.port, 3307);
                assert_eq!(config.password, "p@ss");
            }
            ConnectionSource::Url(_) => panic!("expected file settings"),
        }
    }
}
