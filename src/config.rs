//! Process settings read from the environment (after `.env` is loaded).

use crate::logging::LogFormat;
use crate::storage::StorageConfig;
use std::net::SocketAddr;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/snippets.db?mode=rwc";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port `{0}`: must be an integer between 1 and 65535")]
    InvalidPort(String),
    #[error("Empty host address")]
    EmptyHost,
    #[error("Invalid socket address: {host}:{port}")]
    InvalidSocketAddress { host: String, port: u16 },
    #[error("Empty database url")]
    EmptyDatabaseUrl,
    #[error("Invalid log format `{0}`: expected `pretty` or `json`")]
    InvalidLogFormat(String),
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn address(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidSocketAddress {
                host: self.host.clone(),
                port: self.port,
            })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if self.port == 0 {
            return Err(ConfigError::InvalidPort(self.port.to_string()));
        }
        self.address()?;
        Ok(())
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub server: ServerSettings,
    pub database_url: String,
    pub log_format: LogFormat,
}

impl AppSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup. Unset or blank values
    /// take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let host = read("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match read("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .ok()
                .filter(|port| *port != 0)
                .ok_or(ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };
        let database_url = read("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let log_format = match read("LOG_FORMAT") {
            Some(raw) => parse_log_format(&raw)?,
            None => LogFormat::Pretty,
        };

        let settings = Self {
            server: ServerSettings { host, port },
            database_url,
            log_format,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.is_empty() {
            return Err(ConfigError::EmptyDatabaseUrl);
        }
        self.server.validate()
    }

    pub fn storage_config(&self) -> StorageConfig {
        StorageConfig::new(self.database_url.clone())
    }
}

fn parse_log_format(raw: &str) -> Result<LogFormat, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "pretty" => Ok(LogFormat::Pretty),
        "json" => Ok(LogFormat::Json),
        _ => Err(ConfigError::InvalidLogFormat(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Result<AppSettings, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        AppSettings::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let settings = settings(&[]).expect("defaults are valid");
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.database_url, DEFAULT_DATABASE_URL);
        assert!(matches!(settings.log_format, LogFormat::Pretty));
        assert_eq!(
            settings.server.address().unwrap(),
            "127.0.0.1:3000".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn reads_overrides() {
        let settings = settings(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "8080"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("LOG_FORMAT", "JSON"),
        ])
        .unwrap();
        assert_eq!(settings.server.port, 8080);
        assert!(matches!(settings.log_format, LogFormat::Json));
        assert!(settings.storage_config().is_in_memory());
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let settings = settings(&[("PORT", "  "), ("HOST", "")]).unwrap();
        assert_eq!(settings.server.port, DEFAULT_PORT);
        assert_eq!(settings.server.host, DEFAULT_HOST);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            settings(&[("PORT", "abc")]),
            Err(ConfigError::InvalidPort(_))
        ));
        assert!(matches!(
            settings(&[("PORT", "0")]),
            Err(ConfigError::InvalidPort(_))
        ));
        assert!(matches!(
            settings(&[("HOST", "not a host")]),
            Err(ConfigError::InvalidSocketAddress { .. })
        ));
        assert!(matches!(
            settings(&[("LOG_FORMAT", "xml")]),
            Err(ConfigError::InvalidLogFormat(_))
        ));
    }
}
