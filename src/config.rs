//! Configuration module
//!
//! Config stored at: ~/.config/delivery-fee/config.toml
//! (overridable with `DELIVERY_FEE_CONFIG` or `--config`).
//!
//! Every section has defaults, so a partial or missing file is valid:
//!
//! ```toml
//! [server]
//! port = 8080
//!
//! [database]
//! path = "/var/lib/delivery-fee/fees.db"
//!
//! [weather]
//! import_interval_secs = 900
//! target_stations = ["Tallinn-Harku", "Tartu-Tõravere", "Pärnu"]
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::WeatherImportConfig;

pub const CONFIG_ENV: &str = "DELIVERY_FEE_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Default config location: `$DELIVERY_FEE_CONFIG`, else
/// `<config dir>/delivery-fee/config.toml`, else `./config.toml`.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    dirs_next::config_dir()
        .map(|dir| dir.join("delivery-fee").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for background tasks on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout: 30,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Connection pool settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 10,
            idle_timeout_secs: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    /// Keep everything in process memory, seeded with the default rules
    pub in_memory: bool,
    /// Full connection URL; takes precedence over `path`
    pub url: Option<String>,
    /// SQLite database file
    pub path: PathBuf,
    pub pool: PoolConfig,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            in_memory: false,
            url: None,
            path: PathBuf::from("delivery_fee.db"),
            pool: PoolConfig::default(),
        }
    }
}

impl DatabaseSection {
    pub fn connection_url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!("sqlite://{}?mode=rwc", self.path.display()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `RUST_LOG` syntax; the environment variable wins when set
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Weather observation importer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Run the periodic import task
    pub enabled: bool,
    pub api_url: String,
    pub target_stations: Vec<String>,
    pub import_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub import_on_startup: bool,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        let importer = WeatherImportConfig::default();
        Self {
            enabled: true,
            api_url: "https://www.ilmateenistus.ee/ilma_andmed/xml/observations.php".to_string(),
            target_stations: importer.target_stations,
            import_interval_secs: importer.interval.as_secs(),
            request_timeout_secs: 10,
            import_on_startup: importer.import_on_startup,
        }
    }
}

impl WeatherConfig {
    pub fn import_config(&self) -> WeatherImportConfig {
        WeatherImportConfig {
            target_stations: self.target_stations.clone(),
            interval: Duration::from_secs(self.import_interval_secs),
            import_on_startup: self.import_on_startup,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Top-level configuration stored on disk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSection,
    pub logging: LoggingConfig,
    pub weather: WeatherConfig,
}

impl AppConfig {
    /// Load config from disk, or return defaults if the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_toml(&contents).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;

        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.weather.import_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "weather.import_interval_secs must be greater than 0".to_string(),
            ));
        }
        if self.weather.enabled && self.weather.api_url.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "weather.api_url must be set when the importer is enabled".to_string(),
            ));
        }
        if self.database.pool.min_connections > self.database.pool.max_connections {
            return Err(ConfigError::Invalid(
                "database.pool.min_connections exceeds max_connections".to_string(),
            ));
        }
        match self.logging.format.to_lowercase().as_str() {
            "pretty" | "json" => Ok(()),
            other => Err(ConfigError::Invalid(format!(
                "logging.format must be 'pretty' or 'json', got '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = AppConfig::from_toml("").unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(
            cfg.database.connection_url(),
            "sqlite://delivery_fee.db?mode=rwc"
        );
        assert_eq!(cfg.weather.target_stations.len(), 3);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = AppConfig::from_toml(
            r#"
            [server]
            port = 9090

            [weather]
            import_interval_secs = 900
            target_stations = ["Pärnu"]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.host, "0.0.0.0");
        let importer = cfg.weather.import_config();
        assert_eq!(importer.interval, Duration::from_secs(900));
        assert_eq!(importer.target_stations, vec!["Pärnu".to_string()]);
        assert!(cfg.weather.enabled);
    }

    #[test]
    fn explicit_url_wins_over_path() {
        let cfg = AppConfig::from_toml(
            r#"
            [database]
            url = "sqlite::memory:"
            path = "ignored.db"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.database.connection_url(), "sqlite::memory:");
        assert!(!cfg.database.in_memory);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let err = AppConfig::from_toml("[weather]\nimport_interval_secs = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        assert!(AppConfig::from_toml("[logging]\nformat = \"xml\"\n").is_err());
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = AppConfig::from_toml("[server\nport = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let cfg = AppConfig::load(Path::new("/nonexistent/delivery-fee/config.toml")).unwrap();
        assert_eq!(cfg.server.port, 8080);
    }
}
