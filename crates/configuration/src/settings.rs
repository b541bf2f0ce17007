use crate::error::ConfigError;
use core_types::Column;
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data: DataSettings,
    pub server: ServerSettings,
    pub analytics: AnalyticsSettings,
    pub logging: LoggingSettings,
}

/// Where the kline dataset is read from.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Headerless 12-column CSV file, loaded once at startup.
    pub path: PathBuf,
}

/// Contains parameters for the HTTP server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// IP address to bind (e.g., "0.0.0.0").
    pub host: String,
    pub port: u16,
    /// Origins allowed by CORS. A single `"*"` allows any origin, without credentials.
    pub cors_origins: Vec<String>,
}

/// Default parameters for the analytics views.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalyticsSettings {
    /// RSI lookback used when a request does not specify one.
    pub rsi_window: usize,
    /// Columns correlated when a request does not specify any.
    pub correlation_columns: Vec<Column>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    pub level: String,
    /// If set, logs are also written to a daily-rolling file in this directory.
    pub directory: Option<PathBuf>,
}

// --- Default Implementations ---
// This allows a user to omit any section (or the whole file)
// and still have it work with sensible defaults.

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/Merged_CSV.csv"),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            rsi_window: 14,
            correlation_columns: vec![Column::Volume, Column::NumberOfTrades],
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

impl ServerSettings {
    /// The socket address to bind.
    pub fn address(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.host.parse().map_err(|_| {
            ConfigError::ValidationError(format!("server.host '{}' is not an IP address", self.host))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// True when CORS should accept any origin.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o.trim() == "*")
    }
}

impl Settings {
    /// Checks the cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data.path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError("data.path must not be empty".to_string()));
        }
        self.server.address()?;
        if self.server.cors_origins.iter().any(|o| o.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "server.cors_origins must not contain empty entries".to_string(),
            ));
        }
        if self.analytics.rsi_window == 0 {
            return Err(ConfigError::ValidationError(
                "analytics.rsi_window must be at least 1".to_string(),
            ));
        }
        if self.analytics.correlation_columns.is_empty() {
            return Err(ConfigError::ValidationError(
                "analytics.correlation_columns must name at least one column".to_string(),
            ));
        }
        if let Some(column) = self.analytics.correlation_columns.iter().find(|c| !c.is_numeric()) {
            return Err(ConfigError::ValidationError(format!(
                "analytics.correlation_columns: '{}' is not numeric",
                column.key()
            )));
        }
        Ok(())
    }
}

/// Command-line overrides for `serve`.
#[cfg(feature = "clap")]
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ServerOverrides {
    /// IP address to bind, overriding `server.host`.
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on, overriding `server.port`.
    #[arg(long)]
    pub port: Option<u16>,

    /// Path of the kline CSV file, overriding `data.path`.
    #[arg(long)]
    pub data: Option<PathBuf>,
}

#[cfg(feature = "clap")]
impl Settings {
    /// Applies command-line overrides and re-validates.
    pub fn apply_overrides(&mut self, overrides: &ServerOverrides) -> Result<(), ConfigError> {
        if let Some(host) = &overrides.host {
            self.server.host = host.clone();
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(path) = &overrides.data {
            self.data.path = path.clone();
        }
        self.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_address_binds_all_interfaces() {
        let settings = Settings::default();
        assert_eq!(
            settings.server.address().unwrap(),
            "0.0.0.0:8000".parse::<SocketAddr>().unwrap()
        );
        assert!(!settings.server.allows_any_origin());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn rejects_hostnames_and_ignore_column() {
        let mut settings = Settings::default();
        settings.server.host = "localhost".to_string();
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.analytics.correlation_columns = vec![Column::Ignore];
        assert!(settings.validate().is_err());
    }

    #[test]
    fn wildcard_origin_is_detected() {
        let mut settings = Settings::default();
        settings.server.cors_origins = vec!["*".to_string()];
        assert!(settings.server.allows_any_origin());
    }
}
