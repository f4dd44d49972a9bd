use crate::client::{
    DEFAULT_GATOR_LIST_URL, DEFAULT_ROW_LIMIT, DEFAULT_SERVER, DEFAULT_TIMEOUT_SECS,
};
use crate::error::{IrsaError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() >= self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for the IRSA client
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub server: ConfigValue<String>,
    pub gator_list_url: ConfigValue<String>,
    /// Request timeout in seconds
    pub timeout: ConfigValue<u64>,
    pub row_limit: ConfigValue<usize>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            server: ConfigValue::new(DEFAULT_SERVER.to_string(), ConfigSource::Default),
            gator_list_url: ConfigValue::new(
                DEFAULT_GATOR_LIST_URL.to_string(),
                ConfigSource::Default,
            ),
            timeout: ConfigValue::new(DEFAULT_TIMEOUT_SECS, ConfigSource::Default),
            row_limit: ConfigValue::new(DEFAULT_ROW_LIMIT, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| IrsaError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| IrsaError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(server) = file_config.server {
            self.server.update(server, ConfigSource::File);
        }

        if let Some(gator_list_url) = file_config.gator_list_url {
            self.gator_list_url.update(gator_list_url, ConfigSource::File);
        }

        if let Some(timeout) = file_config.timeout {
            self.timeout.update(parse_timeout(&timeout.to_string())?, ConfigSource::File);
        }

        if let Some(row_limit) = file_config.row_limit {
            self.row_limit.update(parse_row_limit(&row_limit.to_string())?, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // IRSA_SERVER
        if let Ok(server) = env::var("IRSA_SERVER") {
            self.server.update(server, ConfigSource::Environment);
        }

        // IRSA_GATOR_LIST_URL
        if let Ok(url) = env::var("IRSA_GATOR_LIST_URL") {
            self.gator_list_url.update(url, ConfigSource::Environment);
        }

        // IRSA_TIMEOUT
        if let Ok(timeout_str) = env::var("IRSA_TIMEOUT") {
            match parse_timeout(&timeout_str) {
                Ok(timeout) => self.timeout.update(timeout, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid IRSA_TIMEOUT value '{}': expected a positive number of seconds",
                    timeout_str
                ),
            }
        }

        // IRSA_ROW_LIMIT
        if let Ok(limit_str) = env::var("IRSA_ROW_LIMIT") {
            match parse_row_limit(&limit_str) {
                Ok(limit) => self.row_limit.update(limit, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid IRSA_ROW_LIMIT value '{}': expected a positive integer",
                    limit_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(server) = overrides.server {
            self.server.update(server, ConfigSource::Cli);
        }

        if let Some(gator_list_url) = overrides.gator_list_url {
            self.gator_list_url.update(gator_list_url, ConfigSource::Cli);
        }

        if let Some(timeout) = overrides.timeout {
            self.timeout.update(timeout, ConfigSource::Cli);
        }

        if let Some(row_limit) = overrides.row_limit {
            self.row_limit.update(row_limit, ConfigSource::Cli);
        }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert("server".to_string(), (self.server.value.clone(), self.server.source));

        map.insert(
            "gator_list_url".to_string(),
            (self.gator_list_url.value.clone(), self.gator_list_url.source),
        );

        map.insert(
            "timeout".to_string(),
            (format!("{}s", self.timeout.value), self.timeout.source),
        );

        map.insert(
            "row_limit".to_string(),
            (self.row_limit.value.to_string(), self.row_limit.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    server: Option<String>,
    gator_list_url: Option<String>,
    timeout: Option<i64>,
    row_limit: Option<i64>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub server: Option<String>,
    pub gator_list_url: Option<String>,
    pub timeout: Option<u64>,
    pub row_limit: Option<usize>,
}

/// Parse a timeout in whole seconds
pub fn parse_timeout(s: &str) -> Result<u64> {
    match s.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(IrsaError::ConfigInvalid {
            key: "timeout".to_string(),
            reason: format!("Invalid timeout: {}. Use a positive number of seconds", s),
        }),
    }
}

/// Parse a row limit
pub fn parse_row_limit(s: &str) -> Result<usize> {
    match s.trim().parse::<usize>() {
        Ok(limit) if limit > 0 => Ok(limit),
        _ => Err(IrsaError::ConfigInvalid {
            key: "row_limit".to_string(),
            reason: format!("Invalid row limit: {}. Use a positive integer", s),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = LayeredConfig::with_defaults();
        assert_eq!(config.server.value, DEFAULT_SERVER);
        assert_eq!(config.server.source, ConfigSource::Default);
        assert_eq!(config.timeout.value, 60);
        assert_eq!(config.row_limit.value, 500);
    }

    #[test]
    fn test_config_precedence() {
        let mut value = ConfigValue::new(100, ConfigSource::Default);

        // File should override default
        value.update(200, ConfigSource::File);
        assert_eq!(value.value, 200);
        assert_eq!(value.source, ConfigSource::File);

        // Environment should override file
        value.update(300, ConfigSource::Environment);
        assert_eq!(value.value, 300);
        assert_eq!(value.source, ConfigSource::Environment);

        // CLI should override environment
        value.update(400, ConfigSource::Cli);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);

        // Lower precedence should not override
        value.update(500, ConfigSource::File);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
server = "http://localhost:8080/nph-query"
timeout = 15
row_limit = 2000
"#
        )
        .unwrap();

        let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

        assert_eq!(config.server.value, "http://localhost:8080/nph-query");
        assert_eq!(config.server.source, ConfigSource::File);
        assert_eq!(config.timeout.value, 15);
        assert_eq!(config.row_limit.value, 2000);
        assert_eq!(config.gator_list_url.source, ConfigSource::Default);
    }

    #[test]
    fn test_file_rejects_non_positive_limits() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "row_limit = 0").unwrap();

        let err = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, IrsaError::ConfigInvalid { ref key, .. } if key == "row_limit"));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = LayeredConfig::with_defaults();

        let overrides = CliConfigOverrides {
            row_limit: Some(10),
            timeout: Some(5),
            ..Default::default()
        };

        config.update_from_cli(overrides);

        assert_eq!(config.row_limit.value, 10);
        assert_eq!(config.row_limit.source, ConfigSource::Cli);
        assert_eq!(config.timeout.value, 5);
        // These should still be defaults
        assert_eq!(config.server.source, ConfigSource::Default);
        assert_eq!(config.gator_list_url.source, ConfigSource::Default);
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_timeout("30").unwrap(), 30);
        assert!(parse_timeout("0").is_err());
        assert!(parse_timeout("soon").is_err());
        assert_eq!(parse_row_limit(" 250 ").unwrap(), 250);
        assert!(parse_row_limit("-1").is_err());
    }

    #[test]
    fn test_inspection_map() {
        let config = LayeredConfig::with_defaults();
        let map = config.to_inspection_map();

        assert!(map.contains_key("server"));
        assert!(map.contains_key("gator_list_url"));
        assert!(map.contains_key("row_limit"));

        let (timeout_value, timeout_source) = &map["timeout"];
        assert_eq!(timeout_value, "60s");
        assert_eq!(*timeout_source, ConfigSource::Default);
    }
}
