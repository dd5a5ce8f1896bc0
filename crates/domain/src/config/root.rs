use serde::{Deserialize, Serialize};

use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::reverse_dns::ReverseDnsConfig;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Reverse DNS annotation settings and lookup rules
    #[serde(default)]
    pub reverse_dns: ReverseDnsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. metric-rdns.toml in current directory
    /// 3. /etc/metric-rdns/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if let Some(path) = Self::get_config_path() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml_str(&contents)
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rdns = &self.reverse_dns;

        if rdns.cache_ttl.is_zero() {
            return Err(ConfigError::Validation(
                "reverse_dns.cache_ttl must be greater than zero".to_string(),
            ));
        }

        if rdns.lookup_timeout.is_zero() {
            return Err(ConfigError::Validation(
                "reverse_dns.lookup_timeout must be greater than zero".to_string(),
            ));
        }

        if rdns.cleanup_interval.is_zero() {
            return Err(ConfigError::Validation(
                "reverse_dns.cleanup_interval must be greater than zero".to_string(),
            ));
        }

        for (index, rule) in rdns.lookups.iter().enumerate() {
            rule.source().map_err(|reason| {
                ConfigError::Validation(format!("reverse_dns.lookup[{}]: {}", index, reason))
            })?;
        }

        Ok(())
    }

    /// Get the path to the configuration file being used
    pub fn get_config_path() -> Option<String> {
        if std::path::Path::new("metric-rdns.toml").exists() {
            Some("metric-rdns.toml".to_string())
        } else if std::path::Path::new("/etc/metric-rdns/config.toml").exists() {
            Some("/etc/metric-rdns/config.toml".to_string())
        } else {
            None
        }
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub log_level: Option<String>,
}
