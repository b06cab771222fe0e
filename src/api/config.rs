//! Server configuration management
//!
//! Handles loading configuration from environment variables, TOML files, and CLI arguments.

use crate::catalog::{CatalogRegistry, CLIENT_PROFILE};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub const ENV_HOST: &str = "LOCALMART_HOST";
pub const ENV_PORT: &str = "LOCALMART_PORT";
pub const ENV_LOG_LEVEL: &str = "LOCALMART_LOG_LEVEL";
pub const ENV_SEED: &str = "LOCALMART_SEED";
pub const ENV_PROFILE: &str = "LOCALMART_PROFILE";
pub const ENV_TODAY: &str = "LOCALMART_TODAY";

/// Seed the demo data has always been generated with
pub const DEFAULT_SEED: u32 = 42;

/// Configuration error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid port number: {0}. Must be between 1 and 65535")]
    InvalidPort(String),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid seed: {0}. Must be an unsigned 32-bit integer")]
    InvalidSeed(String),

    #[error("Invalid date: {0}. Expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Unknown catalog profile: {0}")]
    UnknownProfile(String),

    #[error("Configuration file error: {0}")]
    FileError(String),
}

/// Log levels supported by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Tracing filter directive for this level
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_filter_str())
    }
}

/// Server configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
    /// Seed for the generated dataset
    pub seed: u32,
    /// Catalog profile the dataset is generated from
    pub profile: String,
    /// Fixed reference date; the UTC date at startup when absent
    pub today: Option<NaiveDate>,
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: LogLevel::Info,
            seed: DEFAULT_SEED,
            profile: CLIENT_PROFILE.to_string(),
            today: None,
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields for every variable `lookup` returns a value for
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(ENV_HOST) {
            self.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.port = port.trim().parse().map_err(|_| ConfigError::InvalidPort(port))?;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = LogLevel::from_str(&level)?;
        }
        if let Some(seed) = lookup(ENV_SEED) {
            self.seed = parse_seed(&seed)?;
        }
        if let Some(profile) = lookup(ENV_PROFILE) {
            self.profile = profile;
        }
        if let Some(today) = lookup(ENV_TODAY) {
            self.today = Some(parse_date(&today)?);
        }
        Ok(())
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig = toml::from_str(content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidPort(self.port.to_string()));
        }
        if !CatalogRegistry::with_builtin().contains(&self.profile) {
            return Err(ConfigError::UnknownProfile(self.profile.clone()));
        }
        Ok(())
    }

    /// `host:port` to bind
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliArgs) -> Result<(), ConfigError> {
        if let Some(host) = &cli.host {
            self.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.port = port;
        }
        if let Some(level) = &cli.log_level {
            self.log_level = LogLevel::from_str(level)?;
        }
        if let Some(seed) = cli.seed {
            self.seed = seed;
        }
        if let Some(profile) = &cli.profile {
            self.profile = profile.clone();
        }
        if let Some(today) = cli.today {
            self.today = Some(today);
        }
        Ok(())
    }
}

fn parse_seed(raw: &str) -> Result<u32, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidSeed(raw.to_string()))
}

fn parse_date(raw: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| ConfigError::InvalidDate(raw.to_string()))
}

/// Overrides taken from the command line
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config_file: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
    pub seed: Option<u32>,
    pub profile: Option<String>,
    pub today: Option<NaiveDate>,
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file
/// 4. Default values
pub fn build_config(cli: &CliArgs) -> Result<ServerConfig, ConfigError> {
    build_config_with(cli, |key| std::env::var(key).ok())
}

/// [`build_config`] with an explicit environment lookup
pub fn build_config_with<F>(cli: &CliArgs, lookup: F) -> Result<ServerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match &cli.config_file {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };

    config.apply_env(lookup)?;
    config.merge_with_cli(cli)?;
    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.seed, DEFAULT_SEED);
        assert_eq!(config.profile, "client");
        assert!(config.today.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("trace").unwrap(), LogLevel::Trace);
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("Warn").unwrap(), LogLevel::Warn);
        assert!(LogLevel::from_str("loud").is_err());
        assert_eq!(format!("{}", LogLevel::Error), "error");
    }

    #[test]
    fn test_validate() {
        let mut config = ServerConfig::default();
        config.port = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidPort("0".to_string())));

        config.port = 3000;
        config.profile = "staging".to_string();
        assert_eq!(
            config.validate(),
            Err(ConfigError::UnknownProfile("staging".to_string()))
        );

        config.profile = "server".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let config = build_config_with(
            &CliArgs::default(),
            env(&[
                (ENV_PORT, "9090"),
                (ENV_SEED, "7"),
                (ENV_PROFILE, "server"),
                (ENV_TODAY, "2024-06-15"),
            ]),
        )
        .unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9090);
        assert_eq!(config.seed, 7);
        assert_eq!(config.profile, "server");
        assert_eq!(config.today, NaiveDate::from_ymd_opt(2024, 6, 15));
    }

    #[test]
    fn test_bad_env_values() {
        let cli = CliArgs::default();
        assert_eq!(
            build_config_with(&cli, env(&[(ENV_PORT, "eighty")])),
            Err(ConfigError::InvalidPort("eighty".to_string()))
        );
        assert!(matches!(
            build_config_with(&cli, env(&[(ENV_SEED, "-1")])),
            Err(ConfigError::InvalidSeed(_))
        ));
        assert!(matches!(
            build_config_with(&cli, env(&[(ENV_TODAY, "15/06/2024")])),
            Err(ConfigError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_cli_takes_precedence_over_env() {
        let cli = CliArgs {
            port: Some(4000),
            seed: Some(99),
            log_level: Some("debug".to_string()),
            ..Default::default()
        };
        let config = build_config_with(&cli, env(&[(ENV_PORT, "9090"), (ENV_SEED, "7")])).unwrap();
        assert_eq!(config.port, 4000);
        assert_eq!(config.seed, 99);
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_cli_rejects_bad_log_level() {
        let mut config = ServerConfig::default();
        let cli = CliArgs {
            log_level: Some("chatty".to_string()),
            ..Default::default()
        };
        assert!(config.merge_with_cli(&cli).is_err());
    }

    #[test]
    fn test_toml_deserialization() {
        let config = ServerConfig::from_toml(
            r#"
            host = "127.0.0.1"
            port = 3000
            log_level = "debug"
            seed = 7
            profile = "server"
            today = "2024-01-31"
        "#,
        )
        .unwrap();

        assert_eq!(config.socket_addr(), "127.0.0.1:3000");
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.seed, 7);
        assert_eq!(config.profile, "server");
        assert_eq!(config.today, NaiveDate::from_ymd_opt(2024, 1, 31));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ServerConfig::from_toml("port = 9000").unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.seed, DEFAULT_SEED);
    }

    #[test]
    fn test_toml_unknown_profile_rejected() {
        assert!(matches!(
            ServerConfig::from_toml(r#"profile = "legacy""#),
            Err(ConfigError::UnknownProfile(_))
        ));
    }
}
