use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
#[cfg(feature = "config")]
use std::fs;
#[cfg(feature = "config")]
use std::path::Path;

/// Environment type for configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Get environment from string
    pub fn parse(env: &str) -> Self {
        match env.to_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "dev",
            Environment::Production => "prod",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    /// Log level used when `logging.level` is not set
    pub fn default_log_level(&self) -> log::LevelFilter {
        match self {
            Environment::Development => log::LevelFilter::Debug,
            Environment::Production => log::LevelFilter::Warn,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub environment: Environment,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Seconds to wait for in-flight requests on shutdown
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Falls back to the environment's default when unset
    #[serde(default)]
    pub level: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    8000
}
fn default_shutdown_timeout() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            shutdown_timeout: default_shutdown_timeout(),
        }
    }
}

impl AppConfig {
    /// Load configuration from TOML file
    #[cfg(feature = "config")]
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let content = fs::read_to_string(path_ref).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {}",
                path_ref.display(),
                e
            ))
        })?;

        let mut config = Self::from_toml(&content).map_err(|e| {
            e.with_context(format!("Failed to load config file '{}'", path_ref.display()))
        })?;
        config.apply_env_overrides()?;
        config.validate()?;

        log::debug!(
            "Successfully loaded configuration from: {}",
            path_ref.display()
        );
        Ok(config)
    }

    /// Parse configuration from a TOML document
    #[cfg(feature = "config")]
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::config(format!("Failed to parse TOML: {}", e)))
    }

    /// Create configuration with environment variable overrides
    pub fn from_env() -> Result<Self> {
        let mut config = AppConfig::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `GEO_ENV`, `GEO_HOST`, `GEO_PORT` and `GEO_LOG_LEVEL`
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(environment) = env::var("GEO_ENV") {
            self.environment = Environment::parse(&environment);
        }
        if let Ok(host) = env::var("GEO_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("GEO_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| Error::config(format!("Invalid GEO_PORT value: {}", port)))?;
        }
        if let Ok(level) = env::var("GEO_LOG_LEVEL") {
            self.logging.level = Some(level);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::config("Server port cannot be 0"));
        }
        if self.server.host.trim().is_empty() {
            return Err(Error::config("Server host cannot be empty"));
        }
        if self.log_level().is_none() {
            return Err(Error::config(format!(
                "Unknown log level '{}'",
                self.logging.level.as_deref().unwrap_or_default()
            )));
        }
        Ok(())
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Parsed `logging.level`, or the environment's default when unset.
    /// `None` means the configured level is not a valid filter.
    pub fn log_level(&self) -> Option<log::LevelFilter> {
        match self.logging.level.as_deref() {
            Some(level) => level.parse().ok(),
            None => Some(self.environment.default_log_level()),
        }
    }
}
