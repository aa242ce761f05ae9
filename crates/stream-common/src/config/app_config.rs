//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub gateway: ServerConfig,
    pub streaming: StreamingConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Server bind configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Streaming session tuning
#[derive(Debug, Clone, Deserialize)]
pub struct StreamingConfig {
    /// Outbound buffer per listener connection; a full buffer drops messages for that listener
    #[serde(default = "default_listener_buffer_size")]
    pub listener_buffer_size: usize,
    /// Heartbeat interval announced to WebSocket clients
    #[serde(default = "default_heartbeat_interval_ms")]
    pub heartbeat_interval_ms: u64,
    /// Maximum message length in characters
    #[serde(default = "default_max_message_length")]
    pub max_message_length: usize,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            listener_buffer_size: default_listener_buffer_size(),
            heartbeat_interval_ms: default_heartbeat_interval_ms(),
            max_message_length: default_max_message_length(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "stream-server".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_listener_buffer_size() -> usize {
    100
}

fn default_heartbeat_interval_ms() -> u64 {
    45_000
}

fn default_max_message_length() -> usize {
    2000
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a required variable is missing or a value does not parse
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = match lookup("APP_ENV") {
            Some(raw) => Environment::parse(&raw).ok_or(ConfigError::InvalidValue("APP_ENV", raw))?,
            None => Environment::default(),
        };

        let config = Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env,
            },
            gateway: ServerConfig {
                host: lookup("GATEWAY_HOST").unwrap_or_else(default_host),
                port: parse_var(&lookup, "GATEWAY_PORT")?.ok_or(ConfigError::MissingVar("GATEWAY_PORT"))?,
            },
            streaming: StreamingConfig {
                listener_buffer_size: parse_var(&lookup, "LISTENER_BUFFER_SIZE")?
                    .unwrap_or_else(default_listener_buffer_size),
                heartbeat_interval_ms: parse_var(&lookup, "HEARTBEAT_INTERVAL_MS")?
                    .unwrap_or_else(default_heartbeat_interval_ms),
                max_message_length: parse_var(&lookup, "MAX_MESSAGE_LENGTH")?
                    .unwrap_or_else(default_max_message_length),
            },
        };

        config.streaming.validate()?;
        Ok(config)
    }
}

impl StreamingConfig {
    /// Buffer size, heartbeat interval, and message length must be non-zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("LISTENER_BUFFER_SIZE", self.listener_buffer_size == 0),
            ("HEARTBEAT_INTERVAL_MS", self.heartbeat_interval_ms == 0),
            ("MAX_MESSAGE_LENGTH", self.max_message_length == 0),
        ];

        match checks.into_iter().find(|(_, is_zero)| *is_zero) {
            Some((key, _)) => Err(ConfigError::InvalidValue(key, "0".to_string())),
            None => Ok(()),
        }
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(None),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
