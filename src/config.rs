//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.
//!
//! Only the console server is configured here. Operator sessions (site,
//! credentials, navigation) are never persisted.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::ServerConfig as RuntimeServerConfig;
use crate::session::SessionStoreConfig;
use crate::wp::WpClientConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub sessions: SessionsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Console server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8501
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// WordPress client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_request_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("cpt-console/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Session store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionsConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    #[serde(default)]
    pub secure_cookie: bool,

    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_mins: u64,
}

fn default_cookie_name() -> String {
    "cpt_session".to_string()
}

fn default_max_sessions() -> usize {
    256
}

fn default_idle_timeout() -> u64 {
    60
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            secure_cookie: false,
            max_sessions: default_max_sessions(),
            idle_timeout_mins: default_idle_timeout(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("cpt-console").join("config.toml")),
            Some(PathBuf::from("/etc/cpt-console/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("CPT_CONSOLE_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("CPT_CONSOLE_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }

        if let Ok(timeout) = std::env::var("CPT_CONSOLE_REQUEST_TIMEOUT_SECS") {
            if let Ok(t) = timeout.parse() {
                self.upstream.request_timeout_secs = t;
            }
        }

        if let Ok(secure) = std::env::var("CPT_CONSOLE_SECURE_COOKIE") {
            self.sessions.secure_cookie = secure.to_lowercase() != "false" && secure != "0";
        }

        if let Ok(level) = std::env::var("CPT_CONSOLE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("CPT_CONSOLE_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Runtime settings for the console server
    pub fn server_config(&self) -> RuntimeServerConfig {
        RuntimeServerConfig {
            host: self.server.host.clone(),
            port: self.server.port,
            cookie_name: self.sessions.cookie_name.clone(),
            secure_cookie: self.sessions.secure_cookie,
            sessions: SessionStoreConfig {
                max_sessions: self.sessions.max_sessions,
                idle_timeout: Duration::from_secs(
                    self.sessions.idle_timeout_mins.saturating_mul(60),
                ),
            },
        }
    }

    /// Runtime settings for the WordPress client
    pub fn client_config(&self) -> WpClientConfig {
        WpClientConfig {
            request_timeout_ms: self.upstream.request_timeout_secs.saturating_mul(1000),
            user_agent: self.upstream.user_agent.clone(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# CPT Console Configuration
#
# Environment variables override these settings:
# - CPT_CONSOLE_HOST
# - CPT_CONSOLE_PORT
# - CPT_CONSOLE_REQUEST_TIMEOUT_SECS
# - CPT_CONSOLE_SECURE_COOKIE
# - CPT_CONSOLE_LOG_LEVEL
# - CPT_CONSOLE_LOG_FORMAT

[server]
# Console server host
host = "127.0.0.1"

# Console server port
port = 8501

[upstream]
# Timeout for each WordPress REST call (seconds)
request_timeout_secs = 30

# User agent sent to WordPress
# user_agent = "cpt-console/0.1.0"

[sessions]
# Name of the session cookie
cookie_name = "cpt_session"

# Set the Secure flag on the cookie (enable behind HTTPS)
secure_cookie = false

# Maximum number of concurrent operator sessions
max_sessions = 256

# Sessions idle for longer than this are dropped (minutes)
idle_timeout_mins = 60

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
