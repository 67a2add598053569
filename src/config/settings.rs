//! Application configuration settings
//!
//! Defines all configuration structures and loading logic

use super::file::FileConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Default upstream messages endpoint
pub const DEFAULT_UPSTREAM_URL: &str = "https://api.anthropic.com/v1/messages";

/// Protocol version pinned on every outbound call
pub const DEFAULT_ANTHROPIC_VERSION: &str = "2023-06-01";

/// Default outbound bound: 25 seconds
pub const DEFAULT_TIMEOUT_MS: u64 = 25_000;

/// Default inbound body ceiling: 10 MB
pub const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Server configuration
    pub server: ServerConfig,
    /// Upstream API configuration
    pub upstream: UpstreamConfig,
    /// Request configuration
    pub request: RequestConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen host
    pub host: String,
    /// Listen port
    pub port: u16,
}

/// Upstream API configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Full URL of the messages endpoint
    pub url: String,
    /// `anthropic-version` header value
    pub anthropic_version: String,
    /// Outbound call bound in milliseconds
    pub timeout_ms: u64,
}

/// Request configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestConfig {
    /// Maximum request body size in bytes
    pub max_body_size: usize,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log format (text/json)
    pub format: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            upstream: UpstreamConfig {
                url: DEFAULT_UPSTREAM_URL.to_string(),
                anthropic_version: DEFAULT_ANTHROPIC_VERSION.to_string(),
                timeout_ms: DEFAULT_TIMEOUT_MS,
            },
            request: RequestConfig {
                max_body_size: DEFAULT_MAX_BODY_SIZE,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "text".to_string(),
            },
        }
    }
}

impl Settings {
    /// Create a new configuration instance
    ///
    /// Defaults, then the optional config file, then environment variables.
    pub fn new() -> Result<Self> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        let file = FileConfig::load_default().context("Failed to load config file")?;

        Self::from_lookup(file.as_ref(), |key| std::env::var(key).ok())
    }

    /// Build settings from an optional file and a variable lookup
    pub fn from_lookup<F>(file: Option<&FileConfig>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(file) = file {
            settings.apply_file(file);
        }

        if let Some(host) = lookup("HOST") {
            settings.server.host = host;
        }
        override_parsed(&lookup, "PORT", &mut settings.server.port, "Invalid port number")?;
        if let Some(url) = lookup("UPSTREAM_URL") {
            settings.upstream.url = url;
        }
        if let Some(version) = lookup("ANTHROPIC_VERSION") {
            settings.upstream.anthropic_version = version;
        }
        override_parsed(
            &lookup,
            "UPSTREAM_TIMEOUT_MS",
            &mut settings.upstream.timeout_ms,
            "Invalid upstream timeout",
        )?;
        override_parsed(
            &lookup,
            "MAX_BODY_SIZE",
            &mut settings.request.max_body_size,
            "Invalid maximum body size",
        )?;
        if let Some(level) = lookup("RUST_LOG") {
            settings.logging.level = level;
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            settings.logging.format = format;
        }

        // Validate configuration
        settings.validate()?;

        Ok(settings)
    }

    fn apply_file(&mut self, file: &FileConfig) {
        if let Some(host) = &file.host {
            self.server.host = host.clone();
        }
        if let Some(port) = file.port {
            self.server.port = port;
        }
        if let Some(url) = &file.upstream_url {
            self.upstream.url = url.clone();
        }
        if let Some(version) = &file.anthropic_version {
            self.upstream.anthropic_version = version.clone();
        }
        if let Some(timeout_ms) = file.timeout_ms {
            self.upstream.timeout_ms = timeout_ms;
        }
        if let Some(max_body_size) = file.max_body_size {
            self.request.max_body_size = max_body_size;
        }
        if let Some(level) = &file.log_level {
            self.logging.level = level.clone();
        }
        if let Some(format) = &file.log_format {
            self.logging.format = format.clone();
        }
    }

    /// Validate configuration validity
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Port number cannot be 0");
        }

        let url = self.upstream.url.as_str();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            anyhow::bail!("Invalid upstream URL format, should start with 'http://' or 'https://'");
        }

        if self.upstream.anthropic_version.trim().is_empty() {
            anyhow::bail!("anthropic-version cannot be empty");
        }

        if self.upstream.timeout_ms == 0 {
            anyhow::bail!("Upstream timeout cannot be 0");
        }

        if self.request.max_body_size == 0 {
            anyhow::bail!("Maximum body size cannot be 0");
        }

        // RUST_LOG may carry a full filter directive; only bare levels are checked
        let level = self.logging.level.as_str();
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !level.contains('=') && !level.contains(',') && !valid_levels.contains(&level) {
            anyhow::bail!("Invalid log level: {}", self.logging.level);
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            anyhow::bail!("Invalid log format: {}", self.logging.format);
        }

        Ok(())
    }

    /// Outbound call bound as a `Duration`
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_millis(self.upstream.timeout_ms)
    }

    /// Listen address in `host:port` form
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Replace `target` with the parsed value of `key`, if set
fn override_parsed<F, T>(lookup: &F, key: &str, target: &mut T, message: &'static str) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    if let Some(raw) = lookup(key) {
        *target = raw
            .trim()
            .parse()
            .with_context(|| format!("{}: {}={}", message, key, raw))?;
    }
    Ok(())
}
