//! File-based configuration loading
//!
//! Loads optional relay overrides from a JSON file. Every field is optional;
//! anything left out falls back to the built-in defaults, and environment
//! variables still win over the file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable pointing at an explicit config file
pub const CONFIG_PATH_ENV: &str = "CLAUDE_RELAY_CONFIG";

/// File name searched for in the default locations
pub const CONFIG_FILE_NAME: &str = "claude-relay.json";

/// Configuration overrides loaded from a JSON file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Listen host
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Listen port
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Full URL of the upstream messages endpoint
    #[serde(rename = "upstreamUrl", skip_serializing_if = "Option::is_none")]
    pub upstream_url: Option<String>,

    /// Value sent as the `anthropic-version` header
    #[serde(rename = "anthropicVersion", skip_serializing_if = "Option::is_none")]
    pub anthropic_version: Option<String>,

    /// Outbound call bound in milliseconds
    #[serde(rename = "timeoutMs", skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,

    /// Inbound body ceiling in bytes
    #[serde(rename = "maxBodySize", skip_serializing_if = "Option::is_none")]
    pub max_body_size: Option<usize>,

    /// Log level
    #[serde(rename = "logLevel", skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Log format (text/json)
    #[serde(rename = "logFormat", skip_serializing_if = "Option::is_none")]
    pub log_format: Option<String>,
}

impl FileConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading configuration from: {:?}", path);

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: FileConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config JSON: {:?}", path))?;

        debug!("Loaded config file overrides: {:?}", config);
        Ok(config)
    }

    /// Load configuration from the default locations, if any exists
    ///
    /// Searches in order:
    /// 1. `$CLAUDE_RELAY_CONFIG` (must exist when set)
    /// 2. ~/.config/claude-relay/claude-relay.json
    /// 3. ./claude-relay.json
    ///
    /// Returns `Ok(None)` when no file is present; the relay runs fine on
    /// defaults and environment variables alone.
    pub fn load_default() -> Result<Option<Self>> {
        if let Ok(explicit) = std::env::var(CONFIG_PATH_ENV) {
            return Self::load(Path::new(&explicit)).map(Some);
        }

        match default_locations().into_iter().find(|path| path.exists()) {
            Some(path) => Self::load(&path).map(Some),
            None => {
                debug!("No config file found, using defaults and environment");
                Ok(None)
            }
        }
    }
}

/// Candidate config file paths, most specific first
fn default_locations() -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(2);

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".config").join("claude-relay").join(CONFIG_FILE_NAME));
    }
    paths.push(PathBuf::from(CONFIG_FILE_NAME));

    paths
}
