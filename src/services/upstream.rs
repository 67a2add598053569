//! Upstream API client
//!
//! Encapsulates the single outbound call to the Anthropic Messages API

use crate::config::settings::UpstreamConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::body::Bytes;
use reqwest::{header, Client};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// A request ready to be relayed
#[derive(Debug, Clone)]
pub struct RelayRequest {
    /// Value copied from the inbound `x-api-key` header
    pub api_key: String,
    /// Serialized JSON body, sent as-is
    pub body: Bytes,
}

impl RelayRequest {
    /// Serialize an inbound JSON body once for sending
    pub fn from_json(api_key: String, body: &Value) -> serde_json::Result<Self> {
        Ok(Self {
            api_key,
            body: Bytes::from(serde_json::to_vec(body)?),
        })
    }
}

/// Result of one outbound call
#[derive(Debug, Clone, PartialEq)]
pub enum RelayOutcome {
    /// Upstream answered; any status, success or not
    Completed {
        status: u16,
        content_type: Option<String>,
        body: Bytes,
    },
    /// The bound expired and the call was dropped
    TimedOut { after: Duration },
    /// The request never reached the upstream
    Unreachable(String),
    /// Upstream answered but the body could not be read
    Unreadable(String),
}

/// Outbound call abstraction
#[async_trait]
pub trait Upstream: Send + Sync + std::fmt::Debug {
    /// Forward a request and report what happened
    async fn relay(&self, request: RelayRequest) -> RelayOutcome;
}

/// Anthropic Messages API client
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    client: Client,
    url: String,
    anthropic_version: String,
    timeout: Duration,
}

impl AnthropicClient {
    /// Create a new client instance
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let timeout = Duration::from_millis(config.timeout_ms);

        let client = Client::builder()
            .connect_timeout(timeout)
            .user_agent(concat!("claude-relay/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            url: config.url.clone(),
            anthropic_version: config.anthropic_version.clone(),
            timeout,
        })
    }

    /// Send the request and read the whole body, without a bound
    async fn send(&self, request: RelayRequest) -> RelayOutcome {
        debug!("Sending request to {}", self.url);

        let response = match self
            .client
            .post(&self.url)
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-api-key", &request.api_key)
            .header("anthropic-version", &self.anthropic_version)
            .body(request.body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) if e.is_timeout() => return RelayOutcome::TimedOut { after: self.timeout },
            Err(e) => {
                warn!("Upstream request failed: {}", e);
                return RelayOutcome::Unreachable(e.to_string());
            }
        };

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        match response.bytes().await {
            Ok(body) => {
                debug!("Upstream answered {} with {} bytes", status, body.len());
                RelayOutcome::Completed {
                    status,
                    content_type,
                    body,
                }
            }
            Err(e) if e.is_timeout() => RelayOutcome::TimedOut { after: self.timeout },
            Err(e) => {
                warn!("Failed to read upstream body (status {}): {}", status, e);
                RelayOutcome::Unreadable(e.to_string())
            }
        }
    }
}

#[async_trait]
impl Upstream for AnthropicClient {
    async fn relay(&self, request: RelayRequest) -> RelayOutcome {
        // Dropping the send future on expiry aborts the in-flight request
        match tokio::time::timeout(self.timeout, self.send(request)).await {
            Ok(outcome) => outcome,
            Err(_) => RelayOutcome::TimedOut { after: self.timeout },
        }
    }
}
