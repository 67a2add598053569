//! Health check handlers
//!
//! Provides service status endpoints that never touch the upstream

use axum::response::Json;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::debug;

static START_TIME: OnceLock<Instant> = OnceLock::new();

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service name
    pub service: String,
    /// Version information
    pub version: String,
    /// Timestamp
    pub timestamp: String,
    /// How to use the relay
    pub usage: String,
    /// Uptime in seconds
    pub uptime_seconds: u64,
}

/// Test endpoint response
#[derive(Debug, Serialize, Deserialize)]
pub struct TestResponse {
    pub message: String,
    pub status: String,
}

/// Basic health check
///
/// GET / and GET /health
pub async fn health_check() -> Json<HealthResponse> {
    debug!("Executing health check");

    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "Claude Relay".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        usage: "POST to /proxy with x-api-key header".to_string(),
        uptime_seconds: get_uptime_seconds(),
    })
}

/// GET /test
pub async fn test_endpoint() -> Json<TestResponse> {
    Json(TestResponse {
        message: "Test endpoint working".to_string(),
        status: "OK".to_string(),
    })
}

/// Record the process start; later calls are no-ops
pub fn mark_started() {
    START_TIME.get_or_init(Instant::now);
}

/// Get service uptime in seconds
fn get_uptime_seconds() -> u64 {
    START_TIME.get_or_init(Instant::now).elapsed().as_secs()
}
