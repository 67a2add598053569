//! Relay handler
//!
//! Forwards POST /proxy bodies to the upstream API and mirrors its answer

use crate::handlers::AppState;
use crate::services::{RelayOutcome, RelayRequest};
use crate::utils::error::{AppError, AppResult};
use crate::utils::logging::{summarize_payload, truncate_for_log};
use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::{header::CONTENT_TYPE, HeaderMap, HeaderValue, StatusCode},
    response::Response,
    Json,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Inbound header carrying the caller's key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Handle relay requests
///
/// POST /proxy
///
/// The key is checked before the body so a keyless call never reaches the
/// upstream, whatever it carries.
pub async fn handle_proxy(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Response> {
    let start_time = Instant::now();
    info!("Received proxy request");

    let api_key = extract_api_key(&headers)?;
    let Json(body) = payload?;

    // Serialized once; the logged size is the forwarded byte count
    let request = RelayRequest::from_json(api_key, &body)
        .map_err(|e| AppError::Internal(format!("Failed to serialize request body: {}", e)))?;
    let summary = summarize_payload(&body, request.body.len());
    info!(
        size = summary.size,
        model = summary.model.as_deref().unwrap_or("-"),
        messages = summary.message_count.unwrap_or(0),
        "Request size: {} characters",
        summary.size
    );

    let outcome = state.upstream.relay(request).await;
    let elapsed_ms = start_time.elapsed().as_millis();

    match &outcome {
        RelayOutcome::Completed { status, .. } => {
            info!("Request completed in {}ms with upstream status {}", elapsed_ms, status)
        }
        _ => error!("Proxy error after {}ms", elapsed_ms),
    }

    relay_response(outcome)
}

/// Turn an upstream outcome into the caller's response
pub fn relay_response(outcome: RelayOutcome) -> AppResult<Response> {
    match outcome {
        RelayOutcome::Completed {
            status,
            content_type,
            body,
        } => {
            let status = StatusCode::from_u16(status)
                .map_err(|_| AppError::Internal(format!("Upstream returned invalid status {}", status)))?;

            if !status.is_success() {
                warn!(
                    "Anthropic API error: {} {}",
                    status,
                    truncate_for_log(&String::from_utf8_lossy(&body))
                );
            } else {
                debug!("Relaying {} bytes", body.len());
            }

            let content_type = content_type
                .and_then(|ct| HeaderValue::from_str(&ct).ok())
                .unwrap_or_else(|| HeaderValue::from_static("application/json"));

            Response::builder()
                .status(status)
                .header(CONTENT_TYPE, content_type)
                .body(Body::from(body))
                .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))
        }
        RelayOutcome::TimedOut { after } => Err(AppError::UpstreamTimeout { after }),
        RelayOutcome::Unreachable(message) => Err(AppError::UpstreamUnreachable(message)),
        RelayOutcome::Unreadable(message) => Err(AppError::UpstreamUnreadable(message)),
    }
}

/// Extract and check the API key header
fn extract_api_key(headers: &HeaderMap) -> AppResult<String> {
    let value = headers.get(API_KEY_HEADER).ok_or(AppError::MissingApiKey)?;

    let key = value
        .to_str()
        .map_err(|_| AppError::Validation("x-api-key header must be visible ASCII".to_string()))?
        .trim();

    if key.is_empty() {
        return Err(AppError::MissingApiKey);
    }

    Ok(key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_extract_api_key() {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", "test123".parse().unwrap());
        assert_eq!(extract_api_key(&headers).unwrap(), "test123");

        headers.insert("x-api-key", "   ".parse().unwrap());
        assert!(matches!(extract_api_key(&headers), Err(AppError::MissingApiKey)));

        headers.clear();
        assert!(matches!(extract_api_key(&headers), Err(AppError::MissingApiKey)));
    }

    #[test]
    fn test_extract_api_key_rejects_opaque_bytes() {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", HeaderValue::from_bytes(b"key\xfa").unwrap());
        assert!(matches!(extract_api_key(&headers), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_relay_response_keeps_upstream_status() {
        let response = relay_response(RelayOutcome::Completed {
            status: 529,
            content_type: None,
            body: r#"{"type":"overloaded_error"}"#.into(),
        })
        .unwrap();

        assert_eq!(response.status().as_u16(), 529);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_relay_response_maps_failures() {
        let timeout = relay_response(RelayOutcome::TimedOut { after: Duration::from_secs(25) });
        assert!(matches!(timeout, Err(AppError::UpstreamTimeout { .. })));

        let unreachable = relay_response(RelayOutcome::Unreachable("refused".to_string()));
        assert!(matches!(unreachable, Err(AppError::UpstreamUnreachable(_))));

        let unreadable = relay_response(RelayOutcome::Unreadable("reset".to_string()));
        assert!(matches!(unreadable, Err(AppError::UpstreamUnreadable(_))));
    }
}
