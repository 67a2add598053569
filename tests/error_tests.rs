//! Error handling module unit tests

use axum::http::StatusCode;
use axum::response::IntoResponse;
use claude_relay::utils::error::*;
use http_body_util::BodyExt;
use std::time::Duration;

#[test]
fn test_app_error_status_codes() {
    let test_cases = vec![
        (AppError::MissingApiKey, StatusCode::BAD_REQUEST),
        (AppError::Validation("test".to_string()), StatusCode::BAD_REQUEST),
        (
            AppError::InvalidBody {
                status: StatusCode::UNSUPPORTED_MEDIA_TYPE,
                message: "test".to_string(),
            },
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
        ),
        (AppError::NotFound("test".to_string()), StatusCode::NOT_FOUND),
        (
            AppError::MethodNotAllowed {
                method: "GET".to_string(),
                path: "/proxy".to_string(),
            },
            StatusCode::METHOD_NOT_ALLOWED,
        ),
        (
            AppError::UpstreamTimeout { after: Duration::from_secs(25) },
            StatusCode::GATEWAY_TIMEOUT,
        ),
        (AppError::UpstreamUnreachable("test".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
        (AppError::UpstreamUnreadable("test".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
        (AppError::Internal("test".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
    ];

    for (error, expected_status) in test_cases {
        assert_eq!(error.status_code(), expected_status, "{:?}", error);
    }
}

#[test]
fn test_app_error_types() {
    let test_cases = vec![
        (AppError::MissingApiKey, "authentication_error"),
        (AppError::Validation("test".to_string()), "invalid_request_error"),
        (AppError::NotFound("test".to_string()), "not_found_error"),
        (AppError::UpstreamTimeout { after: Duration::from_secs(1) }, "timeout_error"),
        (AppError::UpstreamUnreachable("test".to_string()), "api_error"),
        (AppError::Internal("test".to_string()), "api_error"),
    ];

    for (error, expected_type) in test_cases {
        assert_eq!(error.error_type(), expected_type);
    }
}

#[test]
fn test_timeout_message() {
    let error = AppError::UpstreamTimeout { after: Duration::from_secs(25) };
    assert_eq!(error.to_string(), "Anthropic API timeout - request took too long");
}

#[test]
fn test_unreachable_message_carries_cause() {
    let error = AppError::UpstreamUnreachable("dns error: no such host".to_string());
    assert!(error.to_string().contains("dns error: no such host"));
}

#[tokio::test]
async fn test_into_response_json_body() {
    let response = AppError::MissingApiKey.into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers()["content-type"], "application/json");

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "Missing x-api-key header");
    assert_eq!(body["type"], "authentication_error");
}

#[test]
fn test_error_response_deserialization() {
    let body: ErrorResponse =
        serde_json::from_str(r#"{"error":"boom","type":"api_error"}"#).unwrap();
    assert_eq!(body.error, "boom");
    assert_eq!(body.error_type, "api_error");
}
