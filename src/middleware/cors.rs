//! CORS response decoration
//!
//! Every outgoing response passes through [`apply_cors_headers`] exactly once,
//! at the router boundary. Handlers never set CORS headers themselves.

use axum::{
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
        },
        HeaderMap, HeaderValue,
    },
    response::Response,
};

/// `Access-Control-Allow-Origin` value
pub const ALLOW_ORIGIN: &str = "*";

/// `Access-Control-Allow-Headers` value
pub const ALLOW_HEADERS: &str = "Content-Type, x-api-key, anthropic-version, *";

/// `Access-Control-Allow-Methods` value
pub const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";

/// Write the permissive CORS headers, replacing any existing values
pub fn decorate(headers: &mut HeaderMap) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static(ALLOW_ORIGIN));
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS));
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS));
}

/// Response mapper installed with `axum::middleware::map_response`
pub async fn apply_cors_headers(mut response: Response) -> Response {
    decorate(response.headers_mut());
    response
}
