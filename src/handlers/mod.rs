//! HTTP handlers module
//!
//! Contains all HTTP endpoint handling logic

pub mod health;
pub mod proxy;

use crate::config::Settings;
use crate::middleware::{cors::apply_cors_headers, logging::request_logging_middleware};
use crate::services::{AnthropicClient, Upstream};
use crate::utils::error::AppError;
use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    http::{Method, StatusCode, Uri},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub settings: Settings,
    pub upstream: Arc<dyn Upstream>,
}

/// Create application router backed by the real upstream client
pub async fn create_router(settings: Settings) -> Result<Router> {
    let upstream = AnthropicClient::new(&settings.upstream)?;
    Ok(create_router_with_upstream(settings, Arc::new(upstream)))
}

/// Create application router with an explicit upstream
pub fn create_router_with_upstream(settings: Settings, upstream: Arc<dyn Upstream>) -> Router {
    health::mark_started();

    let body_limit = settings.request.max_body_size;
    let app_state = Arc::new(AppState { settings, upstream });

    // Outermost first. Router::layer also wraps the fallbacks, so every
    // response passes through the CORS mapper.
    let middleware_stack = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(middleware::map_response(apply_cors_headers))
        .layer(middleware::from_fn(request_logging_middleware));

    Router::new()
        .route("/", get(health::health_check).options(preflight).fallback(method_not_allowed))
        .route("/health", get(health::health_check).options(preflight).fallback(method_not_allowed))
        .route("/test", get(health::test_endpoint).options(preflight).fallback(method_not_allowed))
        .route("/proxy", post(proxy::handle_proxy).options(preflight).fallback(method_not_allowed))
        .fallback(fallback)
        .with_state(app_state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware_stack)
}

/// Preflight: 200 with an empty body
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Unknown paths: preflight for OPTIONS, JSON 404 otherwise
async fn fallback(method: Method, uri: Uri) -> Response {
    if method == Method::OPTIONS {
        return preflight().await.into_response();
    }
    AppError::NotFound(uri.path().to_string()).into_response()
}

/// Known paths with an unrouted method: JSON 405
async fn method_not_allowed(method: Method, uri: Uri) -> AppError {
    AppError::MethodNotAllowed {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}
