//! Claude Relay Library
//!
//! Relays JSON requests to the Anthropic Messages API and adds permissive
//! CORS headers to every response

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod utils;

// Re-export common types
pub use config::Settings;
pub use handlers::{create_router, create_router_with_upstream, AppState};
pub use services::{AnthropicClient, RelayOutcome, RelayRequest, Upstream};
pub use utils::error::{AppError, AppResult};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get version information
pub fn version_info() -> String {
    format!("{} v{}", NAME, VERSION)
}
