//! Service layer module
//!
//! Contains the outbound upstream client

pub mod upstream;

pub use upstream::{AnthropicClient, RelayOutcome, RelayRequest, Upstream};
