//! Logging utilities
//!
//! Helpers for summarizing relayed payloads without dumping them

use serde::Serialize;
use serde_json::Value;

/// Maximum characters of an upstream error body echoed into logs
const MAX_LOGGED_BODY: usize = 500;

/// Short description of a relayed request body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayloadSummary {
    /// Size of the re-serialized body in characters
    pub size: usize,
    /// `model` field, when the body has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Length of the `messages` array, when the body has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_count: Option<usize>,
}

/// Summarize a request body for logs
pub fn summarize_payload(body: &Value, serialized_len: usize) -> PayloadSummary {
    PayloadSummary {
        size: serialized_len,
        model: body.get("model").and_then(Value::as_str).map(str::to_string),
        message_count: body.get("messages").and_then(Value::as_array).map(Vec::len),
    }
}

/// Truncate a string with a note about original length
pub fn truncate_for_log(s: &str) -> String {
    if s.chars().count() > MAX_LOGGED_BODY {
        let head: String = s.chars().take(MAX_LOGGED_BODY).collect();
        format!("{}... ({} chars truncated)", head, s.chars().count() - MAX_LOGGED_BODY)
    } else {
        s.to_string()
    }
}
