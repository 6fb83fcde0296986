//! Response decoding: maps a raw HTTP exchange to a typed [`QueryResult`].

use crate::realtime::error::ClientError;
use crate::realtime::models::{QueryResult, RawResponse};
use serde_json::Value;
use tracing::debug;

/// Upper bound on error messages lifted from a raw response body.
const MAX_MESSAGE_LEN: usize = 256;

/// Decodes a raw response into a [`QueryResult`].
///
/// 2xx bodies must be valid JSON and are returned opaque; the vendor schema
/// varies by source and is left to the caller. Statuses >= 400 map to
/// `Failure`, with the message taken from the body's top-level `"message"`
/// field when the body is JSON, else the raw body truncated.
pub fn decode(raw: &RawResponse) -> Result<QueryResult, ClientError> {
    if raw.status >= 400 {
        let message = error_message(&raw.body);
        debug!("Query failed with status {}: {}", raw.status, message);
        return Ok(QueryResult::Failure { status_code: raw.status, message });
    }

    let body: Value = serde_json::from_str(&raw.body)?;
    Ok(QueryResult::Success { body })
}

/// Extracts a human-readable message from an error body.
fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(message) = value.get("message").and_then(Value::as_str) {
            return message.to_string();
        }
    }
    truncate(body.trim(), MAX_MESSAGE_LEN)
}

/// Truncates to at most `max` bytes on a char boundary.
fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}
