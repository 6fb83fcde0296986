//! Payload construction: validates a [`QueryRequest`] and serializes it to
//! the canonical JSON document sent over the wire.

use crate::realtime::error::ClientError;
use crate::realtime::models::QueryRequest;

/// Validates the request and produces its JSON payload.
///
/// Field order follows the struct declaration and `context` entries keep
/// their insertion order, so the document is deterministic for a given
/// request. The remote treats repeated context keys as meaningful, so the
/// sequence is never reordered or deduplicated.
pub fn build(request: &QueryRequest) -> Result<String, ClientError> {
    validate(request)?;
    serde_json::to_string(request)
        .map_err(|e| ClientError::InvalidRequest(format!("unserializable request: {}", e)))
}

fn validate(request: &QueryRequest) -> Result<(), ClientError> {
    if request.source.as_str().is_empty() {
        return Err(ClientError::InvalidRequest("source must not be empty".to_string()));
    }

    if request.pages == Some(0) {
        return Err(ClientError::InvalidRequest("pages must be >= 1".to_string()));
    }

    if request.query.is_none() && request.url.is_none() {
        return Err(ClientError::InvalidRequest(
            "either query or url must be provided".to_string(),
        ));
    }

    Ok(())
}
