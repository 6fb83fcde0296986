//! Error taxonomy for query submission.

use thiserror::Error;

/// Errors surfaced by [`QueryClient::submit`](crate::realtime::client::QueryClient::submit).
///
/// Every stage of the build/send/decode pipeline short-circuits into one of
/// these kinds; nothing is swallowed on the way to the caller.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request failed local validation and was never sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The remote rejected the credentials (401 or 403).
    #[error("authentication rejected by remote (status {0})")]
    Auth(u16),

    /// Connection-level failure or retryable status after all retries.
    #[error("transport failed after {attempts} attempt(s): {cause}")]
    Transport {
        attempts: u32,
        #[source]
        cause: TransportCause,
    },

    /// The response body could not be parsed as JSON.
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The caller cancelled before the exchange completed.
    #[error("query cancelled by caller")]
    Cancelled,
}

/// The terminal cause of an exhausted transport.
#[derive(Debug, Error)]
pub enum TransportCause {
    /// The request never produced a response (connect failure, timeout,
    /// broken body stream).
    #[error("connection error: {0}")]
    Connection(#[from] wreq::Error),

    /// The last attempt drew a retryable status (429 or 5xx).
    #[error("server returned status {0}")]
    Status(u16),
}
