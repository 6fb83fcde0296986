//! Client facade: build -> send -> decode, with cancellation support.

use crate::config::Config;
use crate::realtime::decode;
use crate::realtime::error::ClientError;
use crate::realtime::models::{Credentials, QueryRequest, QueryResult};
use crate::realtime::payload;
use crate::realtime::transport::{HttpTransport, QueryTransport};
use anyhow::Result;
use std::future::Future;
use tracing::info;

/// Typed client for the realtime query endpoint.
///
/// Holds only immutable configuration and credentials, so one client can be
/// shared freely across concurrent callers. Each [`submit`](Self::submit)
/// call runs its pipeline independently; results arrive in completion
/// order, not submission order.
pub struct QueryClient<T = HttpTransport> {
    transport: T,
    credentials: Credentials,
}

impl QueryClient<HttpTransport> {
    /// Creates a client with the standard HTTP transport.
    pub fn new(config: &Config, credentials: Credentials) -> Result<Self> {
        let transport = HttpTransport::new(config)?;
        Ok(Self { transport, credentials })
    }
}

impl<T: QueryTransport> QueryClient<T> {
    /// Creates a client over a custom transport (for testing).
    pub fn with_transport(transport: T, credentials: Credentials) -> Self {
        Self { transport, credentials }
    }

    /// Submits one query and waits for its result.
    ///
    /// The pipeline short-circuits on the first failing stage: validation
    /// errors are never sent, transport errors are never decoded.
    pub async fn submit(&self, request: &QueryRequest) -> Result<QueryResult, ClientError> {
        self.submit_with_cancel(request, std::future::pending::<()>()).await
    }

    /// Submits one query, abandoning the exchange if `cancel` resolves
    /// first.
    ///
    /// Cancellation is only observed while the transport is in flight; it
    /// drops the pending attempt and any remaining retries and reports
    /// [`ClientError::Cancelled`]. Once a response has been received,
    /// decoding always completes.
    pub async fn submit_with_cancel(
        &self,
        request: &QueryRequest,
        cancel: impl Future<Output = ()> + Send,
    ) -> Result<QueryResult, ClientError> {
        let payload = payload::build(request)?;

        info!("Submitting query to source {}", request.source);

        tokio::pin!(cancel);
        let raw = tokio::select! {
            biased;
            _ = &mut cancel => return Err(ClientError::Cancelled),
            raw = self.transport.send(&payload, &self.credentials) => raw?,
        };

        decode::decode(&raw)
    }
}
