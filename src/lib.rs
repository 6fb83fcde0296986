//! rtq - resilient typed client for realtime scraper query APIs
//!
//! Submits job-like queries over HTTP with basic auth, retries transient
//! failures with exponential backoff, and returns typed results.

pub mod commands;
pub mod config;
pub mod format;
pub mod realtime;

pub use config::Config;
pub use realtime::client::QueryClient;
pub use realtime::error::ClientError;
pub use realtime::models::{ContextEntry, Credentials, QueryRequest, QueryResult};
pub use realtime::sources::Source;
