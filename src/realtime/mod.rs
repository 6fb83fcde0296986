//! Realtime query submission: models, payload building, transport, and the
//! client facade.

pub mod client;
pub mod decode;
pub mod error;
pub mod models;
pub mod payload;
pub mod sources;
pub mod transport;

pub use client::QueryClient;
pub use error::{ClientError, TransportCause};
pub use models::{ContextEntry, Credentials, QueryRequest, QueryResult, RawResponse};
pub use sources::Source;
pub use transport::{HttpTransport, QueryTransport};
