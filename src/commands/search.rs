//! Shopping search command implementation.

use crate::config::Config;
use crate::format::Formatter;
use crate::realtime::{Credentials, QueryClient, QueryRequest, QueryTransport, Source};
use anyhow::{Context, Result};
use tracing::info;

/// Per-search options mapped onto the query payload.
#[derive(Debug, Default, Clone)]
pub struct SearchOptions {
    /// Target domain/TLD (e.g. "com")
    pub domain: Option<String>,
    /// Geographic origin for the query
    pub geo_location: Option<String>,
    /// Number of result pages
    pub pages: Option<u32>,
    /// Result ordering (e.g. "pd" for price descending)
    pub sort_by: Option<String>,
    /// Minimum price filter, applied remotely
    pub min_price: Option<i64>,
    /// Maximum price filter, applied remotely
    pub max_price: Option<i64>,
    /// Request structured parsing
    pub parse: bool,
}

/// Executes a shopping search query.
pub struct SearchCommand {
    config: Config,
    credentials: Credentials,
}

impl SearchCommand {
    /// Creates a new search command.
    pub fn new(config: Config, credentials: Credentials) -> Self {
        Self { config, credentials }
    }

    /// Submits the search and returns formatted output.
    pub async fn execute(&self, query: &str, options: &SearchOptions) -> Result<String> {
        let client = QueryClient::new(&self.config, self.credentials.clone())
            .context("Failed to create query client")?;

        self.execute_with_client(&client, query, options).await
    }

    /// Submits the search with a provided client (for testing).
    pub async fn execute_with_client<T: QueryTransport>(
        &self,
        client: &QueryClient<T>,
        query: &str,
        options: &SearchOptions,
    ) -> Result<String> {
        info!("Searching for: {}", query);

        let request = build_request(query, options);
        let result = client.submit(&request).await?;

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_result(&result))
    }
}

/// Builds the search payload. Filter parameters travel in the `context`
/// array, in a fixed order so identical invocations produce identical
/// payloads.
fn build_request(query: &str, options: &SearchOptions) -> QueryRequest {
    let mut request = QueryRequest::new(Source::GoogleShoppingSearch).with_query(query);

    if let Some(domain) = &options.domain {
        request = request.with_domain(domain.clone());
    }
    if let Some(geo) = &options.geo_location {
        request = request.with_geo_location(geo.clone());
    }
    if let Some(pages) = options.pages {
        request = request.with_pages(pages);
    }
    if let Some(sort_by) = &options.sort_by {
        request = request.with_context("sort_by", sort_by.clone());
    }
    if let Some(min_price) = options.min_price {
        request = request.with_context("min_price", min_price);
    }
    if let Some(max_price) = options.max_price {
        request = request.with_context("max_price", max_price);
    }
    if options.parse {
        request = request.with_parse(true);
    }

    request
}
