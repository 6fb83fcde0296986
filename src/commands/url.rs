//! URL query command implementation.

use crate::config::Config;
use crate::format::Formatter;
use crate::realtime::{Credentials, QueryClient, QueryRequest, QueryTransport, Source};
use anyhow::{Context, Result};
use tracing::info;

/// Per-query options for URL-driven submissions.
#[derive(Debug, Default, Clone)]
pub struct UrlOptions {
    /// Geographic origin for the query
    pub geo_location: Option<String>,
    /// Request structured parsing
    pub parse: bool,
}

/// Submits a full search URL through the `google` source.
pub struct UrlCommand {
    config: Config,
    credentials: Credentials,
}

impl UrlCommand {
    /// Creates a new URL command.
    pub fn new(config: Config, credentials: Credentials) -> Self {
        Self { config, credentials }
    }

    /// Submits the URL query and returns formatted output.
    pub async fn execute(&self, url: &str, options: &UrlOptions) -> Result<String> {
        let client = QueryClient::new(&self.config, self.credentials.clone())
            .context("Failed to create query client")?;

        self.execute_with_client(&client, url, options).await
    }

    /// Submits the URL query with a provided client (for testing).
    pub async fn execute_with_client<T: QueryTransport>(
        &self,
        client: &QueryClient<T>,
        url: &str,
        options: &UrlOptions,
    ) -> Result<String> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            anyhow::bail!("Invalid URL '{}': expected an http(s) URL", url);
        }

        info!("Submitting URL query: {}", url);

        let mut request = QueryRequest::new(Source::Google).with_url(url);
        if let Some(geo) = &options.geo_location {
            request = request.with_geo_location(geo.clone());
        }
        if options.parse {
            request = request.with_parse(true);
        }

        let result = client.submit(&request).await?;

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_result(&result))
    }
}
