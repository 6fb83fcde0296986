//! Product lookup command implementation.

use crate::config::Config;
use crate::format::Formatter;
use crate::realtime::{Credentials, QueryClient, QueryRequest, QueryTransport, Source};
use anyhow::{Context, Result};
use tracing::info;

/// Per-lookup options mapped onto the query payload.
#[derive(Debug, Default, Clone)]
pub struct ProductOptions {
    /// Target domain/TLD (e.g. "com")
    pub domain: Option<String>,
    /// Fetch seller/pricing listings instead of the product page
    pub pricing: bool,
    /// Request structured parsing
    pub parse: bool,
}

/// Executes a product lookup by product id.
pub struct ProductCommand {
    config: Config,
    credentials: Credentials,
}

impl ProductCommand {
    /// Creates a new product command.
    pub fn new(config: Config, credentials: Credentials) -> Self {
        Self { config, credentials }
    }

    /// Looks up a product and returns formatted output.
    pub async fn execute(&self, product_id: &str, options: &ProductOptions) -> Result<String> {
        let client = QueryClient::new(&self.config, self.credentials.clone())
            .context("Failed to create query client")?;

        self.execute_with_client(&client, product_id, options).await
    }

    /// Looks up a product with a provided client (for testing).
    pub async fn execute_with_client<T: QueryTransport>(
        &self,
        client: &QueryClient<T>,
        product_id: &str,
        options: &ProductOptions,
    ) -> Result<String> {
        let product_id = product_id.trim();
        if product_id.is_empty() {
            anyhow::bail!("Product id must not be empty");
        }

        info!("Looking up product: {}", product_id);

        let result = client.submit(&build_request(product_id, options)).await?;

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_result(&result))
    }

    /// Looks up multiple products, one query each, strictly in order.
    pub async fn execute_batch(
        &self,
        product_ids: &[String],
        options: &ProductOptions,
    ) -> Result<String> {
        let client = QueryClient::new(&self.config, self.credentials.clone())
            .context("Failed to create query client")?;

        self.execute_batch_with_client(&client, product_ids, options).await
    }

    /// Looks up multiple products with a provided client (for testing).
    pub async fn execute_batch_with_client<T: QueryTransport>(
        &self,
        client: &QueryClient<T>,
        product_ids: &[String],
        options: &ProductOptions,
    ) -> Result<String> {
        let mut outputs = Vec::with_capacity(product_ids.len());

        for product_id in product_ids {
            let output = self.execute_with_client(client, product_id, options).await?;
            outputs.push(format!("=== {} ===\n{}", product_id, output));
        }

        Ok(outputs.join("\n\n"))
    }
}

/// Builds the lookup payload: the product id travels in the `query` field.
fn build_request(product_id: &str, options: &ProductOptions) -> QueryRequest {
    let source =
        if options.pricing { Source::GoogleShoppingPricing } else { Source::GoogleShoppingProduct };

    let mut request = QueryRequest::new(source).with_query(product_id);

    if let Some(domain) = &options.domain {
        request = request.with_domain(domain.clone());
    }
    if options.parse {
        request = request.with_parse(true);
    }

    request
}
