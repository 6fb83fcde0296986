//! Data models for query submission: requests, credentials, and results.

use crate::realtime::sources::Source;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A single outbound query to the realtime endpoint.
///
/// Constructed per call and consumed exactly once; nothing is retained by
/// the client after a result is produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Scraper backend handling the query.
    pub source: Source,
    /// Target domain/TLD (e.g. "com"), where the backend supports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Search term or opaque token (product id) for term-driven sources.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Full target URL for URL-driven sources.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Geographic origin for the query (e.g. "New York,New York,United States").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo_location: Option<String>,
    /// Number of result pages to fetch. Must be >= 1 when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<u32>,
    /// Request structured parsing from the remote service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse: Option<bool>,
    /// Backend-specific parameters, sent in insertion order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context: Vec<ContextEntry>,
}

impl QueryRequest {
    /// Creates a request for the given backend with no parameters set.
    pub fn new(source: Source) -> Self {
        Self {
            source,
            domain: None,
            query: None,
            url: None,
            geo_location: None,
            pages: None,
            parse: None,
            context: Vec::new(),
        }
    }

    /// Sets the search term or opaque token.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Sets the full target URL (URL-driven sources).
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the target domain/TLD.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Sets the geographic origin.
    pub fn with_geo_location(mut self, geo: impl Into<String>) -> Self {
        self.geo_location = Some(geo.into());
        self
    }

    /// Sets the number of pages to fetch.
    pub fn with_pages(mut self, pages: u32) -> Self {
        self.pages = Some(pages);
        self
    }

    /// Requests structured parsing.
    pub fn with_parse(mut self, parse: bool) -> Self {
        self.parse = Some(parse);
        self
    }

    /// Appends a backend-specific context parameter. Order is preserved and
    /// repeated keys are allowed.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.push(ContextEntry { key: key.into(), value: value.into() });
        self
    }
}

/// One `{key, value}` pair in the request's `context` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextEntry {
    pub key: String,
    /// Opaque value: the remote accepts strings, numbers, and booleans here.
    pub value: Value,
}

/// Basic-auth credentials for the remote service.
///
/// Held for the client's lifetime, never serialized, and redacted from
/// `Debug` output so they cannot leak through logs.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Creates a credential pair.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }

    /// Returns the `Authorization` header value for these credentials.
    pub fn header_value(&self) -> String {
        let token = BASE64.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {}", token)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Raw HTTP exchange output handed from the transport to the decoder.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Outcome of a submitted query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    /// The remote accepted the query. The body is the vendor's JSON
    /// document, left uninterpreted.
    Success { body: Value },
    /// The remote rejected the query with a non-retryable error status.
    Failure { status_code: u16, message: String },
}

impl QueryResult {
    /// Returns true for the `Success` variant.
    pub fn is_success(&self) -> bool {
        matches!(self, QueryResult::Success { .. })
    }

    /// Returns the response body for successful results.
    pub fn body(&self) -> Option<&Value> {
        match self {
            QueryResult::Success { body } => Some(body),
            QueryResult::Failure { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder_chain() {
        let request = QueryRequest::new(Source::GoogleShoppingSearch)
            .with_query("adidas")
            .with_geo_location("New York,New York,United States")
            .with_pages(2)
            .with_parse(true)
            .with_context("sort_by", "pd")
            .with_context("min_price", 20);

        assert_eq!(request.source, Source::GoogleShoppingSearch);
        assert_eq!(request.query.as_deref(), Some("adidas"));
        assert_eq!(request.pages, Some(2));
        assert_eq!(request.parse, Some(true));
        assert_eq!(request.context.len(), 2);
        assert_eq!(request.context[0].key, "sort_by");
        assert_eq!(request.context[1].value, Value::from(20));
    }

    #[test]
    fn test_optional_fields_skipped() {
        let request = QueryRequest::new(Source::GoogleShoppingProduct)
            .with_domain("com")
            .with_query("5007040952399054528");

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"source\":\"google_shopping_product\""));
        assert!(json.contains("\"domain\":\"com\""));
        assert!(!json.contains("pages"));
        assert!(!json.contains("geo_location"));
        assert!(!json.contains("context"));
        assert!(!json.contains("url"));
    }

    #[test]
    fn test_repeated_context_keys_preserved() {
        let request = QueryRequest::new(Source::GoogleShoppingSearch)
            .with_query("adidas")
            .with_context("filter", "new")
            .with_context("filter", "sale");

        let json = serde_json::to_value(&request).unwrap();
        let context = json["context"].as_array().unwrap();
        assert_eq!(context.len(), 2);
        assert_eq!(context[0]["value"], "new");
        assert_eq!(context[1]["value"], "sale");
    }

    #[test]
    fn test_credentials_debug_redacted() {
        let creds = Credentials::new("user", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("user"));
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_credentials_header_value() {
        // base64("user:pass") == "dXNlcjpwYXNz"
        let creds = Credentials::new("user", "pass");
        assert_eq!(creds.header_value(), "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn test_result_accessors() {
        let ok = QueryResult::Success { body: serde_json::json!({"results": []}) };
        assert!(ok.is_success());
        assert!(ok.body().is_some());

        let failed = QueryResult::Failure { status_code: 422, message: "bad".to_string() };
        assert!(!failed.is_success());
        assert!(failed.body().is_none());
    }
}
