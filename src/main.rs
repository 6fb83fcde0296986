//! rtq - resilient typed client CLI for realtime scraper query APIs
//!
//! Replaces copy-pasted per-example request scripts with one client that
//! validates, retries, and decodes.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use rtq::commands::{
    ProductCommand, ProductOptions, SearchCommand, SearchOptions, UrlCommand, UrlOptions,
};
use rtq::config::{Config, OutputFormat};
use rtq::realtime::{Credentials, Source};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "rtq",
    version,
    about = "Typed client for realtime scraper query APIs",
    long_about = "Submits queries to a realtime scraper query endpoint with retry, backoff, and typed results."
)]
struct Cli {
    /// Service username
    #[arg(short, long, global = true, env = "RTQ_USERNAME")]
    username: Option<String>,

    /// Service password
    #[arg(short, long, global = true, env = "RTQ_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Base URL of the query service
    #[arg(long, global = true, env = "RTQ_BASE_URL")]
    base_url: Option<String>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "RTQ_PROXY")]
    proxy: Option<String>,

    /// Retries for transient failures
    #[arg(long, global = true)]
    max_retries: Option<u32>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "pretty", global = true)]
    format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search shopping results for a query term
    #[command(alias = "s")]
    Search {
        /// Search query
        query: String,

        /// Target domain/TLD (e.g. "com")
        #[arg(short, long)]
        domain: Option<String>,

        /// Geographic origin (e.g. "New York,New York,United States")
        #[arg(short, long)]
        geo: Option<String>,

        /// Number of result pages
        #[arg(long)]
        pages: Option<u32>,

        /// Result ordering (e.g. "pd" = price descending, "rv" = reviews)
        #[arg(long)]
        sort_by: Option<String>,

        /// Minimum price filter
        #[arg(long)]
        min_price: Option<i64>,

        /// Maximum price filter
        #[arg(long)]
        max_price: Option<i64>,

        /// Request structured parsing
        #[arg(long)]
        parse: bool,
    },

    /// Look up shopping products by product id
    #[command(alias = "p")]
    Product {
        /// Product id(s) to look up
        #[arg(required = true)]
        ids: Vec<String>,

        /// Target domain/TLD (e.g. "com")
        #[arg(short, long)]
        domain: Option<String>,

        /// Fetch seller/pricing listings instead of the product page
        #[arg(long)]
        pricing: bool,

        /// Request structured parsing
        #[arg(long)]
        parse: bool,
    },

    /// Submit a full search URL
    Url {
        /// Search URL to submit
        url: String,

        /// Geographic origin
        #[arg(short, long)]
        geo: Option<String>,

        /// Request structured parsing
        #[arg(long)]
        parse: bool,
    },

    /// List known scraper backends
    Sources,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    config.format = cli.format;

    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }
    if let Some(max_retries) = cli.max_retries {
        config.max_retries = max_retries;
    }

    match cli.command {
        Commands::Search { query, domain, geo, pages, sort_by, min_price, max_price, parse } => {
            let credentials = credentials(cli.username, cli.password)?;
            let options = SearchOptions {
                domain,
                geo_location: geo,
                pages,
                sort_by,
                min_price,
                max_price,
                parse,
            };

            let cmd = SearchCommand::new(config, credentials);
            let output = cmd.execute(&query, &options).await?;
            println!("{}", output);
        }

        Commands::Product { ids, domain, pricing, parse } => {
            let credentials = credentials(cli.username, cli.password)?;
            let options = ProductOptions { domain, pricing, parse };

            let cmd = ProductCommand::new(config, credentials);
            let output = if ids.len() == 1 {
                cmd.execute(&ids[0], &options).await?
            } else {
                cmd.execute_batch(&ids, &options).await?
            };

            println!("{}", output);
        }

        Commands::Url { url, geo, parse } => {
            let credentials = credentials(cli.username, cli.password)?;
            let options = UrlOptions { geo_location: geo, parse };

            let cmd = UrlCommand::new(config, credentials);
            let output = cmd.execute(&url, &options).await?;
            println!("{}", output);
        }

        Commands::Sources => {
            println!("Known scraper backends:\n");
            println!("{:<28} {:<10}", "Source", "Input");
            println!("{:-<28} {:-<10}", "", "");

            for source in Source::known() {
                let input = if source.is_url_driven() { "url" } else { "query" };
                println!("{:<28} {:<10}", source.to_string(), input);
            }

            println!("\nAny other backend name is passed through verbatim.");
        }
    }

    Ok(())
}

/// Assembles credentials from CLI/env, failing with a usable hint.
fn credentials(username: Option<String>, password: Option<String>) -> Result<Credentials> {
    match (username, password) {
        (Some(username), Some(password)) => Ok(Credentials::new(username, password)),
        _ => bail!(
            "Missing credentials: pass --username/--password or set RTQ_USERNAME/RTQ_PASSWORD"
        ),
    }
}
