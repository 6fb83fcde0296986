//! Configuration management with TOML, environment variables, and CLI overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Client configuration with layered loading.
///
/// Credentials are deliberately not part of this struct: they are passed to
/// the client separately and never round-trip through config files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the realtime query service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Per-attempt request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Connection timeout in milliseconds
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Retries after the first attempt for transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// First backoff delay in milliseconds; later delays double
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,

    /// Stretch each backoff delay by a random factor up to 25%
    #[serde(default = "default_backoff_jitter")]
    pub backoff_jitter: bool,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_base_url() -> String {
    "https://realtime.oxylabs.io".to_string()
}

fn default_timeout_ms() -> u64 {
    60_000
}

fn default_connect_timeout_ms() -> u64 {
    10_000
}

fn default_max_retries() -> u32 {
    3
}

fn default_backoff_base_ms() -> u64 {
    500
}

fn default_backoff_jitter() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            proxy: None,
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            max_retries: default_max_retries(),
            backoff_base_ms: default_backoff_base_ms(),
            backoff_jitter: default_backoff_jitter(),
            format: OutputFormat::Pretty,
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // 1. Explicit path takes precedence
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // 2. Try current directory
        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        // 3. Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("rtq").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        // 4. Return default config
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(base_url) = std::env::var("RTQ_BASE_URL") {
            self.base_url = base_url;
        }

        if let Ok(proxy) = std::env::var("RTQ_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Ok(retries) = std::env::var("RTQ_MAX_RETRIES") {
            if let Ok(r) = retries.parse() {
                self.max_retries = r;
            }
        }

        self
    }
}

/// Output format for query results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Json,
    Summary,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(OutputFormat::Pretty),
            "json" => Ok(OutputFormat::Json),
            "summary" => Ok(OutputFormat::Summary),
            _ => Err(format!("Unknown format: {}. Use: pretty, json, summary", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Pretty => write!(f, "pretty"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Summary => write!(f, "summary"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    /// Serializes tests that mutate process environment variables.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.base_url, "https://realtime.oxylabs.io");
        assert!(config.proxy.is_none());
        assert_eq!(config.timeout_ms, 60_000);
        assert_eq!(config.connect_timeout_ms, 10_000);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.backoff_base_ms, 500);
        assert!(config.backoff_jitter);
        assert_eq!(config.format, OutputFormat::Pretty);
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("pretty".parse::<OutputFormat>().unwrap(), OutputFormat::Pretty);
        assert_eq!("PRETTY".parse::<OutputFormat>().unwrap(), OutputFormat::Pretty);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("summary".parse::<OutputFormat>().unwrap(), OutputFormat::Summary);

        let err = "invalid".parse::<OutputFormat>().unwrap_err();
        assert!(err.contains("Unknown format"));
        assert!(err.contains("pretty, json, summary"));
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Pretty.to_string(), "pretty");
        assert_eq!(OutputFormat::Json.to_string(), "json");
        assert_eq!(OutputFormat::Summary.to_string(), "summary");
    }

    #[test]
    fn test_config_from_toml() {
        let toml = r#"
            base_url = "https://staging.example.io"
            max_retries = 5
            backoff_base_ms = 250
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.base_url, "https://staging.example.io");
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.backoff_base_ms, 250);
        // Unset fields keep their defaults
        assert_eq!(config.timeout_ms, 60_000);
        assert!(config.backoff_jitter);
    }

    #[test]
    fn test_config_from_toml_all_fields() {
        let toml = r#"
            base_url = "http://localhost:8080"
            proxy = "socks5://localhost:1080"
            timeout_ms = 15000
            connect_timeout_ms = 5000
            max_retries = 2
            backoff_base_ms = 100
            backoff_jitter = false
            format = "json"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.proxy, Some("socks5://localhost:1080".to_string()));
        assert_eq!(config.timeout_ms, 15000);
        assert_eq!(config.connect_timeout_ms, 5000);
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.backoff_base_ms, 100);
        assert!(!config.backoff_jitter);
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn test_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            base_url = "http://localhost:9000"
            max_retries = 1
            "#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.max_retries, 1);
    }

    #[test]
    fn test_config_from_file_not_found() {
        let result = Config::from_file("/nonexistent/path/config.toml");
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Failed to read config file"));
    }

    #[test]
    fn test_config_from_file_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid toml {{{{").unwrap();

        let result = Config::from_file(file.path());
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Failed to parse config file"));
    }

    #[test]
    fn test_config_load_explicit_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            max_retries = 7
            format = "summary"
            "#
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.max_retries, 7);
        assert_eq!(config.format, OutputFormat::Summary);
    }

    #[test]
    fn test_config_with_env() {
        let _guard = ENV_LOCK.lock().unwrap();

        // Save original env vars
        let orig_base_url = std::env::var("RTQ_BASE_URL").ok();
        let orig_proxy = std::env::var("RTQ_PROXY").ok();
        let orig_retries = std::env::var("RTQ_MAX_RETRIES").ok();

        // Set test env vars
        std::env::set_var("RTQ_BASE_URL", "http://env.example.io");
        std::env::set_var("RTQ_PROXY", "http://proxy:8080");
        std::env::set_var("RTQ_MAX_RETRIES", "9");

        let config = Config::new().with_env();
        assert_eq!(config.base_url, "http://env.example.io");
        assert_eq!(config.proxy, Some("http://proxy:8080".to_string()));
        assert_eq!(config.max_retries, 9);

        // Restore original env vars
        match orig_base_url {
            Some(v) => std::env::set_var("RTQ_BASE_URL", v),
            None => std::env::remove_var("RTQ_BASE_URL"),
        }
        match orig_proxy {
            Some(v) => std::env::set_var("RTQ_PROXY", v),
            None => std::env::remove_var("RTQ_PROXY"),
        }
        match orig_retries {
            Some(v) => std::env::set_var("RTQ_MAX_RETRIES", v),
            None => std::env::remove_var("RTQ_MAX_RETRIES"),
        }
    }

    #[test]
    fn test_config_with_env_invalid_retries() {
        let _guard = ENV_LOCK.lock().unwrap();

        let orig_retries = std::env::var("RTQ_MAX_RETRIES").ok();

        std::env::set_var("RTQ_MAX_RETRIES", "not_a_number");

        let config = Config::new().with_env();
        // Invalid values are ignored, keeping defaults
        assert_eq!(config.max_retries, 3);

        match orig_retries {
            Some(v) => std::env::set_var("RTQ_MAX_RETRIES", v),
            None => std::env::remove_var("RTQ_MAX_RETRIES"),
        }
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config {
            base_url: "http://localhost:8080".to_string(),
            proxy: Some("socks5://localhost:1080".to_string()),
            timeout_ms: 15000,
            connect_timeout_ms: 5000,
            max_retries: 2,
            backoff_base_ms: 100,
            backoff_jitter: false,
            format: OutputFormat::Json,
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.base_url, config.base_url);
        assert_eq!(parsed.proxy, config.proxy);
        assert_eq!(parsed.timeout_ms, config.timeout_ms);
        assert_eq!(parsed.max_retries, config.max_retries);
        assert_eq!(parsed.backoff_base_ms, config.backoff_base_ms);
        assert_eq!(parsed.backoff_jitter, config.backoff_jitter);
        assert_eq!(parsed.format, config.format);
    }
}
