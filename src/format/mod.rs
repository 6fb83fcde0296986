//! Output formatting for query results (pretty JSON, compact JSON, summary).

use crate::config::OutputFormat;
use crate::realtime::models::QueryResult;
use serde_json::Value;

/// Formats query results for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a single query result.
    pub fn format_result(&self, result: &QueryResult) -> String {
        match self.format {
            OutputFormat::Pretty => self.pretty(result),
            OutputFormat::Json => self.json(result),
            OutputFormat::Summary => self.summary(result),
        }
    }

    fn pretty(&self, result: &QueryResult) -> String {
        match result {
            QueryResult::Success { body } => {
                serde_json::to_string_pretty(body).unwrap_or_else(|_| "{}".to_string())
            }
            QueryResult::Failure { status_code, message } => {
                format!("Query failed (status {}): {}", status_code, message)
            }
        }
    }

    fn json(&self, result: &QueryResult) -> String {
        let value = match result {
            QueryResult::Success { body } => body.clone(),
            QueryResult::Failure { status_code, message } => {
                serde_json::json!({ "status_code": status_code, "message": message })
            }
        };
        value.to_string()
    }

    fn summary(&self, result: &QueryResult) -> String {
        match result {
            QueryResult::Success { body } => {
                let mut lines = vec!["Status:  success".to_string()];

                if let Some(results) = body.get("results").and_then(Value::as_array) {
                    lines.push(format!("Results: {}", results.len()));
                    for (i, entry) in results.iter().enumerate() {
                        let status = entry
                            .get("status_code")
                            .and_then(Value::as_u64)
                            .map(|s| s.to_string())
                            .unwrap_or_else(|| "-".to_string());
                        let size = entry
                            .get("content")
                            .map(content_size)
                            .unwrap_or_else(|| "empty".to_string());
                        lines.push(format!("  [{}] status {}, content {}", i, status, size));
                    }
                } else {
                    lines.push(format!("Top-level keys: {}", top_level_keys(body)));
                }

                lines.join("\n")
            }
            QueryResult::Failure { status_code, message } => {
                format!("Status:  failure ({})\nMessage: {}", status_code, message)
            }
        }
    }
}

fn content_size(content: &Value) -> String {
    match content {
        Value::String(s) => format!("{} bytes", s.len()),
        Value::Object(map) => format!("{} fields", map.len()),
        Value::Array(items) => format!("{} items", items.len()),
        other => other.to_string(),
    }
}

fn top_level_keys(body: &Value) -> String {
    match body {
        Value::Object(map) => map.keys().cloned().collect::<Vec<_>>().join(", "),
        _ => "(non-object body)".to_string(),
    }
}
