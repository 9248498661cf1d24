//! Configuration for the lending ledger

use serde::Deserialize;
use std::env;

const DEFAULT_LOG_FILTER: &str = "lending_ledger=info";

/// Ambient settings for an embedded ledger.
///
/// The loan period is fixed at 14 days and has no setting.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LendingConfig {
    /// `tracing_subscriber::EnvFilter` directives
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for LendingConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
        }
    }
}

impl LendingConfig {
    /// Load configuration from environment variables
    ///
    /// `LENDING_LOG` wins over `RUST_LOG`; both fall back to the default filter.
    pub fn from_env() -> Self {
        let log_filter = env::var("LENDING_LOG")
            .or_else(|_| env::var("RUST_LOG"))
            .unwrap_or_else(|_| default_log_filter());

        Self { log_filter }
    }
}
