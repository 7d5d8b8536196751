//! Configuration loading from environment variables.

use crate::constants::{DEFAULT_SEARCH_DEBOUNCE_MS, DEFAULT_SERVER_URL, DEFAULT_TIMEOUT_SECS};
use serde::Deserialize;
use std::env;
use std::time::Duration;

/// Environment variable holding the API base URL.
pub const SERVER_ENV: &str = "SNIPVAULT_SERVER";
/// Environment variable holding the request timeout in seconds.
pub const TIMEOUT_ENV: &str = "SNIPVAULT_TIMEOUT_SECS";
/// Environment variable holding the search debounce in milliseconds.
pub const SEARCH_DEBOUNCE_ENV: &str = "SNIPVAULT_SEARCH_DEBOUNCE_MS";
/// Environment flag enabling per-request timing logs in the backend worker.
pub const PERF_LOG_ENV: &str = "SNIPVAULT_PERF_LOG";

/// Runtime configuration for SnipVault clients.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub server_url: String,
    pub timeout_secs: u64,
    pub search_debounce_ms: u64,
    pub perf_log: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            perf_log: false,
        }
    }
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment; missing or unrecognized is `false`.
pub fn env_flag_enabled(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(false)
}

fn env_u64(name: &str) -> Option<u64> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring invalid {}='{}'; using default", name, raw);
            None
        }
    }
}

fn env_non_blank(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing
    /// or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_url: env_non_blank(SERVER_ENV).unwrap_or(defaults.server_url),
            timeout_secs: env_u64(TIMEOUT_ENV)
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.timeout_secs),
            search_debounce_ms: env_u64(SEARCH_DEBOUNCE_ENV).unwrap_or(defaults.search_debounce_ms),
            perf_log: env_flag_enabled(PERF_LOG_ENV),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}
