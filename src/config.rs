//! Startup configuration read from the process environment

use std::fmt;
use std::time::Duration;

use crate::providers::OPENROUTER_CREDITS_URL;

/// Environment variable holding the OpenRouter API key
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// How often the balance is re-fetched (30 minutes)
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(1800);

/// Hard timeout for a single balance request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything the monitor needs, resolved once at startup
pub struct Config {
    /// Bearer credential; `None` disables all network activity
    pub credential: Option<String>,
    pub endpoint: String,
    pub refresh_interval: Duration,
    pub request_timeout: Duration,
}

impl Config {
    /// Read the credential from the environment
    pub fn from_env() -> Self {
        let api_env_names: Vec<String> = std::env::vars_os()
            .filter_map(|(k, _)| k.into_string().ok())
            .filter(|k| k.contains("API"))
            .collect();
        tracing::debug!(?api_env_names, "Environment variables mentioning API");

        Self::with_credential(std::env::var(API_KEY_ENV).ok())
    }

    /// Build a config around an explicit credential; empty counts as missing
    pub fn with_credential(credential: Option<String>) -> Self {
        Self {
            credential: credential.filter(|c| !c.is_empty()),
            endpoint: OPENROUTER_CREDITS_URL.to_string(),
            refresh_interval: REFRESH_INTERVAL,
            request_timeout: REQUEST_TIMEOUT,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field(
                "credential",
                &self.credential.as_ref().map(|_| "[REDACTED]"),
            )
            .field("endpoint", &self.endpoint)
            .field("refresh_interval", &self.refresh_interval)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
