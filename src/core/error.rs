//! Error types for balance fetching

use thiserror::Error;

/// Why a fetch produced no data
///
/// Every transport, status and decoding failure collapses into `FetchFailed`;
/// callers only ever see "no data" plus a log line.
#[derive(Debug, Error)]
pub enum BalanceError {
    #[error("No API key found. Please set the OPENROUTER_API_KEY environment variable.")]
    MissingCredential,

    #[error("Error fetching balance: {0}")]
    FetchFailed(String),
}

impl From<reqwest::Error> for BalanceError {
    fn from(err: reqwest::Error) -> Self {
        BalanceError::FetchFailed(err.to_string())
    }
}

impl From<serde_json::Error> for BalanceError {
    fn from(err: serde_json::Error) -> Self {
        BalanceError::FetchFailed(format!("invalid credits response: {}", err))
    }
}
