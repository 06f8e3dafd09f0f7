//! Balance source implementations

mod openrouter;

use async_trait::async_trait;

use crate::core::{BalanceError, BalanceSnapshot};

pub use openrouter::{OpenRouterSource, OPENROUTER_CREDITS_URL};

/// Something that can report a credit balance for a bearer credential
#[async_trait]
pub trait BalanceSource: Send + Sync {
    /// Label shown in the "Provider:" menu line
    fn provider_name(&self) -> &'static str;

    /// Fetch the current balance
    async fn fetch(&self, credential: &str) -> Result<BalanceSnapshot, BalanceError>;
}
