//! Balance snapshot model - one successful read of the credits endpoint

/// Credits and usage reported by a single successful fetch
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BalanceSnapshot {
    /// Total credits purchased, in USD
    pub total_credits: f64,

    /// Total credits consumed, in USD
    pub total_usage: f64,
}

impl BalanceSnapshot {
    pub fn new(total_credits: f64, total_usage: f64) -> Self {
        Self {
            total_credits,
            total_usage,
        }
    }

    /// Credits minus usage. Not clamped: an overdrawn account goes negative.
    pub fn remaining(&self) -> f64 {
        self.total_credits - self.total_usage
    }
}

/// Format a USD amount the way every menu field shows it
pub fn format_usd(value: f64) -> String {
    format!("${:.2}", value)
}
