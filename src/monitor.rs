//! Balance monitor
//!
//! Owns the credential and the current display state. Each refresh performs one
//! fetch and recomputes the menu text from its outcome alone; nothing from
//! earlier fetches is kept.

use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::time::MissedTickBehavior;

use crate::core::{BalanceError, BalanceSnapshot, DisplayState, MenuText};
use crate::providers::BalanceSource;

/// What the poller hands to the display after every change
#[derive(Debug, Clone)]
pub struct DisplayUpdate {
    pub state: DisplayState,
    pub text: MenuText,
}

pub struct BalanceMonitor {
    credential: Option<String>,
    source: Box<dyn BalanceSource>,
    state: DisplayState,
    text: MenuText,
}

impl BalanceMonitor {
    /// Create a monitor. Without a credential it stays in the "No API Key" state for good.
    pub fn new(credential: Option<String>, source: Box<dyn BalanceSource>) -> Self {
        let state = if credential.is_some() {
            DisplayState::Loading
        } else {
            tracing::warn!("{}", BalanceError::MissingCredential);
            DisplayState::NoCredential
        };
        let text = state.render(source.provider_name());

        Self {
            credential,
            source,
            state,
            text,
        }
    }

    pub fn provider(&self) -> &'static str {
        self.source.provider_name()
    }

    pub fn has_credential(&self) -> bool {
        self.credential.as_deref().is_some_and(|c| !c.is_empty())
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn text(&self) -> &MenuText {
        &self.text
    }

    pub fn update(&self) -> DisplayUpdate {
        DisplayUpdate {
            state: self.state.clone(),
            text: self.text.clone(),
        }
    }

    /// Fetch the balance once. Never touches the network without a credential.
    pub async fn fetch_balance(&self) -> Result<BalanceSnapshot, BalanceError> {
        let credential = match self.credential.as_deref() {
            Some(c) if !c.is_empty() => c,
            _ => return Err(BalanceError::MissingCredential),
        };

        self.source.fetch(credential).await
    }

    /// Fetch and update the display. Failures are logged, never returned.
    pub async fn refresh(&mut self) -> &MenuText {
        let outcome = self.fetch_balance().await;
        self.apply(outcome, Local::now())
    }

    fn apply(
        &mut self,
        outcome: Result<BalanceSnapshot, BalanceError>,
        at: DateTime<Local>,
    ) -> &MenuText {
        self.state = match outcome {
            Ok(snapshot) => {
                tracing::info!(
                    total_credits = snapshot.total_credits,
                    total_usage = snapshot.total_usage,
                    remaining = snapshot.remaining(),
                    "Balance updated"
                );
                DisplayState::Ok { snapshot, at }
            }
            Err(e) => {
                tracing::warn!("{}", e);
                DisplayState::Error { at }
            }
        };
        self.text = self.state.render(self.source.provider_name());
        &self.text
    }
}

/// Drive a monitor for the life of the process.
///
/// Publishes the initial text, then (with a credential) refreshes immediately
/// and every `interval` after that. `publish` returns `false` once nobody is
/// listening, which stops the loop.
pub async fn run_poller<F>(mut monitor: BalanceMonitor, interval: Duration, mut publish: F)
where
    F: FnMut(DisplayUpdate) -> bool,
{
    if !publish(monitor.update()) {
        return;
    }

    if !monitor.has_credential() {
        tracing::info!("No credential configured, balance polling disabled");
        return;
    }

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        monitor.refresh().await;
        if !publish(monitor.update()) {
            tracing::debug!("Display closed, stopping balance poller");
            break;
        }
    }
}
