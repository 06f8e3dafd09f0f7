//! Display state and the menu text derived from it

use chrono::{DateTime, Local};

use super::{format_usd, BalanceSnapshot};

/// Timestamp format for the last-updated field
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

pub const TITLE_LOADING: &str = "Loading...";
pub const TITLE_NO_API_KEY: &str = "No API Key";
pub const TITLE_API_ERROR: &str = "API Error";

/// What the menu is currently showing
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayState {
    /// Started, no fetch finished yet
    Loading,
    /// No credential configured; nothing will ever be fetched
    NoCredential,
    /// Last fetch succeeded
    Ok {
        snapshot: BalanceSnapshot,
        at: DateTime<Local>,
    },
    /// Last fetch failed
    Error { at: DateTime<Local> },
}

impl DisplayState {
    /// Render the title and the four menu fields for this state
    pub fn render(&self, provider: &str) -> MenuText {
        let provider_line = format!("Provider: {}", provider);
        match self {
            DisplayState::Loading => MenuText::initial(provider, TITLE_LOADING),
            DisplayState::NoCredential => MenuText::initial(provider, TITLE_NO_API_KEY),
            DisplayState::Ok { snapshot, at } => MenuText {
                title: format_usd(snapshot.remaining()),
                provider: provider_line,
                credits: format!("Credits: {}", format_usd(snapshot.total_credits)),
                usage: format!("Usage: {}", format_usd(snapshot.total_usage)),
                last_updated: format!("Last Updated: {}", at.format(TIMESTAMP_FORMAT)),
            },
            DisplayState::Error { at } => MenuText {
                title: TITLE_API_ERROR.to_string(),
                provider: provider_line,
                credits: "Credits: Error".to_string(),
                usage: "Usage: Error".to_string(),
                last_updated: format!("Error at: {}", at.format(TIMESTAMP_FORMAT)),
            },
        }
    }
}

/// Rendered text for the menu bar title and the menu items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuText {
    pub title: String,
    pub provider: String,
    pub credits: String,
    pub usage: String,
    pub last_updated: String,
}

impl MenuText {
    /// Text shown before any fetch has completed
    fn initial(provider: &str, title: &str) -> Self {
        Self {
            title: title.to_string(),
            provider: format!("Provider: {}", provider),
            credits: "Credits: $0.00".to_string(),
            usage: "Usage: $0.00".to_string(),
            last_updated: "Last Updated: Never".to_string(),
        }
    }

    /// Menu item lines in display order; `None` marks a separator
    pub fn lines(&self) -> [Option<&str>; 5] {
        [
            Some(self.provider.as_str()),
            Some(self.credits.as_str()),
            Some(self.usage.as_str()),
            None,
            Some(self.last_updated.as_str()),
        ]
    }
}
