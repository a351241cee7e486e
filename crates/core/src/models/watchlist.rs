use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::quote::Quote;

/// Default display name given to a lazily created watchlist.
pub const DEFAULT_WATCHLIST_NAME: &str = "My Watchlist";

/// A ticker subscription inside a watchlist. Pure marker — no quantity,
/// no price. Created on add, deleted on remove.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistItem {
    /// Ticker symbol, uppercased
    pub ticker: String,

    /// When the ticker was added
    pub added_at: DateTime<Utc>,
}

/// One user's named watchlist. Created lazily on first access; independent
/// of holdings (watching a ticker does not require owning it).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Watchlist {
    /// Owning user
    pub user_id: String,

    /// Display name
    pub name: String,

    /// Subscribed tickers in insertion order
    pub items: Vec<WatchlistItem>,

    /// When this watchlist was lazily created
    pub created_at: DateTime<Utc>,
}

impl Watchlist {
    /// Create an empty watchlist with the default name.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            name: DEFAULT_WATCHLIST_NAME.to_string(),
            items: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Whether a ticker is already subscribed (case-insensitive).
    #[must_use]
    pub fn contains(&self, ticker: &str) -> bool {
        let upper = ticker.to_uppercase();
        self.items.iter().any(|i| i.ticker == upper)
    }
}

/// Read model for watchlist listings: the subscription joined with the
/// latest quote. `quote` is `None` when the feed could not serve the ticker
/// — one dead symbol must not sink the whole listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchedTicker {
    pub ticker: String,
    pub added_at: DateTime<Utc>,
    pub quote: Option<Quote>,
}
