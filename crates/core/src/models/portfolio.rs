use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single open position in one ticker.
///
/// Keyed by `(portfolio, ticker)` — a portfolio never holds two entries for
/// the same symbol. A holding with quantity 0 is deleted, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Ticker symbol, uppercased (e.g., "AAPL")
    pub ticker: String,

    /// Number of shares held (always > 0 while the holding exists)
    pub quantity: u64,

    /// Weighted-average cost per share. Recomputed on every buy,
    /// unchanged by sells.
    pub average_price: Decimal,
}

impl Holding {
    pub fn new(ticker: impl Into<String>, quantity: u64, average_price: Decimal) -> Self {
        Self {
            ticker: ticker.into().to_uppercase(),
            quantity,
            average_price,
        }
    }

    /// Total cost basis of the position: quantity × average price.
    #[must_use]
    pub fn cost_basis(&self) -> Decimal {
        Decimal::from(self.quantity) * self.average_price
    }
}

/// One user's simulated trading account: virtual cash plus open holdings.
///
/// Mutated only by the portfolio engine inside an order-apply transaction;
/// `cash` never goes negative. Holdings are kept in a `BTreeMap` so
/// listings are deterministic (sorted by ticker).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    /// Stable opaque identifier supplied by the identity layer
    pub user_id: String,

    /// Virtual cash balance (≥ 0)
    pub cash: Decimal,

    /// Open positions, keyed by uppercase ticker
    pub holdings: BTreeMap<String, Holding>,

    /// When this portfolio was lazily created
    pub created_at: DateTime<Utc>,
}

impl Portfolio {
    /// Create a fresh portfolio with the given starting cash and no holdings.
    pub fn new(user_id: impl Into<String>, starting_cash: Decimal) -> Self {
        Self {
            user_id: user_id.into(),
            cash: starting_cash,
            holdings: BTreeMap::new(),
            created_at: Utc::now(),
        }
    }

    /// Look up the holding for a ticker (case-insensitive).
    #[must_use]
    pub fn holding(&self, ticker: &str) -> Option<&Holding> {
        self.holdings.get(&ticker.to_uppercase())
    }

    /// Number of shares held of a ticker, 0 if no holding exists.
    #[must_use]
    pub fn shares_held(&self, ticker: &str) -> u64 {
        self.holding(ticker).map_or(0, |h| h.quantity)
    }
}
