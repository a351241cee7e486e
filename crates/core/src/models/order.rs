use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::portfolio::Portfolio;

/// Which way an order trades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// Acquire shares, spend cash
    Buy,
    /// Dispose of shares, receive cash
    Sell,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// Immutable record of one executed trade (the audit trail).
///
/// Created once per successful order application and never mutated or
/// deleted. A rejected order produces no record. The execution price is
/// always the engine-fetched quote price, never caller input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Unique identifier
    pub id: Uuid,

    /// Owning user
    pub user_id: String,

    /// Buy or Sell
    pub side: Side,

    /// Ticker symbol, uppercased
    pub ticker: String,

    /// Number of shares traded (always positive)
    pub quantity: u64,

    /// Execution price per share, sourced from the quote provider
    pub price: Decimal,

    /// Effect on cash: negative for buys, positive for sells
    pub cash_delta: Decimal,

    /// Execution timestamp
    pub executed_at: DateTime<Utc>,
}

impl Order {
    pub fn new(
        user_id: impl Into<String>,
        side: Side,
        ticker: impl Into<String>,
        quantity: u64,
        price: Decimal,
    ) -> Self {
        let gross = Decimal::from(quantity) * price;
        let cash_delta = match side {
            Side::Buy => -gross,
            Side::Sell => gross,
        };
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            side,
            ticker: ticker.into().to_uppercase(),
            quantity,
            price,
            cash_delta,
            executed_at: Utc::now(),
        }
    }

    /// Gross notional value of the trade: quantity × price.
    #[must_use]
    pub fn notional(&self) -> Decimal {
        Decimal::from(self.quantity) * self.price
    }
}

/// What the engine hands back after a successful order.
///
/// `realized_pnl` is `Some` only for sells — profit/loss locked in against
/// the weighted-average cost basis at sale time. It is returned for display
/// and never persisted on the holding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderReceipt {
    /// Portfolio state after the order committed
    pub portfolio: Portfolio,

    /// The appended audit record
    pub order: Order,

    /// Realized P&L for sells: quantity × (price − average cost)
    pub realized_pnl: Option<Decimal>,
}
