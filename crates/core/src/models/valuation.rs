use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Mark-to-market view of a single holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingValuation {
    /// Ticker symbol
    pub ticker: String,

    /// Shares held
    pub quantity: u64,

    /// Weighted-average cost per share
    pub average_price: Decimal,

    /// Latest quote price used for this valuation
    pub current_price: Decimal,

    /// quantity × current price
    pub market_value: Decimal,

    /// Paper profit/loss: quantity × (current − average)
    pub unrealized_pl: Decimal,

    /// Paper return as a percentage of cost basis.
    /// `None` when the average price is zero — cannot occur under the
    /// portfolio invariants, but the division is guarded regardless.
    pub unrealized_pl_percent: Option<Decimal>,
}

/// Mark-to-market snapshot of an entire portfolio. Derived on demand from
/// holdings + live quotes; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioValuation {
    /// Owning user
    pub user_id: String,

    /// Virtual cash balance
    pub total_cash: Decimal,

    /// Sum of all holdings' market values
    pub total_market_value: Decimal,

    /// total cash + total market value
    pub net_worth: Decimal,

    /// Per-holding breakdown, sorted by market value (largest first)
    pub holdings: Vec<HoldingValuation>,

    /// When this snapshot was computed
    pub as_of: DateTime<Utc>,
}
