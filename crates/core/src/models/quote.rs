use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Latest market data for one ticker, as served by a quote provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Ticker symbol, uppercased
    pub ticker: String,

    /// Latest (simulated) trade price (> 0)
    pub price: Decimal,

    /// Prior session close
    pub previous_close: Decimal,

    /// Day change: price − previous close
    pub change: Decimal,
}

impl Quote {
    pub fn new(ticker: impl Into<String>, price: Decimal, previous_close: Decimal) -> Self {
        Self {
            ticker: ticker.into().to_uppercase(),
            price,
            previous_close,
            change: price - previous_close,
        }
    }

    /// Day change as a percentage of the prior close.
    /// `None` when the prior close is zero (guarded division).
    #[must_use]
    pub fn change_percent(&self) -> Option<Decimal> {
        if self.previous_close.is_zero() {
            None
        } else {
            Some(self.change / self.previous_close * Decimal::from(100))
        }
    }
}
