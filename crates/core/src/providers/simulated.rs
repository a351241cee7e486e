use async_trait::async_trait;
use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::Mutex;

use super::traits::QuoteProvider;
use crate::errors::CoreError;
use crate::models::quote::Quote;

/// Price floor for the random walk. A quote price must stay positive.
const MIN_PRICE: Decimal = dec!(0.01);

/// Maximum per-poll move, in basis points (±50 = ±0.5%).
const MAX_MOVE_BPS: i64 = 50;

/// In-process simulated market feed.
///
/// Seeded with a fixed ticker universe; each poll nudges the last price by
/// a small random step (bounded, floored above zero), so repeated quotes
/// look like a live ticker without any network I/O. The previous close is
/// fixed at the seeded base price for the lifetime of the provider.
///
/// Unknown symbols are rejected with `UnknownTicker` — the validator relies
/// on this to stop orders against symbols the feed cannot price.
pub struct SimulatedQuoteProvider {
    /// Last simulated price per ticker, walked on every poll.
    last_prices: Mutex<HashMap<String, Decimal>>,
    /// Base (previous close) price per ticker.
    base_prices: HashMap<String, Decimal>,
}

impl SimulatedQuoteProvider {
    /// Create a feed with the default ticker universe.
    pub fn new() -> Self {
        let universe = vec![
            ("AAPL", dec!(189.50)),
            ("MSFT", dec!(415.20)),
            ("GOOGL", dec!(172.80)),
            ("AMZN", dec!(183.40)),
            ("TSLA", dec!(246.30)),
            ("NVDA", dec!(121.75)),
            ("META", dec!(512.60)),
            ("NFLX", dec!(645.10)),
            ("JPM", dec!(209.45)),
            ("V", dec!(287.90)),
            ("WMT", dec!(68.25)),
            ("KO", dec!(62.80)),
            ("DIS", dec!(94.15)),
            ("INTC", dec!(21.40)),
            ("AMD", dec!(155.85)),
        ];
        Self::with_universe(universe)
    }

    /// Create a feed with a custom `(ticker, base price)` universe.
    pub fn with_universe(universe: Vec<(&str, Decimal)>) -> Self {
        let base_prices: HashMap<String, Decimal> = universe
            .into_iter()
            .map(|(sym, price)| (sym.to_uppercase(), price))
            .collect();
        Self {
            last_prices: Mutex::new(HashMap::new()),
            base_prices,
        }
    }

    /// Tickers this feed can serve, sorted.
    #[must_use]
    pub fn tickers(&self) -> Vec<String> {
        let mut tickers: Vec<String> = self.base_prices.keys().cloned().collect();
        tickers.sort();
        tickers
    }

    /// Advance the walk for one ticker and return the new price.
    fn next_price(&self, ticker: &str, base: Decimal) -> Decimal {
        let mut last = self.last_prices.lock().unwrap_or_else(|e| e.into_inner());
        let current = last.get(ticker).copied().unwrap_or(base);

        let bps = rand::thread_rng().gen_range(-MAX_MOVE_BPS..=MAX_MOVE_BPS);
        let step = current * Decimal::from(bps) / Decimal::from(10_000);
        let next = (current + step).max(MIN_PRICE);

        last.insert(ticker.to_string(), next);
        next
    }
}

impl Default for SimulatedQuoteProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuoteProvider for SimulatedQuoteProvider {
    fn name(&self) -> &str {
        "SimulatedFeed"
    }

    async fn get_quote(&self, ticker: &str) -> Result<Quote, CoreError> {
        let upper = ticker.to_uppercase();
        let base = self
            .base_prices
            .get(&upper)
            .copied()
            .ok_or_else(|| CoreError::UnknownTicker(upper.clone()))?;

        let price = self.next_price(&upper, base);
        tracing::debug!(ticker = %upper, %price, "simulated quote served");

        Ok(Quote::new(upper, price, base))
    }
}
