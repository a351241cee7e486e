use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::errors::CoreError;
use crate::models::portfolio::Portfolio;
use crate::models::quote::Quote;
use crate::models::valuation::{HoldingValuation, PortfolioValuation};

/// Derives mark-to-market numbers from holdings + live quotes.
///
/// Pure function of its inputs (aside from the `as_of` timestamp): no
/// hidden state, no I/O, identical holdings and quotes always produce
/// identical values. Nothing computed here is ever persisted.
pub struct ValuationService;

impl ValuationService {
    pub fn new() -> Self {
        Self
    }

    /// Value every holding at its current quote and roll up the totals.
    ///
    /// `quotes` must contain an entry for every held ticker; a missing one
    /// fails with `QuoteUnavailable` rather than silently valuing the
    /// position at zero.
    pub fn value_portfolio(
        &self,
        portfolio: &Portfolio,
        quotes: &HashMap<String, Quote>,
    ) -> Result<PortfolioValuation, CoreError> {
        let mut holdings = Vec::with_capacity(portfolio.holdings.len());
        let mut total_market_value = Decimal::ZERO;

        for holding in portfolio.holdings.values() {
            let quote = quotes
                .get(&holding.ticker)
                .ok_or_else(|| CoreError::QuoteUnavailable {
                    ticker: holding.ticker.clone(),
                })?;

            let quantity = Decimal::from(holding.quantity);
            let market_value = quantity * quote.price;
            let unrealized_pl = quantity * (quote.price - holding.average_price);

            // Guarded: a zero average price cannot occur under the
            // portfolio invariants, but the division must not blow up.
            let unrealized_pl_percent = if holding.average_price.is_zero() {
                None
            } else {
                Some(
                    (quote.price - holding.average_price) / holding.average_price
                        * Decimal::from(100),
                )
            };

            total_market_value += market_value;

            holdings.push(HoldingValuation {
                ticker: holding.ticker.clone(),
                quantity: holding.quantity,
                average_price: holding.average_price,
                current_price: quote.price,
                market_value,
                unrealized_pl,
                unrealized_pl_percent,
            });
        }

        // Largest positions first
        holdings.sort_by(|a, b| b.market_value.cmp(&a.market_value));

        Ok(PortfolioValuation {
            user_id: portfolio.user_id.clone(),
            total_cash: portfolio.cash,
            total_market_value,
            net_worth: portfolio.cash + total_market_value,
            holdings,
            as_of: Utc::now(),
        })
    }
}

impl Default for ValuationService {
    fn default() -> Self {
        Self::new()
    }
}
