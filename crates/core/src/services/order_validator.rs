use rust_decimal::Decimal;

use crate::errors::CoreError;
use crate::models::order::Side;
use crate::models::portfolio::Portfolio;

/// Business-rule preconditions for an order, as a pure predicate over a
/// portfolio snapshot.
///
/// No persistence access, no I/O. Runs once before the engine's transaction
/// and again inside it against the fresh snapshot — "check, then re-check
/// at commit" — so a stale first read can never push cash or a position
/// negative under concurrency.
pub struct OrderValidator;

impl OrderValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate an order against a portfolio snapshot and a live quote
    /// price.
    ///
    /// Rules:
    /// - Quantity must be positive (whole shares are enforced by the type)
    /// - Quote price must be positive
    /// - BUY: cash must cover quantity × price
    /// - SELL: the holding must cover the requested quantity
    pub fn validate(
        &self,
        portfolio: &Portfolio,
        side: Side,
        ticker: &str,
        quantity: u64,
        quote_price: Decimal,
    ) -> Result<(), CoreError> {
        if quantity == 0 {
            return Err(CoreError::InvalidQuantity(quantity));
        }

        // The quote layer already rejects non-positive prices; a zero here
        // means the caller bypassed it.
        if quote_price <= Decimal::ZERO {
            return Err(CoreError::QuoteUnavailable {
                ticker: ticker.to_uppercase(),
            });
        }

        match side {
            Side::Buy => {
                let required = Decimal::from(quantity) * quote_price;
                if portfolio.cash < required {
                    return Err(CoreError::InsufficientFunds {
                        required,
                        available: portfolio.cash,
                    });
                }
            }
            Side::Sell => {
                let held = portfolio.shares_held(ticker);
                if held < quantity {
                    return Err(CoreError::InsufficientShares {
                        ticker: ticker.to_uppercase(),
                        requested: quantity,
                        held,
                    });
                }
            }
        }

        Ok(())
    }
}

impl Default for OrderValidator {
    fn default() -> Self {
        Self::new()
    }
}
