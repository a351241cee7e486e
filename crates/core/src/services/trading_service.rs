use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

use crate::errors::CoreError;
use crate::models::order::{Order, OrderReceipt, Side};
use crate::models::portfolio::{Holding, Portfolio};
use crate::models::quote::Quote;
use crate::storage::ledger::{LedgerStore, Versioned, NEW_RECORD};

use super::order_validator::OrderValidator;

/// Virtual cash balance given to every portfolio on lazy creation.
pub const STARTING_CASH: Decimal = dec!(1_000_000);

/// How many times an order is attempted before a version conflict is
/// surfaced to the caller (one internal retry with a fresh snapshot).
const MAX_ATTEMPTS: u32 = 2;

/// The portfolio engine: owns all mutations of cash and holdings.
///
/// An order is applied as one optimistic transaction: read a versioned
/// snapshot, validate against it, compute the new state in memory (never
/// suspends), then commit portfolio + order record with a compare-and-swap
/// write. Losing the version race means another order for the same user
/// committed in between — the engine retries once against fresh state, so
/// two browser tabs trading at once serialize instead of losing updates.
pub struct TradingService {
    ledger: Arc<dyn LedgerStore>,
    validator: OrderValidator,
}

impl TradingService {
    pub fn new(ledger: Arc<dyn LedgerStore>) -> Self {
        Self {
            ledger,
            validator: OrderValidator::new(),
        }
    }

    /// Get a user's portfolio, creating an empty one with
    /// [`STARTING_CASH`] on first access.
    pub async fn get_or_create_portfolio(&self, user_id: &str) -> Result<Portfolio, CoreError> {
        Ok(self.snapshot(user_id).await?.record)
    }

    /// Validate and apply one order atomically.
    ///
    /// The execution price is taken from `quote` — fetched by the caller
    /// from the quote layer at call time, never from client input. Returns
    /// the committed portfolio, the appended order record, and (for sells)
    /// the realized P&L against the cost basis at sale time.
    pub async fn apply_order(
        &self,
        user_id: &str,
        side: Side,
        ticker: &str,
        quantity: u64,
        quote: &Quote,
    ) -> Result<OrderReceipt, CoreError> {
        let upper = ticker.to_uppercase();
        let mut attempt = 0;

        loop {
            attempt += 1;

            let Versioned {
                record: portfolio,
                version,
            } = self.snapshot(user_id).await?;

            // Re-validated against every fresh snapshot: a check that passed
            // on a stale read must not commit.
            self.validator
                .validate(&portfolio, side, &upper, quantity, quote.price)?;

            let (updated, realized_pnl) =
                Self::apply_effect(portfolio, side, &upper, quantity, quote.price);
            let order = Order::new(user_id, side, &upper, quantity, quote.price);

            match self
                .ledger
                .commit_order(updated.clone(), version, order.clone())
                .await
            {
                Ok(_) => {
                    tracing::info!(
                        user = user_id,
                        %side,
                        ticker = %upper,
                        quantity,
                        price = %quote.price,
                        "order executed"
                    );
                    return Ok(OrderReceipt {
                        portfolio: updated,
                        order,
                        realized_pnl,
                    });
                }
                Err(CoreError::ConcurrencyConflict(msg)) if attempt < MAX_ATTEMPTS => {
                    tracing::warn!(
                        user = user_id,
                        ticker = %upper,
                        attempt,
                        "order lost version race ({msg}), retrying with fresh snapshot"
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// All executed orders for a user, oldest first (audit trail).
    pub async fn order_history(&self, user_id: &str) -> Result<Vec<Order>, CoreError> {
        self.ledger.orders_for(user_id).await
    }

    // ── Internal ────────────────────────────────────────────────────

    /// Read the versioned portfolio, lazily creating it on first access.
    async fn snapshot(&self, user_id: &str) -> Result<Versioned<Portfolio>, CoreError> {
        if let Some(snapshot) = self.ledger.read_portfolio(user_id).await? {
            return Ok(snapshot);
        }

        let fresh = Portfolio::new(user_id, STARTING_CASH);
        match self
            .ledger
            .write_portfolio(fresh.clone(), NEW_RECORD)
            .await
        {
            Ok(version) => {
                tracing::info!(user = user_id, cash = %STARTING_CASH, "portfolio created");
                Ok(Versioned::new(fresh, version))
            }
            // Lost the creation race to a concurrent first call — the
            // winner's record is the portfolio.
            Err(CoreError::ConcurrencyConflict(_)) => self
                .ledger
                .read_portfolio(user_id)
                .await?
                .ok_or_else(|| {
                    CoreError::Storage(format!(
                        "portfolio for '{user_id}' vanished after creation conflict"
                    ))
                }),
            Err(e) => Err(e),
        }
    }

    /// Apply the buy/sell arithmetic to an in-memory snapshot.
    /// Pure computation — no suspension, no I/O.
    fn apply_effect(
        mut portfolio: Portfolio,
        side: Side,
        ticker: &str,
        quantity: u64,
        price: Decimal,
    ) -> (Portfolio, Option<Decimal>) {
        let gross = Decimal::from(quantity) * price;

        let realized_pnl = match side {
            Side::Buy => {
                portfolio.cash -= gross;
                match portfolio.holdings.get_mut(ticker) {
                    Some(holding) => {
                        // Weighted average over the combined position:
                        // (oldQty × oldAvg + qty × price) / (oldQty + qty)
                        let old_qty = Decimal::from(holding.quantity);
                        let new_qty = Decimal::from(holding.quantity + quantity);
                        holding.average_price =
                            (old_qty * holding.average_price + gross) / new_qty;
                        holding.quantity += quantity;
                    }
                    None => {
                        portfolio
                            .holdings
                            .insert(ticker.to_string(), Holding::new(ticker, quantity, price));
                    }
                }
                None
            }
            Side::Sell => {
                portfolio.cash += gross;
                // The validator guarantees the holding exists and covers
                // the quantity; a miss here would be an engine bug.
                let Some(holding) = portfolio.holdings.get_mut(ticker) else {
                    unreachable!("sell validated against missing holding");
                };

                let realized = Decimal::from(quantity) * (price - holding.average_price);
                holding.quantity -= quantity;

                // Average price is untouched by sells; a position sold to
                // zero is removed entirely.
                if holding.quantity == 0 {
                    portfolio.holdings.remove(ticker);
                }
                Some(realized)
            }
        };

        (portfolio, realized_pnl)
    }
}
