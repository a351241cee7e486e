pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use std::collections::HashMap;
use std::sync::Arc;

use errors::CoreError;
use models::order::{Order, OrderReceipt, Side};
use models::portfolio::Portfolio;
use models::quote::Quote;
use models::valuation::PortfolioValuation;
use models::watchlist::{WatchedTicker, Watchlist};
use providers::simulated::SimulatedQuoteProvider;
use providers::traits::QuoteProvider;
use services::quote_service::QuoteService;
use services::trading_service::TradingService;
use services::valuation_service::ValuationService;
use services::watchlist_service::WatchlistService;
use storage::ledger::LedgerStore;
use storage::memory::MemoryLedger;

pub use services::trading_service::STARTING_CASH;

/// Main entry point for the virtual trading core.
///
/// Ties the quote feed, portfolio engine, valuation calculator, and
/// watchlist manager together behind one API, the shape an HTTP layer (out
/// of scope here) consumes. Every method takes the stable opaque `user_id`
/// supplied by the identity layer — the core never authenticates.
pub struct TradingSimulator {
    ledger: Arc<dyn LedgerStore>,
    quotes: QuoteService,
    trading: TradingService,
    watchlists: WatchlistService,
    valuation: ValuationService,
}

impl TradingSimulator {
    /// Create a simulator with the in-memory ledger and the built-in
    /// simulated price feed.
    pub fn new() -> Self {
        Self::with_parts(
            Arc::new(MemoryLedger::new()),
            vec![Box::new(SimulatedQuoteProvider::new())],
        )
    }

    /// Create a simulator over an injected ledger and quote providers
    /// (tried in order, with fallback).
    pub fn with_parts(ledger: Arc<dyn LedgerStore>, providers: Vec<Box<dyn QuoteProvider>>) -> Self {
        let quotes = QuoteService::new(providers);
        let trading = TradingService::new(Arc::clone(&ledger));
        let watchlists = WatchlistService::new(Arc::clone(&ledger));
        Self {
            ledger,
            quotes,
            trading,
            watchlists,
            valuation: ValuationService::new(),
        }
    }

    // ── Orders ──────────────────────────────────────────────────────

    /// Execute a buy/sell order for a user.
    ///
    /// The execution price is fetched from the quote layer here, at
    /// execution time — request input never carries a price. Returns the
    /// updated portfolio, the audit record, and realized P&L for sells.
    pub async fn place_order(
        &self,
        user_id: &str,
        side: Side,
        ticker: &str,
        quantity: u64,
    ) -> Result<OrderReceipt, CoreError> {
        let quote = self.quotes.get_quote(ticker).await?;
        self.trading
            .apply_order(user_id, side, ticker, quantity, &quote)
            .await
    }

    /// Convenience wrapper: market buy.
    pub async fn buy(
        &self,
        user_id: &str,
        ticker: &str,
        quantity: u64,
    ) -> Result<OrderReceipt, CoreError> {
        self.place_order(user_id, Side::Buy, ticker, quantity).await
    }

    /// Convenience wrapper: market sell.
    pub async fn sell(
        &self,
        user_id: &str,
        ticker: &str,
        quantity: u64,
    ) -> Result<OrderReceipt, CoreError> {
        self.place_order(user_id, Side::Sell, ticker, quantity).await
    }

    /// All executed orders for a user, oldest first.
    pub async fn order_history(&self, user_id: &str) -> Result<Vec<Order>, CoreError> {
        self.trading.order_history(user_id).await
    }

    /// Export a user's order audit trail as pretty-printed JSON.
    pub async fn export_orders_to_json(&self, user_id: &str) -> Result<String, CoreError> {
        let orders = self.trading.order_history(user_id).await?;
        Ok(serde_json::to_string_pretty(&orders)?)
    }

    // ── Portfolio ───────────────────────────────────────────────────

    /// The user's portfolio, lazily created with [`STARTING_CASH`] on
    /// first access.
    pub async fn portfolio(&self, user_id: &str) -> Result<Portfolio, CoreError> {
        self.trading.get_or_create_portfolio(user_id).await
    }

    /// Mark-to-market snapshot of the user's portfolio at live quotes.
    /// Computed on demand, never persisted.
    pub async fn valuation(&self, user_id: &str) -> Result<PortfolioValuation, CoreError> {
        let portfolio = self.trading.get_or_create_portfolio(user_id).await?;

        let mut quotes = HashMap::with_capacity(portfolio.holdings.len());
        for ticker in portfolio.holdings.keys() {
            let quote = self.quotes.get_quote(ticker).await?;
            quotes.insert(ticker.clone(), quote);
        }

        self.valuation.value_portfolio(&portfolio, &quotes)
    }

    // ── Quotes ──────────────────────────────────────────────────────

    /// Latest quote for a ticker.
    pub async fn quote(&self, ticker: &str) -> Result<Quote, CoreError> {
        self.quotes.get_quote(ticker).await
    }

    // ── Watchlist ───────────────────────────────────────────────────

    /// Add a ticker to the user's watchlist (idempotent).
    /// The symbol is resolved against the quote layer first, so users
    /// cannot watch tickers the feed cannot price.
    pub async fn watch(&self, user_id: &str, ticker: &str) -> Result<Watchlist, CoreError> {
        self.quotes.get_quote(ticker).await?;
        self.watchlists.add(user_id, ticker).await
    }

    /// Remove a ticker from the user's watchlist.
    /// Fails with `NotFound` when the ticker is not watched.
    pub async fn unwatch(&self, user_id: &str, ticker: &str) -> Result<Watchlist, CoreError> {
        self.watchlists.remove(user_id, ticker).await
    }

    /// The user's watched tickers joined with their latest quotes, in the
    /// order they were added. A ticker the feed cannot currently serve is
    /// returned with `quote: None` instead of failing the listing.
    pub async fn watchlist(&self, user_id: &str) -> Result<Vec<WatchedTicker>, CoreError> {
        let items = self.watchlists.items(user_id).await?;

        let mut watched = Vec::with_capacity(items.len());
        for item in items {
            let quote = match self.quotes.get_quote(&item.ticker).await {
                Ok(q) => Some(q),
                Err(e) => {
                    tracing::warn!(ticker = %item.ticker, error = %e, "watchlist quote unavailable");
                    None
                }
            };
            watched.push(WatchedTicker {
                ticker: item.ticker,
                added_at: item.added_at,
                quote,
            });
        }

        Ok(watched)
    }

    // ── Internal ────────────────────────────────────────────────────

    /// The ledger this simulator runs on (for hosts that need direct
    /// read access, e.g. administrative tooling).
    #[must_use]
    pub fn ledger(&self) -> Arc<dyn LedgerStore> {
        Arc::clone(&self.ledger)
    }
}

impl Default for TradingSimulator {
    fn default() -> Self {
        Self::new()
    }
}
