use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::quote::Quote;

/// Trait abstraction for quote providers (SOLID: Dependency Inversion).
///
/// The engine only ever consumes prices through this seam, so the simulated
/// feed can be swapped for a real market-data client without touching the
/// portfolio logic. Implementations must never return a non-positive price;
/// `QuoteService` rejects one regardless before it reaches the engine.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Get the latest quote for a ticker.
    ///
    /// Fails with `CoreError::UnknownTicker` when the symbol cannot be
    /// resolved.
    async fn get_quote(&self, ticker: &str) -> Result<Quote, CoreError>;
}
