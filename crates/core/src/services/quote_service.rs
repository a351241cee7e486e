use std::time::Duration;

use crate::errors::CoreError;
use crate::models::quote::Quote;
use crate::providers::traits::QuoteProvider;

/// Upper bound on a single quote fetch. A stalled provider must fail fast
/// rather than hang an in-flight order.
pub const QUOTE_TIMEOUT: Duration = Duration::from_secs(2);

/// Fetches quotes from registered providers with fallback and a bounded
/// timeout.
///
/// Providers are tried in registration order; if the primary fails or
/// stalls, the next one is tried. Returned prices are validated (> 0)
/// before they reach the engine — a feed bug must never produce a free or
/// negative trade.
pub struct QuoteService {
    providers: Vec<Box<dyn QuoteProvider>>,
    timeout: Duration,
}

impl QuoteService {
    pub fn new(providers: Vec<Box<dyn QuoteProvider>>) -> Self {
        Self {
            providers,
            timeout: QUOTE_TIMEOUT,
        }
    }

    /// Override the fetch timeout (mainly for tests).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Register an additional provider at the end of the fallback chain.
    pub fn register(&mut self, provider: Box<dyn QuoteProvider>) {
        self.providers.push(provider);
    }

    /// Get the latest quote for a ticker.
    ///
    /// Tries providers in order. A provider that times out counts as
    /// `QuoteUnavailable` and the next one is tried. `UnknownTicker` from
    /// every provider means the symbol genuinely cannot be resolved.
    pub async fn get_quote(&self, ticker: &str) -> Result<Quote, CoreError> {
        let upper = ticker.to_uppercase();
        if self.providers.is_empty() {
            return Err(CoreError::QuoteUnavailable { ticker: upper });
        }

        let mut last_error = None;
        for provider in &self.providers {
            let result = match tokio::time::timeout(self.timeout, provider.get_quote(&upper)).await
            {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(
                        ticker = %upper,
                        provider = provider.name(),
                        "quote fetch timed out, trying next provider"
                    );
                    last_error = Some(CoreError::QuoteUnavailable {
                        ticker: upper.clone(),
                    });
                    continue;
                }
            };

            match result {
                Ok(quote) => {
                    if quote.price <= rust_decimal::Decimal::ZERO {
                        last_error = Some(CoreError::QuoteUnavailable {
                            ticker: upper.clone(),
                        });
                        tracing::warn!(
                            ticker = %upper,
                            provider = provider.name(),
                            price = %quote.price,
                            "provider returned non-positive price, trying next provider"
                        );
                        continue;
                    }
                    return Ok(quote);
                }
                Err(e) => {
                    last_error = Some(e);
                    // Try next provider
                }
            }
        }

        Err(last_error.unwrap_or(CoreError::QuoteUnavailable { ticker: upper }))
    }
}
