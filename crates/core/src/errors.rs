use rust_decimal::Decimal;
use thiserror::Error;

/// Unified error type for the entire virtual-trading-core library.
/// Every public fallible function returns `Result<T, CoreError>`.
///
/// Business-rule rejections (bad quantity, not enough cash/shares, unknown
/// ticker, …) are ordinary `Err` values the caller can act on. Only
/// `Storage` and `Serialization` represent infrastructure faults.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Order validation ────────────────────────────────────────────
    #[error("Invalid order quantity: {0} (must be a positive whole number of shares)")]
    InvalidQuantity(u64),

    #[error("Insufficient funds: order costs {required} but only {available} cash is available")]
    InsufficientFunds {
        required: Decimal,
        available: Decimal,
    },

    #[error("Insufficient shares: tried to sell {requested} {ticker} but only {held} held")]
    InsufficientShares {
        ticker: String,
        requested: u64,
        held: u64,
    },

    // ── Quotes ──────────────────────────────────────────────────────
    #[error("Unknown ticker: {0}")]
    UnknownTicker(String),

    #[error("Quote unavailable for {ticker}")]
    QuoteUnavailable { ticker: String },

    // ── Watchlist / lookups ─────────────────────────────────────────
    #[error("Not found: {0}")]
    NotFound(String),

    // ── Concurrency ─────────────────────────────────────────────────
    #[error("Concurrent modification detected: {0}")]
    ConcurrencyConflict(String),

    // ── Infrastructure ──────────────────────────────────────────────
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CoreError {
    /// `true` for expected business-rule rejections the caller can correct
    /// or retry; `false` for infrastructure faults that should be logged
    /// and surfaced as a generic server error.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        !matches!(self, CoreError::Storage(_) | CoreError::Serialization(_))
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Serialization(e.to_string())
    }
}
