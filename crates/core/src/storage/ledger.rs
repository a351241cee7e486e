use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::order::Order;
use crate::models::portfolio::Portfolio;
use crate::models::watchlist::Watchlist;

/// Version expected when creating a record that must not exist yet.
pub const NEW_RECORD: u64 = 0;

/// A stored record together with the version it was read at.
///
/// The version is fed back into the matching write: the write succeeds only
/// if the record is still at that version, otherwise it fails with
/// `ConcurrencyConflict` and the caller retries against fresh state.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub record: T,
    pub version: u64,
}

impl<T> Versioned<T> {
    pub fn new(record: T, version: u64) -> Self {
        Self { record, version }
    }
}

/// Durable keyed storage for portfolios, watchlists, and the order log,
/// with per-aggregate optimistic versioning.
///
/// Contract, per aggregate:
/// - Reads return the latest committed state plus its version, or `None`
///   when the record does not exist.
/// - Writes take the version the caller read (`NEW_RECORD` to create) and
///   fail with `CoreError::ConcurrencyConflict` on mismatch, leaving the
///   stored state untouched. The new version is returned on success.
/// - `commit_order` applies the portfolio write and the order append as one
///   transaction: on conflict, neither happens.
/// - The order log is append-only; records are never mutated or deleted.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn read_portfolio(&self, user_id: &str) -> Result<Option<Versioned<Portfolio>>, CoreError>;

    async fn write_portfolio(
        &self,
        portfolio: Portfolio,
        expected_version: u64,
    ) -> Result<u64, CoreError>;

    /// Atomically write the portfolio and append the order record.
    async fn commit_order(
        &self,
        portfolio: Portfolio,
        expected_version: u64,
        order: Order,
    ) -> Result<u64, CoreError>;

    async fn read_watchlist(&self, user_id: &str) -> Result<Option<Versioned<Watchlist>>, CoreError>;

    async fn write_watchlist(
        &self,
        watchlist: Watchlist,
        expected_version: u64,
    ) -> Result<u64, CoreError>;

    /// All executed orders for a user, oldest first.
    async fn orders_for(&self, user_id: &str) -> Result<Vec<Order>, CoreError>;
}
