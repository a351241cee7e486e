use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::ledger::{LedgerStore, Versioned, NEW_RECORD};
use crate::errors::CoreError;
use crate::models::order::Order;
use crate::models::portfolio::Portfolio;
use crate::models::watchlist::Watchlist;

/// In-process `LedgerStore` backed by `tokio::sync::RwLock` maps.
///
/// Each aggregate is stored with a version counter; writes compare-and-swap
/// on it so concurrent mutations for the same user cannot lose updates.
/// Locks are held only across the swap itself — no lock is held while a
/// caller computes the next state.
#[derive(Default)]
pub struct MemoryLedger {
    portfolios: RwLock<HashMap<String, (Portfolio, u64)>>,
    watchlists: RwLock<HashMap<String, (Watchlist, u64)>>,
    /// Append-only audit log, in commit order across all users.
    orders: RwLock<Vec<Order>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare-and-swap helper shared by both aggregate maps.
    /// Returns the new version, or `ConcurrencyConflict` on mismatch.
    fn cas<T>(
        map: &mut HashMap<String, (T, u64)>,
        key: String,
        record: T,
        expected_version: u64,
    ) -> Result<u64, CoreError> {
        let stored_version = map.get(&key).map_or(NEW_RECORD, |(_, v)| *v);
        if stored_version != expected_version {
            return Err(CoreError::ConcurrencyConflict(format!(
                "record for '{key}' is at version {stored_version}, write expected {expected_version}"
            )));
        }
        let next = stored_version + 1;
        map.insert(key, (record, next));
        Ok(next)
    }
}

#[async_trait]
impl LedgerStore for MemoryLedger {
    async fn read_portfolio(&self, user_id: &str) -> Result<Option<Versioned<Portfolio>>, CoreError> {
        let portfolios = self.portfolios.read().await;
        Ok(portfolios
            .get(user_id)
            .map(|(p, v)| Versioned::new(p.clone(), *v)))
    }

    async fn write_portfolio(
        &self,
        portfolio: Portfolio,
        expected_version: u64,
    ) -> Result<u64, CoreError> {
        let mut portfolios = self.portfolios.write().await;
        Self::cas(
            &mut portfolios,
            portfolio.user_id.clone(),
            portfolio,
            expected_version,
        )
    }

    async fn commit_order(
        &self,
        portfolio: Portfolio,
        expected_version: u64,
        order: Order,
    ) -> Result<u64, CoreError> {
        // Take both locks for the duration of the swap so the portfolio
        // write and the order append land together or not at all.
        let mut portfolios = self.portfolios.write().await;
        let mut orders = self.orders.write().await;

        let version = Self::cas(
            &mut portfolios,
            portfolio.user_id.clone(),
            portfolio,
            expected_version,
        )?;
        orders.push(order);
        Ok(version)
    }

    async fn read_watchlist(&self, user_id: &str) -> Result<Option<Versioned<Watchlist>>, CoreError> {
        let watchlists = self.watchlists.read().await;
        Ok(watchlists
            .get(user_id)
            .map(|(w, v)| Versioned::new(w.clone(), *v)))
    }

    async fn write_watchlist(
        &self,
        watchlist: Watchlist,
        expected_version: u64,
    ) -> Result<u64, CoreError> {
        let mut watchlists = self.watchlists.write().await;
        Self::cas(
            &mut watchlists,
            watchlist.user_id.clone(),
            watchlist,
            expected_version,
        )
    }

    async fn orders_for(&self, user_id: &str) -> Result<Vec<Order>, CoreError> {
        let orders = self.orders.read().await;
        Ok(orders
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect())
    }
}
