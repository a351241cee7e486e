use chrono::Utc;
use std::sync::Arc;

use crate::errors::CoreError;
use crate::models::watchlist::{Watchlist, WatchlistItem};
use crate::storage::ledger::{LedgerStore, Versioned, NEW_RECORD};

/// How many times a watchlist write is attempted before a version conflict
/// is surfaced (one internal retry with a fresh snapshot).
const MAX_ATTEMPTS: u32 = 2;

/// Manages per-user ticker subscriptions. Never touches portfolio state.
pub struct WatchlistService {
    ledger: Arc<dyn LedgerStore>,
}

impl WatchlistService {
    pub fn new(ledger: Arc<dyn LedgerStore>) -> Self {
        Self { ledger }
    }

    /// Subscribe a user to a ticker.
    ///
    /// Lazily creates the watchlist on first use. Adding a ticker that is
    /// already watched is an idempotent no-op, not an error — the returned
    /// watchlist is unchanged.
    pub async fn add(&self, user_id: &str, ticker: &str) -> Result<Watchlist, CoreError> {
        let upper = ticker.to_uppercase();
        let mut attempt = 0;

        loop {
            attempt += 1;
            let Versioned {
                record: mut watchlist,
                version,
            } = self.snapshot(user_id).await?;

            if watchlist.contains(&upper) {
                return Ok(watchlist);
            }

            watchlist.items.push(WatchlistItem {
                ticker: upper.clone(),
                added_at: Utc::now(),
            });

            match self
                .ledger
                .write_watchlist(watchlist.clone(), version)
                .await
            {
                Ok(_) => {
                    tracing::debug!(user = user_id, ticker = %upper, "ticker watched");
                    return Ok(watchlist);
                }
                Err(CoreError::ConcurrencyConflict(_)) if attempt < MAX_ATTEMPTS => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Unsubscribe a user from a ticker.
    ///
    /// Removing a ticker that is not watched fails with
    /// `CoreError::NotFound` — the chosen policy, consistent with removing
    /// any other nonexistent record in this library.
    pub async fn remove(&self, user_id: &str, ticker: &str) -> Result<Watchlist, CoreError> {
        let upper = ticker.to_uppercase();
        let mut attempt = 0;

        loop {
            attempt += 1;
            let Versioned {
                record: mut watchlist,
                version,
            } = self.snapshot(user_id).await?;

            let idx = watchlist
                .items
                .iter()
                .position(|i| i.ticker == upper)
                .ok_or_else(|| {
                    CoreError::NotFound(format!("'{upper}' is not on the watchlist"))
                })?;
            watchlist.items.remove(idx);

            match self
                .ledger
                .write_watchlist(watchlist.clone(), version)
                .await
            {
                Ok(_) => {
                    tracing::debug!(user = user_id, ticker = %upper, "ticker unwatched");
                    return Ok(watchlist);
                }
                Err(CoreError::ConcurrencyConflict(_)) if attempt < MAX_ATTEMPTS => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// The user's subscriptions in insertion order (lazily creating the
    /// empty watchlist on first access).
    pub async fn items(&self, user_id: &str) -> Result<Vec<WatchlistItem>, CoreError> {
        Ok(self.snapshot(user_id).await?.record.items)
    }

    // ── Internal ────────────────────────────────────────────────────

    /// Read the versioned watchlist, lazily creating it on first access.
    async fn snapshot(&self, user_id: &str) -> Result<Versioned<Watchlist>, CoreError> {
        if let Some(snapshot) = self.ledger.read_watchlist(user_id).await? {
            return Ok(snapshot);
        }

        let fresh = Watchlist::new(user_id);
        match self
            .ledger
            .write_watchlist(fresh.clone(), NEW_RECORD)
            .await
        {
            Ok(version) => Ok(Versioned::new(fresh, version)),
            // Lost the creation race — read the winner's record.
            Err(CoreError::ConcurrencyConflict(_)) => self
                .ledger
                .read_watchlist(user_id)
                .await?
                .ok_or_else(|| {
                    CoreError::Storage(format!(
                        "watchlist for '{user_id}' vanished after creation conflict"
                    ))
                }),
            Err(e) => Err(e),
        }
    }
}
