// ═══════════════════════════════════════════════════════════════════
// Storage Tests — MemoryLedger versioned writes and the audit log
// ═══════════════════════════════════════════════════════════════════

use rust_decimal_macros::dec;

use virtual_trading_core::errors::CoreError;
use virtual_trading_core::models::order::{Order, Side};
use virtual_trading_core::models::portfolio::Portfolio;
use virtual_trading_core::models::watchlist::Watchlist;
use virtual_trading_core::storage::ledger::{LedgerStore, NEW_RECORD};
use virtual_trading_core::storage::memory::MemoryLedger;

// ── Portfolio CAS ───────────────────────────────────────────────────

mod portfolio_writes {
    use super::*;

    #[tokio::test]
    async fn read_missing_portfolio_is_none() {
        let ledger = MemoryLedger::new();
        assert!(ledger.read_portfolio("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_and_read_back() {
        let ledger = MemoryLedger::new();
        let p = Portfolio::new("user-1", dec!(1_000_000));

        let version = ledger.write_portfolio(p.clone(), NEW_RECORD).await.unwrap();
        assert_eq!(version, 1);

        let snapshot = ledger.read_portfolio("user-1").await.unwrap().unwrap();
        assert_eq!(snapshot.record, p);
        assert_eq!(snapshot.version, 1);
    }

    #[tokio::test]
    async fn versions_increment_on_each_write() {
        let ledger = MemoryLedger::new();
        let p = Portfolio::new("user-1", dec!(1000));

        let v1 = ledger.write_portfolio(p.clone(), NEW_RECORD).await.unwrap();
        let v2 = ledger.write_portfolio(p.clone(), v1).await.unwrap();
        let v3 = ledger.write_portfolio(p, v2).await.unwrap();
        assert_eq!((v1, v2, v3), (1, 2, 3));
    }

    #[tokio::test]
    async fn stale_version_is_rejected() {
        let ledger = MemoryLedger::new();
        let p = Portfolio::new("user-1", dec!(1000));
        ledger.write_portfolio(p.clone(), NEW_RECORD).await.unwrap();

        // Still claiming NEW_RECORD after the record exists
        let err = ledger.write_portfolio(p, NEW_RECORD).await.unwrap_err();
        assert!(matches!(err, CoreError::ConcurrencyConflict(_)));
    }

    #[tokio::test]
    async fn duplicate_create_loses_the_race() {
        let ledger = MemoryLedger::new();
        let a = Portfolio::new("user-1", dec!(1000));
        let b = Portfolio::new("user-1", dec!(2000));

        ledger.write_portfolio(a.clone(), NEW_RECORD).await.unwrap();
        let err = ledger.write_portfolio(b, NEW_RECORD).await.unwrap_err();
        assert!(matches!(err, CoreError::ConcurrencyConflict(_)));

        // The winner's record is untouched
        let snapshot = ledger.read_portfolio("user-1").await.unwrap().unwrap();
        assert_eq!(snapshot.record.cash, dec!(1000));
    }
}

// ── Atomic order commits ────────────────────────────────────────────

mod order_commits {
    use super::*;

    #[tokio::test]
    async fn commit_writes_portfolio_and_appends_order() {
        let ledger = MemoryLedger::new();
        let p = Portfolio::new("user-1", dec!(1_000_000));
        let v1 = ledger.write_portfolio(p.clone(), NEW_RECORD).await.unwrap();

        let mut updated = p;
        updated.cash = dec!(999_000);
        let order = Order::new("user-1", Side::Buy, "AAPL", 10, dec!(100));

        let v2 = ledger
            .commit_order(updated.clone(), v1, order.clone())
            .await
            .unwrap();
        assert_eq!(v2, 2);

        let snapshot = ledger.read_portfolio("user-1").await.unwrap().unwrap();
        assert_eq!(snapshot.record.cash, dec!(999_000));

        let orders = ledger.orders_for("user-1").await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].id, order.id);
    }

    #[tokio::test]
    async fn conflicting_commit_leaves_no_order_record() {
        let ledger = MemoryLedger::new();
        let p = Portfolio::new("user-1", dec!(1_000_000));
        let v1 = ledger.write_portfolio(p.clone(), NEW_RECORD).await.unwrap();

        // Someone else advanced the version in between.
        ledger.write_portfolio(p.clone(), v1).await.unwrap();

        let order = Order::new("user-1", Side::Buy, "AAPL", 10, dec!(100));
        let err = ledger.commit_order(p, v1, order).await.unwrap_err();
        assert!(matches!(err, CoreError::ConcurrencyConflict(_)));

        // All-or-nothing: the rejected commit must not leak into the log.
        assert!(ledger.orders_for("user-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn audit_log_is_per_user() {
        let ledger = MemoryLedger::new();
        for user in ["alice", "bob"] {
            let p = Portfolio::new(user, dec!(1_000_000));
            let v = ledger.write_portfolio(p.clone(), NEW_RECORD).await.unwrap();
            let order = Order::new(user, Side::Buy, "AAPL", 1, dec!(100));
            ledger.commit_order(p, v, order).await.unwrap();
        }

        let alice = ledger.orders_for("alice").await.unwrap();
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].user_id, "alice");
        assert_eq!(ledger.orders_for("carol").await.unwrap().len(), 0);
    }
}

// ── Watchlist CAS ───────────────────────────────────────────────────

mod watchlist_writes {
    use super::*;

    #[tokio::test]
    async fn create_and_read_back() {
        let ledger = MemoryLedger::new();
        let w = Watchlist::new("user-1");

        let version = ledger.write_watchlist(w.clone(), NEW_RECORD).await.unwrap();
        assert_eq!(version, 1);

        let snapshot = ledger.read_watchlist("user-1").await.unwrap().unwrap();
        assert_eq!(snapshot.record, w);
    }

    #[tokio::test]
    async fn stale_version_is_rejected() {
        let ledger = MemoryLedger::new();
        let w = Watchlist::new("user-1");
        ledger.write_watchlist(w.clone(), NEW_RECORD).await.unwrap();

        let err = ledger.write_watchlist(w, NEW_RECORD).await.unwrap_err();
        assert!(matches!(err, CoreError::ConcurrencyConflict(_)));
    }

    #[tokio::test]
    async fn portfolio_and_watchlist_versions_are_independent() {
        let ledger = MemoryLedger::new();
        let p = Portfolio::new("user-1", dec!(1000));
        ledger.write_portfolio(p.clone(), NEW_RECORD).await.unwrap();
        ledger.write_portfolio(p, 1).await.unwrap();

        // Watchlist for the same user still starts fresh.
        let w = Watchlist::new("user-1");
        let version = ledger.write_watchlist(w, NEW_RECORD).await.unwrap();
        assert_eq!(version, 1);
    }
}
