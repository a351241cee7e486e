// ═══════════════════════════════════════════════════════════════════
// Model Tests — Side, Order, Portfolio, Holding, Quote, Watchlist
// ═══════════════════════════════════════════════════════════════════

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use virtual_trading_core::models::order::{Order, Side};
use virtual_trading_core::models::portfolio::{Holding, Portfolio};
use virtual_trading_core::models::quote::Quote;
use virtual_trading_core::models::watchlist::{Watchlist, DEFAULT_WATCHLIST_NAME};

// ═══════════════════════════════════════════════════════════════════
//  Side
// ═══════════════════════════════════════════════════════════════════

mod side {
    use super::*;

    #[test]
    fn display_buy() {
        assert_eq!(Side::Buy.to_string(), "BUY");
    }

    #[test]
    fn display_sell() {
        assert_eq!(Side::Sell.to_string(), "SELL");
    }

    #[test]
    fn serde_roundtrip() {
        for side in [Side::Buy, Side::Sell] {
            let json = serde_json::to_string(&side).unwrap();
            let back: Side = serde_json::from_str(&json).unwrap();
            assert_eq!(side, back);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Holding & Portfolio
// ═══════════════════════════════════════════════════════════════════

mod portfolio {
    use super::*;

    #[test]
    fn holding_uppercases_ticker() {
        let h = Holding::new("aapl", 10, dec!(100));
        assert_eq!(h.ticker, "AAPL");
    }

    #[test]
    fn holding_cost_basis() {
        let h = Holding::new("AAPL", 20, dec!(150.50));
        assert_eq!(h.cost_basis(), dec!(3010));
    }

    #[test]
    fn new_portfolio_is_empty() {
        let p = Portfolio::new("user-1", dec!(1_000_000));
        assert_eq!(p.user_id, "user-1");
        assert_eq!(p.cash, dec!(1_000_000));
        assert!(p.holdings.is_empty());
    }

    #[test]
    fn holding_lookup_is_case_insensitive() {
        let mut p = Portfolio::new("user-1", dec!(1000));
        p.holdings
            .insert("AAPL".into(), Holding::new("AAPL", 5, dec!(100)));

        assert!(p.holding("aapl").is_some());
        assert_eq!(p.shares_held("Aapl"), 5);
        assert_eq!(p.shares_held("MSFT"), 0);
    }

    #[test]
    fn holdings_iterate_sorted_by_ticker() {
        let mut p = Portfolio::new("user-1", dec!(1000));
        for sym in ["MSFT", "AAPL", "TSLA"] {
            p.holdings
                .insert(sym.into(), Holding::new(sym, 1, dec!(1)));
        }
        let tickers: Vec<&str> = p.holdings.keys().map(String::as_str).collect();
        assert_eq!(tickers, vec!["AAPL", "MSFT", "TSLA"]);
    }

    #[test]
    fn serde_roundtrip() {
        let mut p = Portfolio::new("user-1", dec!(999_000));
        p.holdings
            .insert("AAPL".into(), Holding::new("AAPL", 10, dec!(100)));

        let json = serde_json::to_string(&p).unwrap();
        let back: Portfolio = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Order
// ═══════════════════════════════════════════════════════════════════

mod order {
    use super::*;

    #[test]
    fn buy_has_negative_cash_delta() {
        let o = Order::new("user-1", Side::Buy, "aapl", 10, dec!(100));
        assert_eq!(o.ticker, "AAPL");
        assert_eq!(o.cash_delta, dec!(-1000));
        assert_eq!(o.notional(), dec!(1000));
    }

    #[test]
    fn sell_has_positive_cash_delta() {
        let o = Order::new("user-1", Side::Sell, "AAPL", 5, dec!(300));
        assert_eq!(o.cash_delta, dec!(1500));
    }

    #[test]
    fn orders_get_unique_ids() {
        let a = Order::new("user-1", Side::Buy, "AAPL", 1, dec!(1));
        let b = Order::new("user-1", Side::Buy, "AAPL", 1, dec!(1));
        assert_ne!(a.id, b.id);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Quote
// ═══════════════════════════════════════════════════════════════════

mod quote {
    use super::*;

    #[test]
    fn change_is_derived() {
        let q = Quote::new("AAPL", dec!(105), dec!(100));
        assert_eq!(q.change, dec!(5));
        assert_eq!(q.change_percent(), Some(dec!(5)));
    }

    #[test]
    fn negative_change() {
        let q = Quote::new("AAPL", dec!(95), dec!(100));
        assert_eq!(q.change, dec!(-5));
        assert_eq!(q.change_percent(), Some(dec!(-5)));
    }

    #[test]
    fn change_percent_guards_zero_close() {
        let q = Quote::new("AAPL", dec!(95), Decimal::ZERO);
        assert_eq!(q.change_percent(), None);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Watchlist
// ═══════════════════════════════════════════════════════════════════

mod watchlist {
    use super::*;
    use chrono::Utc;
    use virtual_trading_core::models::watchlist::WatchlistItem;

    #[test]
    fn new_watchlist_has_default_name() {
        let w = Watchlist::new("user-1");
        assert_eq!(w.name, DEFAULT_WATCHLIST_NAME);
        assert_eq!(w.name, "My Watchlist");
        assert!(w.items.is_empty());
    }

    #[test]
    fn contains_is_case_insensitive() {
        let mut w = Watchlist::new("user-1");
        w.items.push(WatchlistItem {
            ticker: "AAPL".into(),
            added_at: Utc::now(),
        });
        assert!(w.contains("aapl"));
        assert!(!w.contains("MSFT"));
    }
}
