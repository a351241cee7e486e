pub mod order_validator;
pub mod quote_service;
pub mod trading_service;
pub mod valuation_service;
pub mod watchlist_service;
