pub mod order;
pub mod portfolio;
pub mod quote;
pub mod valuation;
pub mod watchlist;
