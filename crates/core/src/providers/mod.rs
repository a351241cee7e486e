pub mod traits;

// Feed implementations
pub mod simulated;
