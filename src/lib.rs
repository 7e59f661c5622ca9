//! Client for the Woorton OTC REST API: RFQ, trade confirmation, balances,
//! exposures, trades and ledger history.

pub mod config;
pub mod exchange;
pub mod logger;
pub mod models;
pub mod trader;
pub mod utils;

pub use exchange::{Exchange, Woorton};
pub use trader::Trader;
