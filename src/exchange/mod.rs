// src/exchange/mod.rs
pub mod endpoints;
pub mod types;
pub mod woorton;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::models::{LedgerQuery, RfqRequest, TradeConfirmation, TradesQuery};
use self::types::{Balances, Execution, Exposures, Quote};

pub use self::woorton::Woorton;

/// Everything the trading session needs from the OTC desk.
#[async_trait]
pub trait Exchange: Send + Sync {
    async fn instruments(&self) -> Result<Vec<String>>;
    async fn balances(&self) -> Result<Balances>;
    async fn exposures(&self) -> Result<Exposures>;
    async fn trades(&self, query: TradesQuery) -> Result<Value>;
    async fn ledger(&self, query: LedgerQuery) -> Result<Value>;
    async fn request_quote(&self, req: &RfqRequest) -> Result<Quote>;
    async fn confirm_trade(&self, confirmation: &TradeConfirmation) -> Result<Execution>;
}
