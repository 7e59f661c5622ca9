// src/models.rs
use rust_decimal::Decimal;
use serde::Serialize;

use crate::exchange::types::{Amount, Direction, LedgerOperation, Quote, RequestId};

/// Body of `POST /v1/request_quotes`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RfqRequest {
    pub client_request_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub instrument: String,
    pub direction: Direction,
}

/// Body of `POST /v1/trades`: a quote confirmed as is.
/// `request_id`, `amount` and `total` go back in the exact JSON form the desk quoted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeConfirmation {
    pub request_id: RequestId,
    pub amount: Amount,
    pub instrument: String,
    pub direction: Direction,
    pub total: Amount,
}

impl From<&Quote> for TradeConfirmation {
    fn from(q: &Quote) -> Self {
        Self {
            request_id: q.request_id.clone(),
            amount: q.amount.clone(),
            instrument: q.instrument.clone(),
            direction: q.direction,
            total: q.total.clone(),
        }
    }
}

/// Query of `GET /v1/trades`. Page 0 is the default and is not sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TradesQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

impl TradesQuery {
    pub fn page(page: u32) -> Self {
        Self {
            page: (page != 0).then_some(page),
        }
    }
}

/// Query of `GET /v1/ledger`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LedgerQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<LedgerOperation>,
}
