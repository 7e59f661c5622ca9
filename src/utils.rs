// src/utils.rs
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Client-side RFQ id: unix time in units of 10 µs.
pub fn client_request_id(now: DateTime<Utc>) -> String {
    (now.timestamp_micros() / 10).to_string()
}

/// Amount in base currency. Must be a non-negative number.
pub fn parse_amount(raw: &str) -> Result<Decimal> {
    let amount = Decimal::from_str(raw.trim())
        .or_else(|_| Decimal::from_scientific(raw.trim()))
        .map_err(|_| anyhow!("wrong amount"))?;
    check_amount(amount)
}

pub fn check_amount(amount: Decimal) -> Result<Decimal> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(anyhow!("wrong amount"));
    }
    Ok(amount)
}

/// Trades page. Must be a non-negative integer.
pub fn parse_page(raw: &str) -> Result<u32> {
    raw.trim().parse::<u32>().map_err(|_| anyhow!("wrong page"))
}
