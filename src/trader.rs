// src/trader.rs

use anyhow::{anyhow, Result};
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::exchange::types::{Direction, Execution, LedgerOperation, Quote, TradeState};
use crate::exchange::types::{Balances, Exposures};
use crate::exchange::Exchange;
use crate::models::{LedgerQuery, RfqRequest, TradeConfirmation, TradesQuery};
use crate::utils::{check_amount, client_request_id};

/// Trading session on top of an [`Exchange`].
///
/// Remembers the last RFQ, the quote it produced and the execution of that
/// quote, so `execute(None)` confirms whatever was quoted last.
pub struct Trader<E> {
    exchange: E,
    instruments: Vec<String>,
    last_rfq: Option<RfqRequest>,
    last_quote: Option<Quote>,
    last_execution: Option<Execution>,
    state: Option<TradeState>,
}

impl<E> Trader<E>
where
    E: Exchange,
{
    /// Builds the session and loads the tradable instruments.
    pub async fn connect(exchange: E) -> Result<Self> {
        let mut trader = Self {
            exchange,
            instruments: Vec::new(),
            last_rfq: None,
            last_quote: None,
            last_execution: None,
            state: None,
        };
        trader.refresh_instruments().await?;
        Ok(trader)
    }

    pub fn exchange(&self) -> &E {
        &self.exchange
    }

    pub async fn refresh_instruments(&mut self) -> Result<()> {
        self.instruments = self.exchange.instruments().await?;
        debug!("{} instruments available", self.instruments.len());
        Ok(())
    }

    pub fn instrument_list(&self) -> &[String] {
        &self.instruments
    }

    pub fn last_rfq(&self) -> Option<&RfqRequest> {
        self.last_rfq.as_ref()
    }

    pub fn last_quote(&self) -> Option<&Quote> {
        self.last_quote.as_ref()
    }

    pub fn last_execution(&self) -> Option<&Execution> {
        self.last_execution.as_ref()
    }

    /// Asks the desk for a price. The returned quote has to be confirmed
    /// with [`Trader::execute`] within its short validity window.
    pub async fn request_for_quote(
        &mut self,
        amount: Decimal,
        instrument: &str,
        direction: Direction,
    ) -> Result<Quote> {
        if !self.instruments.iter().any(|i| i == instrument) {
            return Err(anyhow!("wrong instrument"));
        }
        let amount = check_amount(amount)?;

        let req = RfqRequest {
            client_request_id: client_request_id(Utc::now()),
            amount,
            instrument: instrument.to_string(),
            direction,
        };
        info!(
            client_request_id = %req.client_request_id,
            "RFQ {} {} {}", direction, amount, instrument
        );

        // старая котировка не должна пережить новый RFQ, даже неудачный
        self.last_rfq = Some(req.clone());
        self.last_quote = None;
        self.state = Some(TradeState::Pending);
        let quote = self.exchange.request_quote(&req).await?;
        self.last_quote = Some(quote.clone());
        Ok(quote)
    }

    /// Confirms `quote`, or the last received one. A quote can only be
    /// confirmed as it is, never amended.
    pub async fn execute(&mut self, quote: Option<&Quote>) -> Result<Execution> {
        let confirmation = match quote.or(self.last_quote.as_ref()) {
            Some(q) => TradeConfirmation::from(q),
            None => return Err(anyhow!("no quote to execute")),
        };

        let execution = self.exchange.confirm_trade(&confirmation).await?;
        info!(
            request_id = %execution.request_id,
            "Execution {} ({} {} {}, total {})",
            execution.state, execution.direction, execution.amount, execution.instrument, execution.total
        );
        self.state = Some(execution.state.clone());
        self.last_execution = Some(execution.clone());
        Ok(execution)
    }

    /// RFQ immediately followed by its confirmation.
    pub async fn market_order(
        &mut self,
        amount: Decimal,
        instrument: &str,
        direction: Direction,
    ) -> Result<TradeState> {
        let quote = self.request_for_quote(amount, instrument, direction).await?;
        let execution = self.execute(Some(&quote)).await?;
        Ok(execution.state)
    }

    /// State of `execution`, or of the last one.
    pub fn state(&self, execution: Option<&Execution>) -> Option<TradeState> {
        execution
            .or(self.last_execution.as_ref())
            .map(|e| e.state.clone())
    }

    /// Session state: `None` before any RFQ, `Pending` while a quote waits.
    pub fn current_state(&self) -> Option<&TradeState> {
        self.state.as_ref()
    }

    pub async fn instruments(&self) -> Result<Vec<String>> {
        self.exchange.instruments().await
    }

    pub async fn balances(&self) -> Result<Balances> {
        self.exchange.balances().await
    }

    pub async fn exposures(&self) -> Result<Exposures> {
        self.exchange.exposures().await
    }

    /// Executed trades, 50 per page.
    pub async fn trades(&self, page: u32) -> Result<Value> {
        self.exchange.trades(TradesQuery::page(page)).await
    }

    pub async fn ledger(&self, operation: Option<LedgerOperation>) -> Result<Value> {
        self.exchange.ledger(LedgerQuery { operation }).await
    }

    /// Exposure left per currency: exposure - balance.
    pub async fn remaining_exposures(&self) -> Result<BTreeMap<String, Decimal>> {
        let exposures = self.exchange.exposures().await?;
        let balances = self.exchange.balances().await?;
        remaining(&exposures, &balances)
    }
}

fn remaining(exposures: &Exposures, balances: &Balances) -> Result<BTreeMap<String, Decimal>> {
    exposures
        .iter()
        .map(|(currency, exposure)| {
            let balance = balances.get(currency).copied().unwrap_or_default();
            let left = exposure
                .checked_sub(balance)
                .ok_or_else(|| anyhow!("remaining exposure overflow for {}", currency))?;
            Ok((currency.clone(), left))
        })
        .collect()
}
