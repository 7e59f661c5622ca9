// src/exchange/woorton.rs

use super::Exchange;
use crate::config::Config;
use crate::exchange::endpoints::{Action, ApiMethod};
use crate::exchange::types::{Balances, Execution, Exposures, Quote};
use crate::models::{LedgerQuery, RfqRequest, TradeConfirmation, TradesQuery};
use anyhow::{anyhow, bail, Context, Result};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, info, warn};

const JSON: &str = "application/json";

// --- Модели ответов ---

/// Конверт ошибки: `{"errors": [{"message": "..."}]}`
#[derive(Debug, Deserialize)]
struct ApiErrors {
    errors: Vec<ApiErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEntry {
    message: String,
}

/// Модель для `/v1/instruments`
#[derive(Debug, Deserialize)]
struct InstrumentsResult {
    instrument: Vec<String>,
}

/// Woorton OTC REST client. Clients must be registered with the desk to get a token.
#[derive(Debug, Clone)]
pub struct Woorton {
    token:    SecretString,
    client:   Client,
    base_url: Url,
}

impl Woorton {
    /// `base_url` is the API root, e.g. `https://api-sandbox.woorton.com/api/`
    pub fn new(token: SecretString, base_url: &str, timeout: Duration) -> Result<Self> {
        let mut root = base_url.to_string();
        // без завершающего '/' Url::join отбросит последний сегмент (`/api`)
        if !root.ends_with('/') {
            root.push('/');
        }
        let base_url = Url::parse(&root)
            .map_err(|e| anyhow!("Invalid Woorton URL `{}`: {}", root, e))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow!("HTTP client build error: {}", e))?;

        Ok(Self { token, client, base_url })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(
            cfg.api_token.clone(),
            cfg.api_url(),
            Duration::from_secs(cfg.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn endpoint(&self, action: Action) -> Result<Url> {
        self.base_url
            .join(&action.versioned_path())
            .with_context(|| format!("Cannot build URL for `{}`", action))
    }

    /// Path table: every action with its full URL.
    pub fn endpoints(&self) -> Result<Vec<(Action, Url)>> {
        Action::ALL
            .into_iter()
            .map(|a| Ok((a, self.endpoint(a)?)))
            .collect()
    }

    /// Raw call by name, as in `call("ledger", "GET", {...})`.
    pub async fn call_by_name(&self, action: &str, method: &str, params: &Value) -> Result<Value> {
        let method: ApiMethod = method.parse()?;
        let action: Action = action.parse()?;
        self.call(action, method, params).await
    }

    /// GET sends `params` as the query string, POST as a JSON body.
    /// Any response carrying `errors` is turned into an error.
    pub async fn call<P>(&self, action: Action, method: ApiMethod, params: &P) -> Result<Value>
    where
        P: Serialize + ?Sized,
    {
        let url = self.endpoint(action)?;
        let params_json = serde_json::to_string(params)
            .with_context(|| format!("Cannot serialize `{}` parameters", action))?;

        let mut req = self
            .client
            .request(method.into(), url.clone())
            .bearer_auth(self.token.expose_secret())
            .header(CONTENT_TYPE, JSON)
            .header(ACCEPT, JSON);
        req = match method {
            ApiMethod::Get => req.query(params),
            ApiMethod::Post => req.body(params_json.clone()),
        };

        debug!(%method, %url, params = %params_json, "Woorton request"); // токен не логируем
        let resp = req
            .send()
            .await
            .with_context(|| format!("{} {} failed", method, url))?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .with_context(|| format!("Cannot read `{}` response body", action))?;
        debug!(%status, %action, "Woorton response");

        check_response(status, &body, &params_json)
            .inspect_err(|e| warn!(%action, "Woorton API error: {:#}", e))
    }
}

/// Turns a raw HTTP answer into JSON or an error.
fn check_response(status: StatusCode, body: &str, params: &str) -> Result<Value> {
    let value: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) if !status.is_success() => bail!("Woorton API HTTP {}: {}", status, body.trim()),
        Err(e) => {
            return Err(anyhow::Error::new(e)
                .context(format!("Invalid JSON response (HTTP {})", status)));
        }
    };

    // `errors` важнее HTTP-статуса: API может вернуть его и с 200
    if value.get("errors").is_some() {
        let message = ApiErrors::deserialize(&value)
            .ok()
            .and_then(|e| e.errors.into_iter().next())
            .map(|e| e.message)
            .unwrap_or_else(|| "unknown API error".to_string());
        bail!("{}: {}", message, params);
    }

    if !status.is_success() {
        bail!("Woorton API HTTP {}", status);
    }
    Ok(value)
}

fn decode<T: DeserializeOwned>(action: Action, value: Value) -> Result<T> {
    serde_path_to_error::deserialize(value)
        .map_err(|e| anyhow!("Unexpected `{}` response at `{}`: {}", action, e.path(), e.inner()))
}

// --- Реализация Exchange ---

#[async_trait::async_trait]
impl Exchange for Woorton {
    /// GET /v1/instruments
    async fn instruments(&self) -> Result<Vec<String>> {
        let value = self.call(Action::Instruments, ApiMethod::Get, &Map::new()).await?;
        let res: InstrumentsResult = decode(Action::Instruments, value)?;
        Ok(res.instrument)
    }

    /// GET /v1/balances
    async fn balances(&self) -> Result<Balances> {
        let value = self.call(Action::Balances, ApiMethod::Get, &Map::new()).await?;
        decode(Action::Balances, value)
    }

    /// GET /v1/exposures
    async fn exposures(&self) -> Result<Exposures> {
        let value = self.call(Action::Exposures, ApiMethod::Get, &Map::new()).await?;
        decode(Action::Exposures, value)
    }

    /// GET /v1/trades?page=N (at most 50 items per page)
    async fn trades(&self, query: TradesQuery) -> Result<Value> {
        self.call(Action::Trades, ApiMethod::Get, &query).await
    }

    /// GET /v1/ledger?operation=...
    async fn ledger(&self, query: LedgerQuery) -> Result<Value> {
        self.call(Action::Ledger, ApiMethod::Get, &query).await
    }

    /// POST /v1/request_quotes
    async fn request_quote(&self, req: &RfqRequest) -> Result<Quote> {
        let value = self.call(Action::Rfq, ApiMethod::Post, req).await?;
        let quote: Quote = decode(Action::Rfq, value)?;
        info!(
            request_id = %quote.request_id,
            instrument = %quote.instrument,
            direction = %quote.direction,
            amount = %quote.amount,
            total = %quote.total,
            "Quote received"
        );
        Ok(quote)
    }

    /// POST /v1/trades
    async fn confirm_trade(&self, confirmation: &TradeConfirmation) -> Result<Execution> {
        let value = self.call(Action::Trades, ApiMethod::Post, confirmation).await?;
        let execution: Execution = decode(Action::Trades, value)?;
        info!(
            request_id = %execution.request_id,
            state = %execution.state,
            "Trade confirmation answered"
        );
        Ok(execution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_field_wins_over_status() {
        let err = check_response(
            StatusCode::OK,
            r#"{"errors":[{"message":"Quote expired"}]}"#,
            r#"{"request_id":"1"}"#,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), r#"Quote expired: {"request_id":"1"}"#);
    }

    #[test]
    fn empty_errors_array_is_still_an_error() {
        let err = check_response(StatusCode::BAD_REQUEST, r#"{"errors":[]}"#, "{}").unwrap_err();
        assert_eq!(err.to_string(), "unknown API error: {}");
    }

    #[test]
    fn non_json_failure_reports_status() {
        let err = check_response(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>", "{}")
            .unwrap_err();
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn non_json_success_is_an_error() {
        assert!(check_response(StatusCode::OK, "not json", "{}").is_err());
    }

    #[test]
    fn plain_json_passes_through() {
        let v = check_response(StatusCode::OK, r#"{"BTC":"1.0"}"#, "{}").unwrap();
        assert_eq!(v["BTC"], "1.0");
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let api = Woorton::new(
            SecretString::from("t".to_string()),
            "http://localhost:9000/api",
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(
            api.endpoint(Action::Rfq).unwrap().as_str(),
            "http://localhost:9000/api/v1/request_quotes"
        );
        assert_eq!(api.endpoints().unwrap().len(), Action::ALL.len());
    }

    #[test]
    fn decode_reports_the_failing_path() {
        let value = serde_json::json!({"instrument": [1]});
        let err = decode::<InstrumentsResult>(Action::Instruments, value).unwrap_err();
        assert!(err.to_string().contains("instrument[0]"), "{}", err);
    }
}
