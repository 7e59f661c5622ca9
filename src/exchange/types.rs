// src/exchange/types.rs
use anyhow::{anyhow, Result};
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const SANDBOX_URL: &str = "https://api-sandbox.woorton.com/api/";
pub const PRODUCTION_URL: &str = "https://api.woorton.com/api/";

/// Currency -> amount. Negative: the client owes Woorton, positive: Woorton owes the client.
pub type Balances = BTreeMap<String, Decimal>;

/// Currency -> allowed exposure.
pub type Exposures = BTreeMap<String, Decimal>;

// --- Окружение: sandbox | prod | production ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")] // ошибка всегда "wrong environment", как у from_str
pub enum Environment {
    #[default]
    Sandbox,
    Production,
}

impl Environment {
    pub fn base_url(self) -> &'static str {
        match self {
            Environment::Sandbox => SANDBOX_URL,
            Environment::Production => PRODUCTION_URL,
        }
    }
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sandbox" => Ok(Environment::Sandbox),
            "prod" | "production" => Ok(Environment::Production),
            _ => Err(anyhow!("wrong environment")),
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Side of the base currency in an RFQ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Direction {
    Buy,
    Sell,
}

impl FromStr for Direction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "buy" => Ok(Direction::Buy),
            "sell" => Ok(Direction::Sell),
            _ => Err(anyhow!("wrong direction")),
        }
    }
}

impl TryFrom<String> for Direction {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Buy => write!(f, "buy"),
            Direction::Sell => write!(f, "sell"),
        }
    }
}

/// Ledger category filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerOperation {
    Trade,
    Withdrawal,
    Deposit,
}

impl LedgerOperation {
    pub const ALL: [LedgerOperation; 3] = [
        LedgerOperation::Trade,
        LedgerOperation::Withdrawal,
        LedgerOperation::Deposit,
    ];
}

impl FromStr for LedgerOperation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "trade" => Ok(LedgerOperation::Trade),
            "withdrawal" => Ok(LedgerOperation::Withdrawal),
            "deposit" => Ok(LedgerOperation::Deposit),
            _ => Err(anyhow!("wrong operation")),
        }
    }
}

impl fmt::Display for LedgerOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerOperation::Trade => write!(f, "trade"),
            LedgerOperation::Withdrawal => write!(f, "withdrawal"),
            LedgerOperation::Deposit => write!(f, "deposit"),
        }
    }
}

/// State of an RFQ execution as reported by the desk.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum TradeState {
    Pending,
    Executed,
    Rejected,
    Cancelled,
    Unknown(String),
}

impl From<String> for TradeState {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "pending" => TradeState::Pending,
            "executed" => TradeState::Executed,
            "rejected" => TradeState::Rejected,
            "cancelled" | "canceled" => TradeState::Cancelled,
            _ => TradeState::Unknown(s),
        }
    }
}

impl fmt::Display for TradeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeState::Pending => write!(f, "pending"),
            TradeState::Executed => write!(f, "executed"),
            TradeState::Rejected => write!(f, "rejected"),
            TradeState::Cancelled => write!(f, "cancelled"),
            TradeState::Unknown(s) => write!(f, "{}", s),
        }
    }
}

// --- Значения, которые при подтверждении уходят обратно в том же виде ---

/// Server-side RFQ id: any JSON string or number, echoed back as received.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RequestId(Value);

impl RequestId {
    pub fn as_json(&self) -> &Value {
        &self.0
    }
}

impl<'de> Deserialize<'de> for RequestId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            v @ (Value::String(_) | Value::Number(_)) => Ok(RequestId(v)),
            other => Err(de::Error::custom(format!(
                "request_id must be a string or a number, got {}",
                other
            ))),
        }
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        RequestId(Value::String(s.to_string()))
    }
}

impl From<u64> for RequestId {
    fn from(n: u64) -> Self {
        RequestId(Value::from(n))
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => write!(f, "{}", s), // без кавычек
            other => write!(f, "{}", other),
        }
    }
}

/// Decimal amount that remembers its JSON form (`"1.5"` or `1.5`).
/// Serialization writes the original form back unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Amount {
    value: Decimal,
    raw:   Value,
}

impl Amount {
    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

/// Locally built amounts are written as decimal strings, without float rounding.
impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Self { value, raw: Value::String(value.to_string()) }
    }
}

fn parse_decimal(s: &str) -> Result<Decimal> {
    let s = s.trim();
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .map_err(|e| anyhow!("invalid decimal `{}`: {}", s, e))
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        let value = match &raw {
            Value::String(s) => parse_decimal(s),
            Value::Number(n) => parse_decimal(&n.to_string()),
            other => Err(anyhow!("expected a decimal string or number, got {}", other)),
        }
        .map_err(de::Error::custom)?;
        Ok(Self { value, raw })
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

// --- Ответы API ---

/// Answer to an RFQ. Must be confirmed within the validity window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub request_id: RequestId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_request_id: Option<String>,
    pub amount: Amount,
    pub instrument: String,
    pub direction: Direction,
    pub total: Amount,
}

/// Answer to a trade confirmation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Execution {
    pub request_id: RequestId,
    pub amount: Decimal,
    pub instrument: String,
    pub direction: Direction,
    pub total: Decimal,
    pub state: TradeState,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn direction_is_case_insensitive() {
        assert_eq!("BUY".parse::<Direction>().unwrap(), Direction::Buy);
        assert_eq!("Sell".parse::<Direction>().unwrap(), Direction::Sell);
    }

    #[test]
    fn direction_rejects_other_values() {
        let err = "hold".parse::<Direction>().unwrap_err();
        assert_eq!(err.to_string(), "wrong direction");
    }

    #[test]
    fn ledger_operation_accepts_only_known_categories() {
        for op in LedgerOperation::ALL {
            assert_eq!(op.to_string().parse::<LedgerOperation>().unwrap(), op);
        }
        let err = "transfer".parse::<LedgerOperation>().unwrap_err();
        assert_eq!(err.to_string(), "wrong operation");
    }

    #[test]
    fn environment_aliases() {
        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!("production".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!(Environment::default().base_url(), SANDBOX_URL);
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn trade_state_keeps_unknown_values() {
        assert_eq!(TradeState::from("executed".to_string()), TradeState::Executed);
        assert_eq!(TradeState::from("Canceled".to_string()), TradeState::Cancelled);
        let odd = TradeState::from("settling".to_string());
        assert_eq!(odd, TradeState::Unknown("settling".into()));
        assert_eq!(odd.to_string(), "settling");
    }

    #[test]
    fn quote_accepts_string_and_numeric_amounts() {
        let quote: Quote = serde_json::from_value(json!({
            "request_id": 4217,
            "amount": "1.5",
            "instrument": "BTCEUR.SPOT",
            "direction": "BUY",
            "total": 52345.12
        }))
        .unwrap();

        assert_eq!(quote.request_id, RequestId::from(4217u64));
        assert_eq!(quote.amount.value(), dec!(1.5));
        assert_eq!(quote.total.value(), dec!(52345.12));
        assert_eq!(quote.direction, Direction::Buy);
        assert!(quote.client_request_id.is_none());
    }

    #[test]
    fn amounts_keep_their_json_form() {
        let precise: Amount = serde_json::from_value(json!("52345.123456789012345")).unwrap();
        assert_eq!(precise.value(), dec!(52345.123456789012345));
        assert_eq!(precise.raw(), &json!("52345.123456789012345"));
        assert_eq!(serde_json::to_value(&precise).unwrap(), json!("52345.123456789012345"));

        let number: Amount = serde_json::from_value(json!(2)).unwrap();
        assert_eq!(number.value(), dec!(2));
        assert_eq!(serde_json::to_value(&number).unwrap(), json!(2));

        let built = Amount::from(dec!(0.10));
        assert_eq!(serde_json::to_value(&built).unwrap(), json!("0.10"));

        assert!(serde_json::from_value::<Amount>(json!("ten")).is_err());
        assert!(serde_json::from_value::<Amount>(json!(null)).is_err());
    }

    #[test]
    fn request_id_takes_any_string_or_number() {
        for raw in [json!("9f1c"), json!(4217), json!(-3), json!(12.5)] {
            let id: RequestId = serde_json::from_value(raw.clone()).unwrap();
            assert_eq!(id.as_json(), &raw);
            assert_eq!(serde_json::to_value(&id).unwrap(), raw);
        }
        assert_eq!(RequestId::from("9f1c").to_string(), "9f1c");
        assert_eq!(RequestId::from(7u64).to_string(), "7");
        assert!(serde_json::from_value::<RequestId>(json!({"id": 1})).is_err());
        assert!(serde_json::from_value::<RequestId>(json!(null)).is_err());
    }

    #[test]
    fn environment_is_decoded_with_the_parse_message() {
        let env: Environment = serde_json::from_value(json!("prod")).unwrap();
        assert_eq!(env, Environment::Production);
        let err = serde_json::from_value::<Environment>(json!("staging")).unwrap_err();
        assert_eq!(err.to_string(), "wrong environment");
    }

    #[test]
    fn execution_rejects_unknown_direction() {
        let res = serde_json::from_value::<Execution>(json!({
            "request_id": "abc",
            "amount": "1",
            "instrument": "BTCEUR.SPOT",
            "direction": "short",
            "total": "100",
            "state": "executed"
        }));
        assert!(res.is_err());
    }
}
