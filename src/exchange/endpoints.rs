// src/exchange/endpoints.rs
use anyhow::{anyhow, Result};
use reqwest::Method;
use std::fmt;
use std::str::FromStr;

pub const API_VERSION: &str = "v1";

/// Named REST actions and their paths under the versioned base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    Rfq,
    Trades,
    Instruments,
    Balances,
    Exposures,
    Ledger,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Rfq,
        Action::Trades,
        Action::Instruments,
        Action::Balances,
        Action::Exposures,
        Action::Ledger,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Action::Rfq => "rfq",
            Action::Trades => "trades",
            Action::Instruments => "instruments",
            Action::Balances => "balances",
            Action::Exposures => "exposures",
            Action::Ledger => "ledger",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Action::Rfq => "/request_quotes",
            Action::Trades => "/trades",
            Action::Instruments => "/instruments",
            Action::Balances => "/balances",
            Action::Exposures => "/exposures",
            Action::Ledger => "/ledger",
        }
    }

    /// Path relative to the API base, e.g. `v1/request_quotes`.
    pub fn versioned_path(self) -> String {
        format!("{}{}", API_VERSION, self.path())
    }
}

impl FromStr for Action {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Action::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| anyhow!("wrong action name"))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The only two verbs the API speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMethod {
    Get,
    Post,
}

impl From<ApiMethod> for Method {
    fn from(m: ApiMethod) -> Self {
        match m {
            ApiMethod::Get => Method::GET,
            ApiMethod::Post => Method::POST,
        }
    }
}

impl FromStr for ApiMethod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(ApiMethod::Get),
            "POST" => Ok(ApiMethod::Post),
            _ => Err(anyhow!("wrong method")),
        }
    }
}

impl fmt::Display for ApiMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiMethod::Get => write!(f, "GET"),
            ApiMethod::Post => write!(f, "POST"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_action_round_trips_through_its_name() {
        for action in Action::ALL {
            assert_eq!(action.name().parse::<Action>().unwrap(), action);
        }
    }

    #[test]
    fn unknown_action_is_rejected() {
        let err = "orders".parse::<Action>().unwrap_err();
        assert_eq!(err.to_string(), "wrong action name");
    }

    #[test]
    fn versioned_paths() {
        assert_eq!(Action::Rfq.versioned_path(), "v1/request_quotes");
        assert_eq!(Action::Ledger.versioned_path(), "v1/ledger");
    }

    #[test]
    fn only_get_and_post_are_allowed() {
        assert_eq!("get".parse::<ApiMethod>().unwrap(), ApiMethod::Get);
        assert_eq!("POST".parse::<ApiMethod>().unwrap(), ApiMethod::Post);
        let err = "DELETE".parse::<ApiMethod>().unwrap_err();
        assert_eq!(err.to_string(), "wrong method");
    }
}
