// src/config.rs
use anyhow::{Context, Result};
use config::{Config as Loader, Environment as EnvSource, File};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use std::env;

use crate::exchange::types::Environment;

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    // Woorton
    #[serde(deserialize_with = "deserialize_secret")]
    pub api_token: SecretString,
    #[serde(default)]
    pub environment: Environment,
    pub base_url: Option<String>, // перекрывает `environment`

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    // Логирование
    #[serde(default = "default_log_filter")]
    pub log_filter: String, // RUST_LOG имеет приоритет
}

// --- Функции для значений по умолчанию ---
fn default_request_timeout_secs() -> u64 { 10 }
fn default_log_filter() -> String { "info".into() }
// --- Конец функций ---

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

impl Config {
    pub fn load() -> Result<Self> {
        let file = env::var("WOORTON_CONFIG").unwrap_or_else(|_| "Config.toml".into());
        let loader = Loader::builder()
            .add_source(File::with_name(&file).required(false))
            .add_source(EnvSource::with_prefix("WOORTON").separator("__"))
            .build()?;
        loader
            .try_deserialize()
            .with_context(|| format!("invalid configuration (file `{}`, env WOORTON__*)", file))
    }

    /// Корень API: `base_url`, если задан, иначе адрес окружения.
    pub fn api_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.base_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;
    use secrecy::ExposeSecret;

    fn from_toml(src: &str) -> Result<Config> {
        Ok(Loader::builder()
            .add_source(File::from_str(src, FileFormat::Toml))
            .build()?
            .try_deserialize()?)
    }

    #[test]
    fn defaults_to_sandbox() {
        let cfg = from_toml(r#"api_token = "abc""#).unwrap();
        assert_eq!(cfg.api_token.expose_secret(), "abc");
        assert_eq!(cfg.environment, Environment::Sandbox);
        assert_eq!(cfg.api_url(), "https://api-sandbox.woorton.com/api/");
        assert_eq!(cfg.request_timeout_secs, 10);
        assert_eq!(cfg.log_filter, "info");
    }

    #[test]
    fn prod_alias_and_override() {
        let cfg = from_toml(
            r#"
            api_token = "abc"
            environment = "prod"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.api_url(), "https://api.woorton.com/api/");

        let cfg = from_toml(
            r#"
            api_token = "abc"
            base_url = "http://localhost:8080/api/"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.api_url(), "http://localhost:8080/api/");
    }

    #[test]
    fn unknown_environment_is_rejected() {
        let err = from_toml(
            r#"
            api_token = "abc"
            environment = "staging"
            "#,
        )
        .unwrap_err();
        assert!(format!("{:#}", err).contains("wrong environment"), "{:#}", err);
    }

    #[test]
    fn production_name_is_accepted() {
        let cfg = from_toml(
            r#"
            api_token = "abc"
            environment = "production"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.environment, Environment::Production);
    }

    #[test]
    fn token_is_redacted_in_debug() {
        let cfg = from_toml(r#"api_token = "very-secret""#).unwrap();
        assert!(!format!("{:?}", cfg).contains("very-secret"));
    }
}
