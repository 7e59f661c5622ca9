// src/logger.rs

use crate::config::Config;
use tracing_subscriber::fmt;
use tracing_subscriber::filter::EnvFilter;

/// Инициализация логирования через tracing
pub fn init(cfg: &Config) {
    // RUST_LOG, иначе `log_filter` из конфига, иначе INFO
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false) // не показывать target (модуль)
        .init();

    tracing::info!("Logger initialized. Environment = {:?}", cfg.environment);
}
