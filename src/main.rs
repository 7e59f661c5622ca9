use anyhow::Result;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;

use woorton_otc::config::Config;
use woorton_otc::exchange::types::{Direction, LedgerOperation};
use woorton_otc::utils::{parse_amount, parse_page};
use woorton_otc::{logger, Trader, Woorton};

#[derive(Parser)]
#[command(name = "woorton")]
#[command(about = "Woorton OTC API client. Token and environment come from Config.toml / WOORTON__* variables")]
struct Args {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// List actions and their URLs
    Endpoints,
    /// Tradable instruments
    Instruments,
    /// Balances per currency (negative: you owe Woorton)
    Balances,
    /// Allowed exposures per currency
    Exposures,
    /// Exposures minus balances
    RemainingExposures,
    /// Executed trades, 50 per page
    Trades {
        #[arg(long, default_value = "0", value_parser = parse_page)]
        page: u32,
    },
    /// Ledger operations
    Ledger {
        /// trade, withdrawal or deposit
        #[arg(long)]
        operation: Option<LedgerOperation>,
    },
    /// Request a quote without confirming it
    Rfq {
        #[arg(value_parser = parse_amount)]
        amount: Decimal,
        instrument: String,
        direction: Direction,
    },
    /// Request a quote and confirm it right away
    Market {
        #[arg(value_parser = parse_amount)]
        amount: Decimal,
        instrument: String,
        direction: Direction,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1) .env, конфиг и логгер
    dotenv::dotenv().ok();
    let args = Args::parse();
    let cfg = Config::load()?;
    logger::init(&cfg);

    // 2) HTTP-клиент
    let api = Woorton::from_config(&cfg)?;
    if let Cmd::Endpoints = args.command {
        println!("Woorton API - Endpoints:");
        for (action, url) in api.endpoints()? {
            println!("Action: {}, URL: {}", action, url);
        }
        return Ok(());
    }

    // 3) сессия: сразу загружает список инструментов
    let mut trader = Trader::connect(api).await?;

    match args.command {
        Cmd::Endpoints => {}
        Cmd::Instruments => print_json(&trader.instrument_list())?,
        Cmd::Balances => print_json(&trader.balances().await?)?,
        Cmd::Exposures => print_json(&trader.exposures().await?)?,
        Cmd::RemainingExposures => print_json(&trader.remaining_exposures().await?)?,
        Cmd::Trades { page } => print_json(&trader.trades(page).await?)?,
        Cmd::Ledger { operation } => print_json(&trader.ledger(operation).await?)?,
        Cmd::Rfq { amount, instrument, direction } => {
            let quote = trader.request_for_quote(amount, &instrument, direction).await?;
            print_json(&quote)?;
        }
        Cmd::Market { amount, instrument, direction } => {
            let state = trader.market_order(amount, &instrument, direction).await?;
            println!("{}", state);
        }
    }
    Ok(())
}
