//! Configuration loader

use config::{Config, Environment, File};
use std::path::Path;
use url::Url;

use super::types::{
    AppConfig, AppSettings, ChainConfig, StrategyConfig, WalletConfig,
};
use crate::common::errors::{BotError, Result};

/// Load configuration from file and environment variables
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with BOT_)
/// 2. Configuration file (TOML format)
/// 3. Default values
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        if Path::new(path).exists() {
            builder = builder.add_source(File::with_name(path).required(false));
        }
    }

    builder = builder.add_source(
        Environment::with_prefix("BOT")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| BotError::Configuration(e.to_string()))?;

    let config: AppConfig = config
        .try_deserialize()
        .map_err(|e| BotError::Configuration(e.to_string()))?;

    validate_endpoints(&config)?;
    Ok(config)
}

/// Load configuration from flat environment variables only
///
/// Variable names match the original deployment environment:
/// `CHAIN_ID`, `WS_RPC_URL`, `HTTP_RPC_URL`, `UNISWAP_V3_POOL_ADDRESS`,
/// `THRESHOLD_PRICE`, `BUY_BPS_BELOW`, `SELL_BPS_ABOVE`, `PRIVATE_KEY`.
pub fn load_from_env() -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig {
        chain: ChainConfig {
            chain_id: require_parsed("CHAIN_ID")?,
            ws_rpc_url: require("WS_RPC_URL")?,
            http_rpc_url: require("HTTP_RPC_URL")?,
            pool_address: require("UNISWAP_V3_POOL_ADDRESS")?,
        },
        strategy: StrategyConfig {
            threshold_price: require_parsed("THRESHOLD_PRICE")?,
            buy_bps_below: require_parsed("BUY_BPS_BELOW")?,
            sell_bps_above: require_parsed("SELL_BPS_ABOVE")?,
            trade_amount: std::env::var("TRADE_AMOUNT")
                .ok()
                .map(|raw| parse_var("TRADE_AMOUNT", &raw))
                .transpose()?
                .unwrap_or(rust_decimal::Decimal::ONE),
        },
        wallet: WalletConfig {
            private_key: require("PRIVATE_KEY")?,
        },
        settings: AppSettings::default(),
    };

    validate_endpoints(&config)?;
    Ok(config)
}

fn require(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| BotError::Configuration(format!("missing environment variable {name}")))
}

fn require_parsed<T>(name: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = require(name)?;
    parse_var(name, &raw)
}

fn parse_var<T>(name: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|e| BotError::Configuration(format!("invalid {name} `{raw}`: {e}")))
}

/// Endpoint URLs must be well formed and use a scheme matching their role
fn validate_endpoints(config: &AppConfig) -> Result<()> {
    let ws = Url::parse(&config.chain.ws_rpc_url)
        .map_err(|e| BotError::Configuration(format!("invalid ws_rpc_url: {e}")))?;
    if !matches!(ws.scheme(), "ws" | "wss") {
        return Err(BotError::Configuration(format!(
            "ws_rpc_url must use ws:// or wss://, got {}",
            ws.scheme()
        )));
    }

    let http = Url::parse(&config.chain.http_rpc_url)
        .map_err(|e| BotError::Configuration(format!("invalid http_rpc_url: {e}")))?;
    if !matches!(http.scheme(), "http" | "https") {
        return Err(BotError::Configuration(format!(
            "http_rpc_url must use http:// or https://, got {}",
            http.scheme()
        )));
    }

    Ok(())
}
