//! Configuration types

use rust_decimal::Decimal;
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Chain endpoints and pool selection
    pub chain: ChainConfig,
    /// Strategy trigger parameters
    pub strategy: StrategyConfig,
    /// Trading wallet
    pub wallet: WalletConfig,
    /// General application settings
    #[serde(default)]
    pub settings: AppSettings,
}

/// Chain endpoints and the watched pool
#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    /// Chain id the signed transactions are bound to
    pub chain_id: u64,
    /// WebSocket endpoint for the event subscription
    pub ws_rpc_url: String,
    /// HTTP endpoint for ledger RPC reads and submission
    pub http_rpc_url: String,
    /// Uniswap V3 pool contract address
    pub pool_address: String,
}

/// Threshold strategy parameters
#[derive(Debug, Clone, Deserialize)]
pub struct StrategyConfig {
    /// Reference price the triggers are offset from
    pub threshold_price: Decimal,
    /// Buy when price drops this many basis points below the threshold
    pub buy_bps_below: u32,
    /// Sell when price rises this many basis points above the threshold
    pub sell_bps_above: u32,
    /// Buy size in whole token0 units
    #[serde(default = "default_trade_amount")]
    pub trade_amount: Decimal,
}

fn default_trade_amount() -> Decimal {
    Decimal::ONE
}

/// Trading wallet configuration
///
/// The key is only ever handed to the signer; `Debug` is implemented by
/// hand so it cannot leak into logs.
#[derive(Clone, Deserialize)]
pub struct WalletConfig {
    /// Hex-encoded private key of the trading account
    pub private_key: String,
}

impl std::fmt::Debug for WalletConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletConfig")
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// How long to wait for a submitted transaction to be mined
    #[serde(default = "default_confirmation_timeout")]
    pub confirmation_timeout_seconds: u64,
    /// Delay between receipt polls while waiting for confirmation
    #[serde(default = "default_receipt_poll_interval")]
    pub receipt_poll_interval_ms: u64,
    /// Request timeout for HTTP RPC calls in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            confirmation_timeout_seconds: default_confirmation_timeout(),
            receipt_poll_interval_ms: default_receipt_poll_interval(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_confirmation_timeout() -> u64 {
    120
}

fn default_receipt_poll_interval() -> u64 {
    4000
}

fn default_request_timeout() -> u64 {
    30
}
