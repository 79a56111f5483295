//! Common test utilities and fixtures

use alloy_primitives::{address, U256};
use chrono::Utc;
use rust_decimal::Decimal;
use uniswap_trader::config::types::{
    AppConfig, AppSettings, ChainConfig, StrategyConfig, WalletConfig,
};
use uniswap_trader::{PoolMetadata, PriceObservation, Token};

/// Well-known test vector key, never funded
pub const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Sepolia WETH/USDC-style pool metadata
pub fn sample_metadata() -> PoolMetadata {
    PoolMetadata {
        address: address!("3bfa4769fb09eefc5a80d6e87c3b9c650f7ae48e"),
        fee_tier: 3000,
        token0: Token {
            address: address!("fff9976782d46cc05630d1f6ebab18b2324d6b14"),
            decimals: 18,
            symbol: "WETH".to_string(),
        },
        token1: Token {
            address: address!("1c7d4b196cb0c7b01d743fbc6116a902379c7238"),
            decimals: 6,
            symbol: "USDC".to_string(),
        },
    }
}

/// Observation with a given derived price
pub fn sample_observation(price: Decimal) -> PriceObservation {
    PriceObservation {
        price,
        sqrt_price_x96: U256::from(1u8) << 96,
        observed_at: Utc::now(),
    }
}

/// Configuration wired to unreachable endpoints; tests inject mocks
pub fn sample_config() -> AppConfig {
    AppConfig {
        chain: ChainConfig {
            chain_id: 11155111,
            ws_rpc_url: "wss://rpc.invalid".to_string(),
            http_rpc_url: "https://rpc.invalid".to_string(),
            pool_address: "0x3bfa4769fb09eefc5a80d6e87c3b9c650f7ae48e".to_string(),
        },
        strategy: StrategyConfig {
            threshold_price: Decimal::from(100),
            buy_bps_below: 500,
            sell_bps_above: 500,
            trade_amount: Decimal::ONE,
        },
        wallet: WalletConfig {
            private_key: TEST_KEY.to_string(),
        },
        settings: AppSettings::default(),
    }
}
