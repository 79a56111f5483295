//! UniswapTrader Library
//!
//! A Rust trading bot that watches a Uniswap V3 pool's swap events and
//! trades a basis-points threshold strategy, submitting signed EIP-1559
//! transactions over JSON-RPC.

pub mod bot;
pub mod common;
pub mod config;
pub mod ethereum;
pub mod execution;
pub mod strategy;

// Re-export commonly used types
pub use bot::Bot;
pub use common::errors::{BotError, Result};
pub use common::traits::LedgerRpc;
pub use common::types::{
    ConnectionStatus, FeeEstimate, PoolEvent, PoolMetadata, PriceObservation, Token, TradeIntent,
    TradeOutcome, TxReceipt,
};
pub use config::types::AppConfig;
pub use ethereum::feed::PoolEventFeed;
pub use ethereum::rpc::EthereumRpcClient;
pub use execution::builder::TxBuilder;
pub use execution::signer::TradeSigner;
pub use execution::submitter::TxSubmitter;

// Strategy types
pub use strategy::{Action, BoxedStrategy, Position, Strategy, StrategyParams, ThresholdStrategy};
