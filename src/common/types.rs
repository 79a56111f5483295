//! Unified types shared across the feed, strategy and execution pipeline

use alloy_primitives::{Address, B256, U256, U64};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// ERC-20 token metadata resolved at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub address: Address,
    pub decimals: u8,
    pub symbol: String,
}

/// Pool metadata resolved once before the feed subscription starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolMetadata {
    /// Pool contract address
    pub address: Address,
    /// Pool trading fee in hundredths of a bip (e.g. 3000 = 0.3%)
    pub fee_tier: u32,
    pub token0: Token,
    pub token1: Token,
}

impl PoolMetadata {
    /// Exponent `d` in `price = 10^d * (sqrtPriceX96 / 2^96)^2`, determined
    /// by the two tokens' decimal scaling.
    pub fn decimal_exponent(&self) -> i32 {
        i32::from(self.token0.decimals) - i32::from(self.token1.decimals)
    }
}

/// A single decoded price observation from the pool's swap feed
///
/// Derived per feed event, consumed immediately and discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceObservation {
    /// Human-scale price derived from the event payload
    pub price: Decimal,
    /// Raw fixed-point price field carried by the event
    pub sqrt_price_x96: U256,
    /// Timestamp of this observation
    pub observed_at: DateTime<Utc>,
}

/// Connection status for the feed client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// Successfully connected
    Connected,
    /// Disconnected (with optional reason)
    Disconnected(Option<String>),
    /// Connection error
    Error(String),
}

/// Event delivered from the feed task to the orchestrator loop
#[derive(Debug, Clone)]
pub enum PoolEvent {
    /// A decoded swap observation
    Swap(PriceObservation),
    /// Connection status change
    Connection(ConnectionStatus),
}

/// A single swap to execute, created per decision and consumed by the
/// transaction builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeIntent {
    pub token_in: Address,
    pub token_out: Address,
    /// Pool fee tier used to route the swap
    pub fee_tier: u32,
    /// Input amount in the token's base units
    pub amount_in: U256,
    /// Recipient of the swap output
    pub recipient: Address,
}

/// EIP-1559 fee parameters fetched per build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeEstimate {
    pub max_fee_per_gas: u128,
    pub max_priority_fee_per_gas: u128,
}

/// Transaction receipt as returned by the ledger endpoint
///
/// Quantities stay in their wire encoding; use the accessors for
/// classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxReceipt {
    pub transaction_hash: B256,
    #[serde(default)]
    pub block_number: Option<U64>,
    /// `0x1` on success, `0x0` on revert; absent on chains without
    /// EIP-658 receipts
    #[serde(default)]
    pub status: Option<U64>,
    #[serde(default)]
    pub gas_used: Option<U64>,
}

impl TxReceipt {
    /// Whether execution succeeded, if the receipt carries a status
    pub fn succeeded(&self) -> Option<bool> {
        self.status.map(|s| s == U64::from(1u64))
    }

    /// Block the transaction was included in, if mined
    pub fn block_number(&self) -> Option<u64> {
        self.block_number.map(|n| n.to::<u64>())
    }
}

/// Terminal classification of a submitted transaction
///
/// Exactly one of these is produced per submission. Only `Confirmed`
/// authorizes a position-state transition; `TimedOut` means the true
/// on-chain outcome is unknown and must not be treated as either
/// success or failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TradeOutcome {
    /// Mined and executed successfully
    Confirmed { tx_hash: B256, block_number: u64 },
    /// Mined but execution reverted
    Reverted { tx_hash: B256, block_number: u64 },
    /// Not observed as mined within the confirmation timeout
    TimedOut { tx_hash: B256 },
}

impl TradeOutcome {
    /// True only for `Confirmed`
    pub fn is_confirmed(&self) -> bool {
        matches!(self, TradeOutcome::Confirmed { .. })
    }

    /// Hash of the submitted transaction
    pub fn tx_hash(&self) -> B256 {
        match self {
            TradeOutcome::Confirmed { tx_hash, .. }
            | TradeOutcome::Reverted { tx_hash, .. }
            | TradeOutcome::TimedOut { tx_hash } => *tx_hash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_receipt_status_classification() {
        let receipt: TxReceipt = serde_json::from_str(
            r#"{
                "transactionHash": "0x8a6a8b7c3b8b0c1d2e3f40516273849a5b6c7d8e9fa0b1c2d3e4f5061728394a",
                "blockNumber": "0x10",
                "status": "0x1",
                "gasUsed": "0x5208"
            }"#,
        )
        .unwrap();

        assert_eq!(receipt.succeeded(), Some(true));
        assert_eq!(receipt.block_number(), Some(16));
    }

    #[test]
    fn test_receipt_without_status() {
        let receipt: TxReceipt = serde_json::from_str(
            r#"{
                "transactionHash": "0x8a6a8b7c3b8b0c1d2e3f40516273849a5b6c7d8e9fa0b1c2d3e4f5061728394a",
                "blockNumber": "0xff"
            }"#,
        )
        .unwrap();

        assert_eq!(receipt.succeeded(), None);
        assert_eq!(receipt.block_number(), Some(255));
    }

    #[test]
    fn test_decimal_exponent() {
        let metadata = PoolMetadata {
            address: Address::ZERO,
            fee_tier: 3000,
            token0: Token {
                address: Address::ZERO,
                decimals: 18,
                symbol: "WETH".to_string(),
            },
            token1: Token {
                address: Address::ZERO,
                decimals: 6,
                symbol: "USDC".to_string(),
            },
        };

        assert_eq!(metadata.decimal_exponent(), 12);
    }
}
