//! Trait definitions for the ledger RPC boundary

use alloy_primitives::{Address, B256};
use async_trait::async_trait;

use super::errors::Result;
use super::types::{FeeEstimate, TxReceipt};

/// Read/submit boundary against the remote ledger endpoint
///
/// This trait covers exactly the operations the trade pipeline needs:
/// sequence-number and fee reads for the builder, raw submission and
/// receipt polling for the confirmer, and read-only contract calls for
/// metadata. Implementations must not retry on their own; retry policy
/// belongs to the caller.
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Current sequence number (nonce) for an account
    async fn sequence_number(&self, address: Address) -> Result<u64>;

    /// Current EIP-1559 fee parameters
    async fn fee_estimate(&self) -> Result<FeeEstimate>;

    /// Submit a raw signed transaction, returning its hash
    async fn submit_raw(&self, raw_tx: &[u8]) -> Result<B256>;

    /// Receipt for a transaction, or `None` while it is not mined
    async fn transaction_receipt(&self, tx_hash: B256) -> Result<Option<TxReceipt>>;

    /// Read-only contract call against the latest block
    async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>>;
}
