//! Unsigned transaction construction

use std::sync::Arc;

use alloy_consensus::TxEip1559;
use alloy_primitives::{Address, TxKind, U256};
use tracing::debug;

use crate::common::errors::{BotError, Result};
use crate::common::traits::LedgerRpc;
use crate::common::types::TradeIntent;
use crate::ethereum::contracts;

/// Gas ceiling for a swap call
pub const SWAP_GAS_LIMIT: u64 = 300_000;

/// Gas ceiling for a plain token approval
pub const APPROVAL_GAS_LIMIT: u64 = 100_000;

/// Builds unsigned EIP-1559 transactions for trade intents
///
/// Sequence number and fee parameters are fetched fresh per build, the
/// two reads running concurrently. If either read fails no transaction
/// is produced and the caller's decision cycle aborts with state
/// unchanged.
pub struct TxBuilder {
    rpc: Arc<dyn LedgerRpc>,
    /// Chain id stamped into every transaction
    chain_id: u64,
    /// Destination contract for swap calldata
    swap_destination: Address,
}

impl TxBuilder {
    /// Create a new builder
    pub fn new(rpc: Arc<dyn LedgerRpc>, chain_id: u64, swap_destination: Address) -> Self {
        Self {
            rpc,
            chain_id,
            swap_destination,
        }
    }

    /// Build a swap transaction for a trade intent
    pub async fn build_swap(&self, sender: Address, intent: &TradeIntent) -> Result<TxEip1559> {
        let calldata = contracts::encode_exact_input_single(intent);
        self.assemble(sender, self.swap_destination, calldata, SWAP_GAS_LIMIT)
            .await
    }

    /// Build an unlimited-allowance approval transaction
    pub async fn build_approval(
        &self,
        sender: Address,
        token: Address,
        spender: Address,
    ) -> Result<TxEip1559> {
        let calldata = contracts::encode_approve(spender, U256::MAX);
        self.assemble(sender, token, calldata, APPROVAL_GAS_LIMIT).await
    }

    async fn assemble(
        &self,
        sender: Address,
        to: Address,
        calldata: Vec<u8>,
        gas_limit: u64,
    ) -> Result<TxEip1559> {
        // independent reads; either failing fails the build
        let (nonce, fees) = tokio::try_join!(
            self.rpc.sequence_number(sender),
            self.rpc.fee_estimate(),
        )
        .map_err(|e| BotError::BuildFailed(e.to_string()))?;

        debug!(nonce, max_fee_per_gas = fees.max_fee_per_gas, "assembled transaction");

        Ok(TxEip1559 {
            chain_id: self.chain_id,
            nonce,
            gas_limit,
            max_fee_per_gas: fees.max_fee_per_gas,
            max_priority_fee_per_gas: fees.max_priority_fee_per_gas,
            to: TxKind::Call(to),
            value: U256::ZERO,
            access_list: Default::default(),
            input: calldata.into(),
        })
    }
}
