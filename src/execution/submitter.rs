//! Transaction submission and confirmation

use std::sync::Arc;
use std::time::Duration;

use alloy_consensus::TxEnvelope;
use alloy_eips::eip2718::Encodable2718;
use alloy_primitives::B256;
use tracing::{debug, info, instrument};

use crate::common::errors::{BotError, Result};
use crate::common::traits::LedgerRpc;
use crate::common::types::TradeOutcome;

/// Submits signed transactions and waits for their terminal outcome
///
/// Every submission resolves to exactly one [`TradeOutcome`]:
/// `Confirmed`, `Reverted`, or `TimedOut` when the confirmation window
/// elapses without the transaction being observed as mined. A rejected
/// submission is an error (`SubmitRejected`), not an outcome. No
/// resubmission or fee bumping is attempted after a timeout.
pub struct TxSubmitter {
    rpc: Arc<dyn LedgerRpc>,
    /// How long to wait for inclusion
    confirmation_timeout: Duration,
    /// Delay between receipt polls
    poll_interval: Duration,
}

impl TxSubmitter {
    /// Create a new submitter
    pub fn new(rpc: Arc<dyn LedgerRpc>, confirmation_timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            rpc,
            confirmation_timeout,
            poll_interval,
        }
    }

    /// Submit a signed transaction and wait for its terminal outcome
    #[instrument(skip(self, signed))]
    pub async fn submit_and_confirm(&self, signed: &TxEnvelope) -> Result<TradeOutcome> {
        let raw = signed.encoded_2718();

        let tx_hash = self
            .rpc
            .submit_raw(&raw)
            .await
            .map_err(|e| BotError::SubmitRejected(e.to_string()))?;
        info!(%tx_hash, "transaction submitted");

        match tokio::time::timeout(self.confirmation_timeout, self.wait_for_receipt(tx_hash)).await
        {
            Ok(outcome) => Ok(outcome),
            Err(_elapsed) => Ok(TradeOutcome::TimedOut { tx_hash }),
        }
    }

    /// Poll until the transaction is mined; cancelled by the timeout
    async fn wait_for_receipt(&self, tx_hash: B256) -> TradeOutcome {
        loop {
            match self.rpc.transaction_receipt(tx_hash).await {
                Ok(Some(receipt)) if receipt.block_number.is_some() => {
                    let block_number = receipt.block_number().unwrap_or_default();
                    // receipts without a status field predate EIP-658;
                    // inclusion is then the only success signal we have
                    return match receipt.succeeded() {
                        Some(false) => TradeOutcome::Reverted {
                            tx_hash,
                            block_number,
                        },
                        _ => TradeOutcome::Confirmed {
                            tx_hash,
                            block_number,
                        },
                    };
                }
                Ok(_) => debug!(%tx_hash, "not yet mined"),
                // transient read failures don't abandon the wait
                Err(e) => debug!(%tx_hash, "receipt poll failed: {}", e),
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
