//! Trading key holder and transaction signing

use std::str::FromStr;

use alloy_consensus::{SignableTransaction, TxEip1559, TxEnvelope};
use alloy_network::TxSignerSync;
use alloy_primitives::Address;
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;

use crate::common::errors::{BotError, Result};

/// Holder of the trading key
///
/// Exactly one instance exists per process, constructed at startup and
/// passed by reference to whoever needs signatures. Signing is
/// synchronous and deterministic for a given payload; the key itself
/// never leaves this type and is excluded from its `Debug` output.
pub struct TradeSigner {
    inner: PrivateKeySigner,
}

impl TradeSigner {
    /// Construct from a hex-encoded private key, binding signatures to
    /// one chain id
    pub fn from_hex_key(key: &str, chain_id: u64) -> Result<Self> {
        let inner = PrivateKeySigner::from_str(key.trim())
            .map_err(|e| BotError::Configuration(format!("invalid signing key: {e}")))?
            .with_chain_id(Some(chain_id));

        Ok(Self { inner })
    }

    /// Address of the trading account
    pub fn address(&self) -> Address {
        self.inner.address()
    }

    /// Sign an unsigned transaction into a broadcastable envelope
    pub fn sign(&self, mut tx: TxEip1559) -> Result<TxEnvelope> {
        let signature = self
            .inner
            .sign_transaction_sync(&mut tx)
            .map_err(|e| BotError::Signing(e.to_string()))?;

        Ok(tx.into_signed(signature).into())
    }
}

impl std::fmt::Debug for TradeSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TradeSigner")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_eips::eip2718::Encodable2718;
    use alloy_primitives::{Bytes, TxKind, U256};
    use pretty_assertions::assert_eq;

    // well-known test vector key, never funded
    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn sample_tx() -> TxEip1559 {
        TxEip1559 {
            chain_id: 11155111,
            nonce: 7,
            gas_limit: 300_000,
            max_fee_per_gas: 2_000_000_000,
            max_priority_fee_per_gas: 1_000_000_000,
            to: TxKind::Call(Address::ZERO),
            value: U256::ZERO,
            access_list: Default::default(),
            input: Bytes::new(),
        }
    }

    #[test]
    fn test_known_key_address() {
        let signer = TradeSigner::from_hex_key(TEST_KEY, 11155111).unwrap();
        assert_eq!(
            signer.address().to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_signing_is_deterministic() {
        let signer = TradeSigner::from_hex_key(TEST_KEY, 11155111).unwrap();

        let first = signer.sign(sample_tx()).unwrap().encoded_2718();
        let second = signer.sign(sample_tx()).unwrap().encoded_2718();

        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_key_is_rejected() {
        let result = TradeSigner::from_hex_key("not-a-key", 1);
        assert!(matches!(result, Err(BotError::Configuration(_))));
    }

    #[test]
    fn test_debug_does_not_expose_key() {
        let signer = TradeSigner::from_hex_key(TEST_KEY, 11155111).unwrap();
        let printed = format!("{signer:?}");
        assert!(!printed.contains(&TEST_KEY[2..10]));
    }
}
