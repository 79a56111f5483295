//! JSON-RPC client for the ledger endpoint

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use alloy_primitives::{Address, B256, U128, U64};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, instrument};

use crate::common::errors::{BotError, Result};
use crate::common::traits::LedgerRpc;
use crate::common::types::{FeeEstimate, TxReceipt};

/// JSON-RPC client over HTTP
///
/// One instance is shared by the builder, the submitter and the
/// metadata fetch. No retries: a failed read aborts the caller's
/// decision cycle instead.
#[derive(Debug)]
pub struct EthereumRpcClient {
    /// HTTP client
    client: Client,
    /// Endpoint URL
    url: String,
    /// Monotonic request id
    next_id: AtomicU64,
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "R: Deserialize<'de>"))]
struct JsonRpcResponse<R> {
    #[serde(default)]
    result: Option<R>,
    #[serde(default)]
    error: Option<JsonRpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}

/// Fee fields of a block header
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlockFees {
    #[serde(default)]
    base_fee_per_gas: Option<U128>,
}

impl EthereumRpcClient {
    /// Create a new client with the default request timeout
    pub fn new(url: &str) -> Result<Self> {
        Self::with_timeout(url, Duration::from_secs(30))
    }

    /// Create a new client with a custom request timeout
    pub fn with_timeout(url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(BotError::HttpRequest)?;

        Ok(Self {
            client,
            url: url.trim_end_matches('/').to_string(),
            next_id: AtomicU64::new(1),
        })
    }

    /// Send a request whose result may legitimately be `null`
    async fn request_optional<R: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<Option<R>> {
        let body = JsonRpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        debug!(method, "sending RPC request");
        let response = self.client.post(&self.url).json(&body).send().await?;
        let payload: JsonRpcResponse<R> = response.json().await?;

        if let Some(error) = payload.error {
            return Err(BotError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        Ok(payload.result)
    }

    async fn request<R: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<R> {
        self.request_optional(method, params)
            .await?
            .ok_or_else(|| BotError::InvalidResponse(format!("{method} returned no result")))
    }

    async fn max_priority_fee(&self) -> Result<u128> {
        let tip: U128 = self.request("eth_maxPriorityFeePerGas", json!([])).await?;
        Ok(tip.to::<u128>())
    }

    async fn latest_base_fee(&self) -> Result<u128> {
        let block: BlockFees = self
            .request("eth_getBlockByNumber", json!(["latest", false]))
            .await?;

        block
            .base_fee_per_gas
            .map(|fee| fee.to::<u128>())
            .ok_or_else(|| {
                BotError::InvalidResponse(
                    "latest block carries no baseFeePerGas; endpoint is not EIP-1559".to_string(),
                )
            })
    }
}

#[async_trait]
impl LedgerRpc for EthereumRpcClient {
    #[instrument(skip(self))]
    async fn sequence_number(&self, address: Address) -> Result<u64> {
        let count: U64 = self
            .request("eth_getTransactionCount", json!([address, "latest"]))
            .await?;
        Ok(count.to::<u64>())
    }

    #[instrument(skip(self))]
    async fn fee_estimate(&self) -> Result<FeeEstimate> {
        // base fee and priority fee are independent reads
        let (base_fee, priority_fee) =
            tokio::try_join!(self.latest_base_fee(), self.max_priority_fee())?;

        Ok(FeeEstimate {
            max_fee_per_gas: base_fee * 2 + priority_fee,
            max_priority_fee_per_gas: priority_fee,
        })
    }

    #[instrument(skip_all)]
    async fn submit_raw(&self, raw_tx: &[u8]) -> Result<B256> {
        let payload = format!("0x{}", hex::encode(raw_tx));
        self.request("eth_sendRawTransaction", json!([payload])).await
    }

    #[instrument(skip(self))]
    async fn transaction_receipt(&self, tx_hash: B256) -> Result<Option<TxReceipt>> {
        // null result means not yet mined
        self.request_optional("eth_getTransactionReceipt", json!([tx_hash]))
            .await
    }

    #[instrument(skip(self, data))]
    async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>> {
        let params = json!([
            { "to": to, "data": format!("0x{}", hex::encode(&data)) },
            "latest",
        ]);
        let raw: String = self.request("eth_call", params).await?;

        hex::decode(raw.trim_start_matches("0x"))
            .map_err(|e| BotError::InvalidResponse(format!("eth_call returned bad hex: {e}")))
    }
}
