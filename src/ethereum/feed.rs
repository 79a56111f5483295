//! WebSocket subscription to pool swap events

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::SolEvent;
use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use tracing::{debug, error, info, instrument, warn};

use super::contracts::Swap;
use super::price::price_from_sqrt_price_x96;
use crate::common::errors::{BotError, Result};
use crate::common::types::{ConnectionStatus, PoolEvent, PriceObservation};

/// Log payload carried by an `eth_subscription` notification
#[derive(Debug, Deserialize)]
struct RawLog {
    #[serde(default)]
    topics: Vec<String>,
    data: String,
    /// Set when the log was removed by a chain reorganization
    #[serde(default)]
    removed: bool,
}

/// WebSocket client subscribed to one pool's `Swap` logs
///
/// Each decodable log becomes a [`PriceObservation`] on the event
/// channel; undecodable logs are warned about and dropped. The
/// subscription is long-lived; gaps in delivery are tolerated, not
/// backfilled.
pub struct PoolEventFeed {
    /// WebSocket endpoint URL
    url: String,
    /// Pool contract whose logs we subscribe to
    pool_address: Address,
    /// Decimal-scaling exponent for price derivation
    decimal_exponent: i32,
    /// Connected state flag
    is_connected: Arc<AtomicBool>,
}

impl PoolEventFeed {
    /// Create a new feed for one pool
    pub fn new(url: &str, pool_address: Address, decimal_exponent: i32) -> Self {
        Self {
            url: url.to_string(),
            pool_address,
            decimal_exponent,
            is_connected: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Check if connected
    pub fn is_connected(&self) -> bool {
        self.is_connected.load(Ordering::SeqCst)
    }

    /// Connect, subscribe and start forwarding observations
    ///
    /// Sends the `eth_subscribe` request for `{pool, Swap topic}` and
    /// spawns a task that decodes incoming logs onto `event_sender`.
    #[instrument(skip(self, event_sender))]
    pub async fn connect_and_subscribe(
        &self,
        event_sender: mpsc::Sender<PoolEvent>,
    ) -> Result<()> {
        info!("Connecting to feed endpoint: {}", self.url);

        let (ws_stream, _response) = connect_async(&self.url)
            .await
            .map_err(|e| BotError::WebSocketConnection(e.to_string()))?;

        info!("WebSocket connection established");
        self.is_connected.store(true, Ordering::SeqCst);

        let _ = event_sender
            .send(PoolEvent::Connection(ConnectionStatus::Connected))
            .await;

        let (mut write, mut read) = ws_stream.split();

        let subscribe = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "eth_subscribe",
            "params": ["logs", {
                "address": self.pool_address,
                "topics": [Swap::SIGNATURE_HASH],
            }],
        });
        debug!("Sending subscription request: {}", subscribe);
        write.send(Message::Text(subscribe.to_string())).await?;

        let is_connected = self.is_connected.clone();
        let decimal_exponent = self.decimal_exponent;

        tokio::spawn(async move {
            loop {
                match read.next().await {
                    Some(Ok(Message::Text(text))) => {
                        match Self::parse_message(&text, decimal_exponent) {
                            Some(Ok(observation)) => {
                                if event_sender.send(PoolEvent::Swap(observation)).await.is_err() {
                                    error!("Event receiver dropped, stopping feed");
                                    break;
                                }
                            }
                            Some(Err(e)) => {
                                // non-fatal: drop the event, keep the stream
                                warn!("Dropping undecodable swap event: {}", e);
                            }
                            None => debug!("Ignoring non-event frame: {}", text),
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        debug!("Received Ping, sending Pong");
                        if write.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(frame))) => {
                        info!("WebSocket closed: {:?}", frame);
                        is_connected.store(false, Ordering::SeqCst);
                        let _ = event_sender
                            .send(PoolEvent::Connection(ConnectionStatus::Disconnected(
                                frame.map(|f| f.reason.to_string()),
                            )))
                            .await;
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        error!("WebSocket error: {}", e);
                        is_connected.store(false, Ordering::SeqCst);
                        let _ = event_sender
                            .send(PoolEvent::Connection(ConnectionStatus::Error(e.to_string())))
                            .await;
                        break;
                    }
                    None => {
                        info!("WebSocket stream ended");
                        is_connected.store(false, Ordering::SeqCst);
                        let _ = event_sender
                            .send(PoolEvent::Connection(ConnectionStatus::Disconnected(None)))
                            .await;
                        break;
                    }
                }
            }
        });

        Ok(())
    }

    /// Parse one websocket frame
    ///
    /// Returns `None` for frames that carry no event (subscription ack,
    /// reorg-removed logs), `Some(Err)` for undecodable event payloads.
    fn parse_message(text: &str, decimal_exponent: i32) -> Option<Result<PriceObservation>> {
        let value: serde_json::Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(e) => return Some(Err(BotError::Decode(format!("invalid JSON frame: {e}")))),
        };

        if value.get("method").and_then(|m| m.as_str()) != Some("eth_subscription") {
            return None;
        }

        let log = match value.pointer("/params/result") {
            Some(log) => log,
            None => {
                return Some(Err(BotError::Decode(
                    "notification without params.result".to_string(),
                )))
            }
        };

        let raw: RawLog = match serde_json::from_value(log.clone()) {
            Ok(raw) => raw,
            Err(e) => return Some(Err(BotError::Decode(format!("malformed log payload: {e}")))),
        };

        if raw.removed {
            debug!("Skipping reorg-removed log");
            return None;
        }

        Some(Self::decode_swap(&raw, decimal_exponent))
    }

    /// Decode a raw log into a price observation
    fn decode_swap(log: &RawLog, decimal_exponent: i32) -> Result<PriceObservation> {
        let mut topics = Vec::with_capacity(log.topics.len());
        for topic in &log.topics {
            topics.push(
                topic
                    .parse::<B256>()
                    .map_err(|e| BotError::Decode(format!("bad topic {topic}: {e}")))?,
            );
        }

        let data = hex::decode(log.data.trim_start_matches("0x"))
            .map_err(|e| BotError::Decode(format!("bad log data: {e}")))?;

        let event = Swap::decode_raw_log(topics.iter().copied(), &data)
            .map_err(|e| BotError::Decode(format!("not a Swap event: {e}")))?;

        let sqrt_price_x96 = U256::from(event.sqrtPriceX96);
        let price = price_from_sqrt_price_x96(sqrt_price_x96, decimal_exponent)?;

        Ok(PriceObservation {
            price,
            sqrt_price_x96,
            observed_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn word(value: U256) -> String {
        hex::encode(B256::from(value))
    }

    /// Event data words: amount0, amount1, sqrtPriceX96, liquidity, tick
    fn swap_data(sqrt_price_x96: U256) -> String {
        format!(
            "0x{}{}{}{}{}",
            word(U256::from(1u8)),
            word(U256::from(2u8)),
            word(sqrt_price_x96),
            word(U256::from(1_000u32)),
            word(U256::ZERO),
        )
    }

    fn swap_notification(data: &str) -> String {
        let sender_topic = Address::ZERO.into_word();
        json!({
            "jsonrpc": "2.0",
            "method": "eth_subscription",
            "params": {
                "subscription": "0x9cef478923ff08bf67fde6c64013158d",
                "result": {
                    "address": "0x88e6a0c2ddd26feeb64f039a2c41296fcb3f5640",
                    "topics": [Swap::SIGNATURE_HASH, sender_topic, sender_topic],
                    "data": data,
                }
            }
        })
        .to_string()
    }

    #[test]
    fn test_parse_swap_notification() {
        let message = swap_notification(&swap_data(U256::from(1u8) << 96));

        let observation = PoolEventFeed::parse_message(&message, 12)
            .expect("frame carries an event")
            .expect("event decodes");

        assert_eq!(observation.price, dec!(1_000_000_000_000));
        assert_eq!(observation.sqrt_price_x96, U256::from(1u8) << 96);
    }

    #[test]
    fn test_subscription_ack_is_ignored() {
        let ack = r#"{"jsonrpc":"2.0","id":1,"result":"0x9cef478923ff08bf67fde6c64013158d"}"#;
        assert!(PoolEventFeed::parse_message(ack, 12).is_none());
    }

    #[test]
    fn test_removed_log_is_skipped() {
        let message = json!({
            "jsonrpc": "2.0",
            "method": "eth_subscription",
            "params": {
                "subscription": "0x9cef478923ff08bf67fde6c64013158d",
                "result": {
                    "topics": [Swap::SIGNATURE_HASH],
                    "data": swap_data(U256::from(1u8) << 96),
                    "removed": true,
                }
            }
        })
        .to_string();

        assert!(PoolEventFeed::parse_message(&message, 12).is_none());
    }

    #[test]
    fn test_missing_data_field_is_decode_error() {
        let message = json!({
            "jsonrpc": "2.0",
            "method": "eth_subscription",
            "params": {
                "subscription": "0x9cef478923ff08bf67fde6c64013158d",
                "result": { "topics": [Swap::SIGNATURE_HASH] }
            }
        })
        .to_string();

        let result = PoolEventFeed::parse_message(&message, 12).expect("frame carries an event");
        assert!(matches!(result, Err(BotError::Decode(_))));
    }

    #[test]
    fn test_truncated_data_is_decode_error() {
        let message = swap_notification("0x00ff");

        let result = PoolEventFeed::parse_message(&message, 12).expect("frame carries an event");
        assert!(matches!(result, Err(BotError::Decode(_))));
    }
}
