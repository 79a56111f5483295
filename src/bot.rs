//! Orchestrator wiring the feed, strategy and execution pipeline

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::Address;
use tracing::{info, warn};

use crate::common::channels::create_event_channel;
use crate::common::errors::{BotError, Result};
use crate::common::traits::LedgerRpc;
use crate::common::types::{PoolEvent, PoolMetadata, PriceObservation, TradeIntent, TradeOutcome};
use crate::config::types::AppConfig;
use crate::ethereum::feed::PoolEventFeed;
use crate::ethereum::metadata::{fetch_pool_metadata, token_balance};
use crate::ethereum::price::to_base_units;
use crate::execution::builder::TxBuilder;
use crate::execution::signer::TradeSigner;
use crate::execution::submitter::TxSubmitter;
use crate::strategy::{Action, BoxedStrategy, Position, Strategy};

/// The trading bot
///
/// Runs a single serialized pipeline: each price observation is decided
/// against current position state, and a non-Hold action fully resolves
/// (confirmed, reverted or timed out) before the next observation's
/// decision starts. The feed task keeps decoding and buffering events
/// meanwhile, so observations are processed in delivery order.
pub struct Bot {
    config: AppConfig,
    pool_address: Address,
    rpc: Arc<dyn LedgerRpc>,
    signer: TradeSigner,
    strategy: BoxedStrategy,
    builder: TxBuilder,
    submitter: TxSubmitter,
}

impl Bot {
    /// Wire up a bot from configuration and injected collaborators
    pub fn new(
        config: AppConfig,
        rpc: Arc<dyn LedgerRpc>,
        signer: TradeSigner,
        strategy: BoxedStrategy,
    ) -> Result<Self> {
        let pool_address = Address::from_str(&config.chain.pool_address)
            .map_err(|e| BotError::Configuration(format!("invalid pool_address: {e}")))?;

        let builder = TxBuilder::new(rpc.clone(), config.chain.chain_id, pool_address);
        let submitter = TxSubmitter::new(
            rpc.clone(),
            Duration::from_secs(config.settings.confirmation_timeout_seconds),
            Duration::from_millis(config.settings.receipt_poll_interval_ms),
        );

        Ok(Self {
            config,
            pool_address,
            rpc,
            signer,
            strategy,
            builder,
            submitter,
        })
    }

    /// Current position state
    pub fn position(&self) -> Position {
        self.strategy.position()
    }

    /// Run the bot until the feed ends
    ///
    /// Resolves pool metadata first; trading never starts without it.
    pub async fn run(mut self) -> Result<()> {
        info!("Starting bot");
        info!("Pool address: {}", self.pool_address);
        info!(
            "Strategy: {} (threshold {}, buy {} bps below, sell {} bps above)",
            self.strategy.name(),
            self.config.strategy.threshold_price,
            self.config.strategy.buy_bps_below,
            self.config.strategy.sell_bps_above,
        );

        let metadata = fetch_pool_metadata(self.rpc.as_ref(), self.pool_address)
            .await
            .map_err(|e| BotError::MetadataUnavailable(e.to_string()))?;
        info!(
            "Pool fee tier: {} | token0: {} ({} decimals) | token1: {} ({} decimals)",
            metadata.fee_tier,
            metadata.token0.symbol,
            metadata.token0.decimals,
            metadata.token1.symbol,
            metadata.token1.decimals,
        );

        let (event_sender, mut event_receiver) = create_event_channel();
        let feed = PoolEventFeed::new(
            &self.config.chain.ws_rpc_url,
            self.pool_address,
            metadata.decimal_exponent(),
        );
        feed.connect_and_subscribe(event_sender).await?;

        while let Some(event) = event_receiver.recv().await {
            match event {
                PoolEvent::Swap(observation) => self.on_price(observation, &metadata).await,
                PoolEvent::Connection(status) => info!("Feed connection status: {:?}", status),
            }
        }

        info!("Feed channel closed, shutting down");
        Ok(())
    }

    /// Process one price observation
    ///
    /// Errors within the decision cycle are contained here: they abort
    /// the cycle with position state unchanged and never escape to the
    /// event loop.
    pub async fn on_price(&mut self, observation: PriceObservation, metadata: &PoolMetadata) {
        let action = self.strategy.decide(observation.price);
        info!(
            "Price: {} | Position: {} | Action: {}",
            observation.price,
            self.strategy.position(),
            action,
        );

        if action == Action::Hold {
            return;
        }

        match self.execute(action, metadata).await {
            Ok(TradeOutcome::Confirmed {
                tx_hash,
                block_number,
            }) => {
                self.strategy.apply_confirmed(action);
                info!(
                    "Trade confirmed in block {block_number}: {tx_hash} | Position: {}",
                    self.strategy.position(),
                );
            }
            Ok(TradeOutcome::Reverted { tx_hash, .. }) => {
                warn!("Trade reverted on-chain: {tx_hash}; position unchanged");
            }
            Ok(TradeOutcome::TimedOut { tx_hash }) => {
                warn!(
                    "Confirmation timed out for {tx_hash}: on-chain outcome unknown; \
                     position unchanged, not resubmitting",
                );
            }
            Err(e) => warn!("Decision cycle aborted: {e}"),
        }
    }

    async fn execute(&self, action: Action, metadata: &PoolMetadata) -> Result<TradeOutcome> {
        let intent = self.intent_for(action, metadata).await?;
        info!(
            "Executing swap: {} -> {} amount {}",
            intent.token_in, intent.token_out, intent.amount_in,
        );

        let unsigned = self.builder.build_swap(self.signer.address(), &intent).await?;
        let signed = self.signer.sign(unsigned)?;
        self.submitter.submit_and_confirm(&signed).await
    }

    /// Size and direct the trade for an action
    async fn intent_for(&self, action: Action, metadata: &PoolMetadata) -> Result<TradeIntent> {
        match action {
            Action::Buy => {
                let amount_in = to_base_units(
                    self.config.strategy.trade_amount,
                    metadata.token0.decimals,
                )?;
                Ok(TradeIntent {
                    token_in: metadata.token0.address,
                    token_out: metadata.token1.address,
                    fee_tier: metadata.fee_tier,
                    amount_in,
                    recipient: self.signer.address(),
                })
            }
            Action::Sell => {
                // sell whatever the buy produced
                let balance = token_balance(
                    self.rpc.as_ref(),
                    metadata.token1.address,
                    self.signer.address(),
                )
                .await
                .map_err(|e| BotError::BuildFailed(format!("balance fetch failed: {e}")))?;

                if balance.is_zero() {
                    return Err(BotError::BuildFailed(format!(
                        "no {} balance to sell",
                        metadata.token1.symbol
                    )));
                }

                Ok(TradeIntent {
                    token_in: metadata.token1.address,
                    token_out: metadata.token0.address,
                    fee_tier: metadata.fee_tier,
                    amount_in: balance,
                    recipient: self.signer.address(),
                })
            }
            Action::Hold => Err(BotError::BuildFailed(
                "hold action has no trade intent".to_string(),
            )),
        }
    }
}
