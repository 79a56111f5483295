//! UniswapTrader - Main Entry Point

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::Address;
use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use uniswap_trader::config::loader;
use uniswap_trader::config::types::AppConfig;
use uniswap_trader::{
    Bot, EthereumRpcClient, StrategyParams, ThresholdStrategy, TradeOutcome, TradeSigner,
    TxBuilder, TxSubmitter,
};

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Watch the pool and trade the threshold strategy (default)
    Run,
    /// Grant the swap destination an unlimited allowance for a token
    Approve {
        /// Token contract address
        #[arg(long)]
        token: String,
        /// Spender contract address
        #[arg(long)]
        spender: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    dotenvy::dotenv().ok();

    let config = if Path::new(&cli.config).exists() {
        info!("Loading configuration from {}", cli.config);
        loader::load_config(Some(&cli.config))?
    } else {
        info!("No configuration file, loading from environment");
        loader::load_from_env()?
    };

    let rpc = Arc::new(EthereumRpcClient::with_timeout(
        &config.chain.http_rpc_url,
        Duration::from_secs(config.settings.request_timeout_seconds),
    )?);
    let signer = TradeSigner::from_hex_key(&config.wallet.private_key, config.chain.chain_id)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run(config, rpc, signer).await,
        Commands::Approve { token, spender } => approve(config, rpc, signer, &token, &spender).await,
    }
}

async fn run(config: AppConfig, rpc: Arc<EthereumRpcClient>, signer: TradeSigner) -> Result<()> {
    let strategy = Box::new(ThresholdStrategy::new(StrategyParams::new(
        config.strategy.threshold_price,
        config.strategy.buy_bps_below,
        config.strategy.sell_bps_above,
    )));

    let bot = Bot::new(config, rpc, signer, strategy)?;
    bot.run().await?;
    Ok(())
}

/// One-off allowance grant so the swap destination can move the
/// wallet's tokens
async fn approve(
    config: AppConfig,
    rpc: Arc<EthereumRpcClient>,
    signer: TradeSigner,
    token: &str,
    spender: &str,
) -> Result<()> {
    let token = Address::from_str(token)?;
    let spender = Address::from_str(spender)?;

    let builder = TxBuilder::new(rpc.clone(), config.chain.chain_id, spender);
    let submitter = TxSubmitter::new(
        rpc,
        Duration::from_secs(config.settings.confirmation_timeout_seconds),
        Duration::from_millis(config.settings.receipt_poll_interval_ms),
    );

    info!("Approving {spender} to spend {token}");
    let unsigned = builder.build_approval(signer.address(), token, spender).await?;
    let signed = signer.sign(unsigned)?;

    match submitter.submit_and_confirm(&signed).await? {
        TradeOutcome::Confirmed {
            tx_hash,
            block_number,
        } => info!("Approval confirmed in block {block_number}: {tx_hash}"),
        TradeOutcome::Reverted { tx_hash, .. } => warn!("Approval reverted: {tx_hash}"),
        TradeOutcome::TimedOut { tx_hash } => {
            warn!("Approval confirmation timed out: {tx_hash}; outcome unknown")
        }
    }

    Ok(())
}
