//! One-shot pool and token metadata reads

use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;
use tracing::debug;

use super::contracts::{IUniswapV3Pool, IERC20};
use crate::common::errors::{BotError, Result};
use crate::common::traits::LedgerRpc;
use crate::common::types::{PoolMetadata, Token};

/// Encode, execute and decode a read-only contract call
async fn contract_call<C: SolCall>(rpc: &dyn LedgerRpc, to: Address, call: C) -> Result<C::Return> {
    let raw = rpc.call(to, call.abi_encode()).await?;
    C::abi_decode_returns(&raw).map_err(|e| {
        BotError::InvalidResponse(format!("{} returned undecodable data: {e}", C::SIGNATURE))
    })
}

/// Resolve the fee tier and both tokens of a pool
///
/// Called once at startup, before the feed subscription; a failure here
/// means trading must not begin.
pub async fn fetch_pool_metadata(rpc: &dyn LedgerRpc, pool: Address) -> Result<PoolMetadata> {
    let (fee_tier, token0_address, token1_address) = tokio::try_join!(
        contract_call(rpc, pool, IUniswapV3Pool::feeCall {}),
        contract_call(rpc, pool, IUniswapV3Pool::token0Call {}),
        contract_call(rpc, pool, IUniswapV3Pool::token1Call {}),
    )?;

    let (token0, token1) = tokio::try_join!(
        fetch_token(rpc, token0_address),
        fetch_token(rpc, token1_address),
    )?;

    debug!(%pool, fee_tier = %fee_tier, token0 = %token0.symbol, token1 = %token1.symbol, "pool metadata resolved");

    Ok(PoolMetadata {
        address: pool,
        fee_tier: fee_tier.to::<u32>(),
        token0,
        token1,
    })
}

/// Resolve the decimals and symbol of a token
async fn fetch_token(rpc: &dyn LedgerRpc, address: Address) -> Result<Token> {
    let (decimals, symbol) = tokio::try_join!(
        contract_call(rpc, address, IERC20::decimalsCall {}),
        contract_call(rpc, address, IERC20::symbolCall {}),
    )?;

    Ok(Token {
        address,
        decimals,
        symbol,
    })
}

/// Current ERC-20 balance of an account
pub async fn token_balance(rpc: &dyn LedgerRpc, token: Address, owner: Address) -> Result<U256> {
    contract_call(rpc, token, IERC20::balanceOfCall { account: owner }).await
}
