//! Contract interfaces and calldata encoding

use alloy_primitives::{
    aliases::{U160, U24},
    Address, U256,
};
use alloy_sol_types::{sol, SolCall};

use crate::common::types::TradeIntent;

sol! {
    /// Emitted by the pool on every trade; `sqrtPriceX96` is the
    /// post-swap price in Q64.96 fixed point.
    #[derive(Debug)]
    event Swap(
        address indexed sender,
        address indexed recipient,
        int256 amount0,
        int256 amount1,
        uint160 sqrtPriceX96,
        uint128 liquidity,
        int24 tick
    );

    #[derive(Debug)]
    contract IUniswapV3Pool {
        function fee() external view returns (uint24);
        function token0() external view returns (address);
        function token1() external view returns (address);
    }

    #[derive(Debug)]
    contract IERC20 {
        function decimals() external view returns (uint8);
        function symbol() external view returns (string);
        function balanceOf(address account) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }

    #[derive(Debug, PartialEq, Eq)]
    contract ISwapRouter {
        struct ExactInputSingleParams {
            address tokenIn;
            address tokenOut;
            uint24 fee;
            address recipient;
            uint256 amountIn;
            uint256 amountOutMinimum;
            uint160 sqrtPriceLimitX96;
        }

        function exactInputSingle(ExactInputSingleParams calldata params) external payable returns (uint256 amountOut);
    }
}

/// Encode an `exactInputSingle` call for a trade intent
///
/// `amountOutMinimum` and `sqrtPriceLimitX96` are left at zero; the
/// swap accepts the pool price.
pub fn encode_exact_input_single(intent: &TradeIntent) -> Vec<u8> {
    let params = ISwapRouter::ExactInputSingleParams {
        tokenIn: intent.token_in,
        tokenOut: intent.token_out,
        fee: U24::from(intent.fee_tier),
        recipient: intent.recipient,
        amountIn: intent.amount_in,
        amountOutMinimum: U256::ZERO,
        sqrtPriceLimitX96: U160::ZERO,
    };

    ISwapRouter::exactInputSingleCall { params }.abi_encode()
}

/// Encode an ERC-20 `approve` call
pub fn encode_approve(spender: Address, amount: U256) -> Vec<u8> {
    IERC20::approveCall { spender, amount }.abi_encode()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, b256};
    use alloy_sol_types::SolEvent;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_swap_event_topic_matches_known_signature() {
        // topic0 of the Uniswap V3 Swap event as seen on-chain
        assert_eq!(
            Swap::SIGNATURE_HASH,
            b256!("c42079f94a6350d7e6235f29174924f928cc2ac818eb64fed8004e115fbcca67"),
        );
    }

    #[test]
    fn test_exact_input_single_round_trip() {
        let intent = TradeIntent {
            token_in: address!("fff9976782d46cc05630d1f6ebab18b2324d6b14"),
            token_out: address!("1c7d4b196cb0c7b01d743fbc6116a902379c7238"),
            fee_tier: 3000,
            amount_in: U256::from(1_000_000_000_000_000_000u128),
            recipient: address!("3bfa4769fb09eefc5a80d6e87c3b9c650f7ae48e"),
        };

        let calldata = encode_exact_input_single(&intent);
        assert_eq!(
            &calldata[..4],
            &ISwapRouter::exactInputSingleCall::SELECTOR[..]
        );

        let decoded = ISwapRouter::exactInputSingleCall::abi_decode(&calldata).unwrap();
        assert_eq!(decoded.params.tokenIn, intent.token_in);
        assert_eq!(decoded.params.tokenOut, intent.token_out);
        assert_eq!(decoded.params.fee, U24::from(intent.fee_tier));
        assert_eq!(decoded.params.recipient, intent.recipient);
        assert_eq!(decoded.params.amountIn, intent.amount_in);
        assert_eq!(decoded.params.amountOutMinimum, U256::ZERO);
        assert_eq!(decoded.params.sqrtPriceLimitX96, U160::ZERO);
    }

    #[test]
    fn test_approve_round_trip() {
        let spender = address!("3bfa4769fb09eefc5a80d6e87c3b9c650f7ae48e");
        let calldata = encode_approve(spender, U256::MAX);

        let decoded = IERC20::approveCall::abi_decode(&calldata).unwrap();
        assert_eq!(decoded.spender, spender);
        assert_eq!(decoded.amount, U256::MAX);
    }
}
