//! Fixed-point price derivation
//!
//! The pool reports price as `sqrtPriceX96`, the square root of the raw
//! token1/token0 exchange rate in Q64.96 fixed point. The human-scale
//! price is
//!
//! ```text
//! price = 10^d * (sqrtPriceX96 / 2^96)^2
//! ```
//!
//! where `d` is the difference of the two tokens' decimal exponents.
//! `sqrtPriceX96` spans 160 bits, so the squared intermediate needs up
//! to 320 bits; the computation stays in 512-bit integers until the
//! final decimal conversion. Converting through `f64` would silently
//! lose the low bits.

use alloy_primitives::{U256, U512};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::common::errors::{BotError, Result};

/// Fractional digits carried by a derived price
const PRICE_SCALE: u32 = 18;

/// Largest mantissa a `Decimal` can hold (96 bits)
const MAX_MANTISSA: u128 = 79_228_162_514_264_337_593_543_950_335;

/// Largest scale a `Decimal` can hold
const MAX_SCALE: u32 = 28;

/// Derive the pool price from a swap event's `sqrtPriceX96` field
///
/// `decimal_exponent` is `token0.decimals - token1.decimals`.
pub fn price_from_sqrt_price_x96(sqrt_price_x96: U256, decimal_exponent: i32) -> Result<Decimal> {
    let overflow = || BotError::Decode("price exceeds representable range".to_string());

    let sqrt = U512::from(sqrt_price_x96);
    // sqrtPriceX96^2 at 2^192 fixed-point scale
    let ratio = sqrt.checked_mul(sqrt).ok_or_else(overflow)?;

    let ten = U512::from(10u64);
    let exponent = i64::from(decimal_exponent) + i64::from(PRICE_SCALE);
    let (numerator, denominator) = if exponent >= 0 {
        let factor = ten
            .checked_pow(U512::from(exponent as u64))
            .ok_or_else(overflow)?;
        (ratio.checked_mul(factor).ok_or_else(overflow)?, U512::ONE << 192usize)
    } else {
        let factor = ten
            .checked_pow(U512::from((-exponent) as u64))
            .ok_or_else(overflow)?;
        (ratio, (U512::ONE << 192usize).checked_mul(factor).ok_or_else(overflow)?)
    };

    let mut mantissa = numerator / denominator;
    let mut scale = PRICE_SCALE;

    // Shed precision until the value fits a Decimal mantissa
    let limit = U512::from(MAX_MANTISSA);
    while mantissa > limit && scale > 0 {
        mantissa /= ten;
        scale -= 1;
    }
    if mantissa > limit {
        return Err(overflow());
    }

    Ok(Decimal::from_i128_with_scale(
        mantissa.to::<u128>() as i128,
        scale,
    ))
}

/// Scale a whole-token amount into base units (e.g. wei)
///
/// Fails on negative amounts and on amounts with more fractional digits
/// than the token carries.
pub fn to_base_units(amount: Decimal, decimals: u8) -> Result<U256> {
    if amount.is_sign_negative() {
        return Err(BotError::BuildFailed(format!(
            "trade amount must not be negative, got {amount}"
        )));
    }
    if u32::from(decimals) > MAX_SCALE {
        return Err(BotError::BuildFailed(format!(
            "token decimals {decimals} exceed supported precision"
        )));
    }

    let factor = Decimal::from_i128_with_scale(10i128.pow(u32::from(decimals)), 0);
    let scaled = amount
        .checked_mul(factor)
        .ok_or_else(|| BotError::BuildFailed(format!("trade amount {amount} is too large")))?;

    if scaled.fract() != Decimal::ZERO {
        return Err(BotError::BuildFailed(format!(
            "trade amount {amount} has more than {decimals} fractional digits"
        )));
    }

    let units = scaled
        .to_u128()
        .ok_or_else(|| BotError::BuildFailed(format!("trade amount {amount} is too large")))?;
    Ok(U256::from(units))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn x96() -> U256 {
        U256::from(1u8) << 96
    }

    #[test]
    fn test_unit_sqrt_price_is_one() {
        let price = price_from_sqrt_price_x96(x96(), 0).unwrap();
        assert_eq!(price, dec!(1));
    }

    #[test]
    fn test_decimal_exponent_scales_price() {
        // same raw price, WETH/USDC-style decimal gap of 12
        let price = price_from_sqrt_price_x96(x96(), 12).unwrap();
        assert_eq!(price, dec!(1_000_000_000_000));
    }

    #[test]
    fn test_negative_exponent_scales_down() {
        let price = price_from_sqrt_price_x96(x96(), -6).unwrap();
        assert_eq!(price, dec!(0.000001));
    }

    #[test]
    fn test_fractional_sqrt_price() {
        // sqrtPrice = 1.5 => price = 2.25
        let sqrt = U256::from(3u8) << 95;
        let price = price_from_sqrt_price_x96(sqrt, 0).unwrap();
        assert_eq!(price, dec!(2.25));
    }

    #[test]
    fn test_full_range_sqrt_price_keeps_integer_precision() {
        // sqrtPriceX96 = 2^160 - the top of the event field's range.
        // price = 2^128, which only fits after shedding fractional
        // digits; the integer part must stay exact.
        let sqrt = U256::from(1u8) << 160;
        let price = price_from_sqrt_price_x96(sqrt, -12).unwrap();
        assert_eq!(
            price.trunc(),
            "340282366920938463463374607".parse::<Decimal>().unwrap()
        );
    }

    #[test]
    fn test_overflowing_price_is_rejected() {
        let sqrt = U256::from(1u8) << 160;
        let result = price_from_sqrt_price_x96(sqrt, 12);
        assert!(matches!(result, Err(BotError::Decode(_))));
    }

    #[test]
    fn test_to_base_units() {
        assert_eq!(
            to_base_units(dec!(1), 18).unwrap(),
            U256::from(1_000_000_000_000_000_000u128)
        );
        assert_eq!(to_base_units(dec!(0.5), 6).unwrap(), U256::from(500_000u64));
        assert_eq!(to_base_units(dec!(0), 18).unwrap(), U256::ZERO);
    }

    #[test]
    fn test_to_base_units_rejects_excess_precision() {
        let result = to_base_units(dec!(1.2345678), 6);
        assert!(matches!(result, Err(BotError::BuildFailed(_))));
    }

    #[test]
    fn test_to_base_units_rejects_negative() {
        let result = to_base_units(dec!(-1), 18);
        assert!(matches!(result, Err(BotError::BuildFailed(_))));
    }
}
