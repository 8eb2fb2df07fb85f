//! Conversion between on-chain base units and decimal display units.
//!
//! Raw amounts are `uint256` on chain and stay [`U256`] here; nothing passes
//! through floating point. `10^78` no longer fits in 256 bits, so token
//! decimals above [`MAX_DECIMALS`] are rejected.

use alloy::primitives::U256;

use crate::blockchain::types::{ClientError, ClientResult};

/// Largest decimal count whose scale factor fits in a `U256`.
pub const MAX_DECIMALS: u8 = 77;

fn scale(decimals: u8) -> ClientResult<U256> {
    if decimals > MAX_DECIMALS {
        return Err(ClientError::InvalidAmount(format!(
            "{} decimals exceeds the supported maximum of {}",
            decimals, MAX_DECIMALS
        )));
    }
    Ok(U256::from(10u64).pow(U256::from(decimals)))
}

/// Render `raw / 10^decimals` exactly, trimming trailing fractional zeros.
pub fn to_display_units(raw: U256, decimals: u8) -> ClientResult<String> {
    let divisor = scale(decimals)?;
    let whole = raw / divisor;
    let frac = raw % divisor;

    if frac.is_zero() {
        return Ok(whole.to_string());
    }

    let frac_str = format!("{:0>width$}", frac.to_string(), width = decimals as usize);
    Ok(format!("{}.{}", whole, frac_str.trim_end_matches('0')))
}

/// Parse a decimal display amount back into base units.
///
/// Exact inverse of [`to_display_units`]. Fractional digits beyond
/// `decimals` are only accepted when they are zeros.
pub fn to_raw_units(display: &str, decimals: u8) -> ClientResult<U256> {
    let invalid = |reason: &str| ClientError::InvalidAmount(format!("'{}': {}", display, reason));

    let value = display.trim();
    let (whole, frac) = match value.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (value, ""),
    };

    if whole.is_empty() && frac.is_empty() {
        return Err(invalid("no digits"));
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("expected an unsigned decimal number"));
    }

    let places = decimals as usize;
    let (kept, excess) = frac.split_at(frac.len().min(places));
    if excess.bytes().any(|b| b != b'0') {
        let reason = format!("more than {} fractional digits", decimals);
        return Err(invalid(reason.as_str()));
    }

    let multiplier = scale(decimals)?;
    let whole_val = if whole.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(whole, 10).map_err(|_| invalid("exceeds 256 bits"))?
    };
    let frac_val = if kept.is_empty() {
        U256::ZERO
    } else {
        let padded = format!("{:0<width$}", kept, width = places);
        U256::from_str_radix(&padded, 10).map_err(|_| invalid("exceeds 256 bits"))?
    };

    whole_val
        .checked_mul(multiplier)
        .and_then(|v| v.checked_add(frac_val))
        .ok_or_else(|| invalid("exceeds 256 bits"))
}
