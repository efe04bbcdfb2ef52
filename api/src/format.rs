use alloy_primitives::U256;
use thiserror::Error;

use crate::consts::{DISPLAY_UNIT_WEI, WEI_PER_ETHER};

const DECIMALS: usize = 18;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,

    #[error("`{0}` is not a decimal number")]
    Invalid(String),

    #[error("more than 18 decimals in `{0}`")]
    TooPrecise(String),

    #[error("`{0}` is too large")]
    Overflow(String),
}

/// Renders wei as ether, truncated to three decimals.
///
/// Whole amounts keep one fractional digit: `1.0`, `0.123`, `12.5`.
pub fn display_ether(wei: U256) -> String {
    let truncated = wei - wei % DISPLAY_UNIT_WEI;
    let whole = truncated / WEI_PER_ETHER;
    let fraction = truncated % WEI_PER_ETHER;

    let digits = format!("{:0>width$}", fraction.to_string(), width = DECIMALS);
    let digits = digits.trim_end_matches('0');
    let digits = if digits.is_empty() { "0" } else { digits };
    format!("{whole}.{digits}")
}

/// Parses a user-entered ether amount such as `0.05` into wei.
pub fn parse_ether(input: &str) -> Result<U256, AmountError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AmountError::Empty);
    }

    let (whole, fraction) = input.split_once('.').unwrap_or((input, ""));
    let is_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
        return Err(AmountError::Invalid(input.to_string()));
    }
    if fraction.len() > DECIMALS {
        return Err(AmountError::TooPrecise(input.to_string()));
    }

    let overflow = || AmountError::Overflow(input.to_string());
    let whole = if whole.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(whole, 10).map_err(|_| overflow())?
    };
    let fraction = if fraction.is_empty() {
        U256::ZERO
    } else {
        let padded = format!("{fraction:0<width$}", width = DECIMALS);
        U256::from_str_radix(&padded, 10).map_err(|_| overflow())?
    };

    whole
        .checked_mul(WEI_PER_ETHER)
        .and_then(|wei| wei.checked_add(fraction))
        .ok_or_else(overflow)
}
