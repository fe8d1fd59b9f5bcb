//! Money amounts: parsing user input and fixed two-decimal presentation.

use std::str::FromStr;

use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};
use thiserror::Error;

/// Number of decimal places every stored amount carries.
pub const AMOUNT_SCALE: u32 = 2;

/// Largest amount a single entry or budget may carry, in whole units.
pub const MAX_AMOUNT_UNITS: i64 = 1_000_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,
    #[error("`{0}` is not a number")]
    NotANumber(String),
    #[error("amount must be a positive number")]
    NotPositive,
    #[error("amount must not exceed 1000000000000")]
    TooLarge,
    #[error("amount total is out of range")]
    Overflow,
}

/// Parses a user-typed amount.
///
/// Whitespace anywhere in the input is dropped (thousand separators), a comma
/// is accepted as the decimal separator, and the value is rounded to two
/// decimal places. Anything that does not end up strictly positive, or that
/// exceeds [`MAX_AMOUNT_UNITS`], is rejected.
pub fn parse_amount(input: &str) -> Result<Decimal, AmountError> {
    let normalized: String = input
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .map(|ch| if ch == ',' { '.' } else { ch })
        .collect();
    if normalized.is_empty() {
        return Err(AmountError::Empty);
    }
    let value = Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .map_err(|_| AmountError::NotANumber(input.trim().to_string()))?;
    validate_amount(value)
}

/// Rounds `value` to the stored precision and checks it is in range.
pub fn validate_amount(value: Decimal) -> Result<Decimal, AmountError> {
    let rounded = round_amount(value);
    if rounded <= Decimal::ZERO {
        return Err(AmountError::NotPositive);
    }
    if rounded > Decimal::from(MAX_AMOUNT_UNITS) {
        return Err(AmountError::TooLarge);
    }
    Ok(rounded)
}

/// Sum that reports overflow instead of panicking.
pub fn checked_sum(values: impl IntoIterator<Item = Decimal>) -> Result<Decimal, AmountError> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, value| acc.checked_add(value))
        .ok_or(AmountError::Overflow)
}

/// Rounds to the stored precision (half-to-even on the midpoint).
pub fn round_amount(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// Renders an amount with exactly two decimals, e.g. `450.00`.
pub fn format_amount(value: Decimal) -> String {
    let mut rounded = round_amount(value);
    rounded.rescale(AMOUNT_SCALE);
    rounded.to_string()
}

/// Share of `amount` in `total` as a percentage; zero when `total` is zero.
/// Ratios too large for exact decimal math are computed in floating point.
pub fn percent_of_total(amount: Decimal, total: Decimal) -> f64 {
    if total.is_zero() {
        return 0.0;
    }
    match amount
        .checked_div(total)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
    {
        Some(percent) => percent.to_f64().unwrap_or(0.0),
        None => {
            let amount = amount.to_f64().unwrap_or(0.0);
            let total = total.to_f64().unwrap_or(f64::INFINITY);
            amount / total * 100.0
        }
    }
}
