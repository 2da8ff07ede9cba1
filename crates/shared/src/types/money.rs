//! Amount parsing, rounding and fixed-point formatting.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every monetary value and derived metric is a `rust_decimal::Decimal`.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Number of decimal places kept on derived metrics.
pub const METRIC_SCALE: u32 = 2;

/// Error returned when an amount cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountParseError {
    /// Input was empty after trimming.
    #[error("amount is empty")]
    Empty,
    /// Input is not a decimal number.
    #[error("'{0}' is not a valid amount")]
    Invalid(String),
}

/// Parses a user-supplied amount.
///
/// Accepts thousands separators, a leading currency symbol (`¥`, `￥`, `$`),
/// a trailing `円`, surrounding quotes, and accounting-style parentheses for
/// negatives: `"¥1,234"`, `"(500)"`, `"80000円"`.
pub fn parse_amount(input: &str) -> Result<Decimal, AmountParseError> {
    let cleaned: String = input
        .trim()
        .trim_matches('"')
        .chars()
        .filter(|c| !matches!(c, ',' | '¥' | '￥' | '$' | '円' | ' '))
        .collect();

    if cleaned.is_empty() {
        return Err(AmountParseError::Empty);
    }

    let (negative, digits) = match cleaned.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        Some(inner) => (true, inner),
        None => (false, cleaned.as_str()),
    };

    let value =
        Decimal::from_str(digits).map_err(|_| AmountParseError::Invalid(input.trim().to_string()))?;

    Ok(if negative { -value } else { value })
}

/// Rounds a derived metric to [`METRIC_SCALE`] places, half away from zero.
#[must_use]
pub fn round_metric(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(METRIC_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats a value with exactly two decimal places (`80` becomes `"80.00"`).
#[must_use]
pub fn format_fixed2(value: Decimal) -> String {
    let mut rounded = round_metric(value);
    rounded.rescale(METRIC_SCALE);
    rounded.to_string()
}

#[cfg(test)]
#[path = "money_tests.rs"]
mod tests;
