//! Derived metric formulas.
//!
//! Every division is guarded: an absent or zero denominator, or an arithmetic
//! overflow, yields zero. Results are rounded to two decimal places.

use rust_decimal::Decimal;

use adbudget_shared::types::round_metric;

/// Returns `numerator / denominator`, or `None` when the denominator is
/// absent or zero or the division overflows.
#[must_use]
pub fn safe_ratio(numerator: Decimal, denominator: Option<Decimal>) -> Option<Decimal> {
    let denominator = denominator.filter(|d| !d.is_zero())?;
    numerator.checked_div(denominator)
}

/// Returns `numerator / denominator * 100` rounded, or zero when unguarded.
#[must_use]
pub fn percent(numerator: Decimal, denominator: Option<Decimal>) -> Decimal {
    safe_ratio(numerator, denominator)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map_or(Decimal::ZERO, round_metric)
}

/// Budget utilization: `actual_spend / budget_amount * 100`.
#[must_use]
pub fn budget_utilization(actual_spend: Option<Decimal>, budget_amount: Option<Decimal>) -> Decimal {
    percent(actual_spend.unwrap_or_default(), budget_amount)
}

/// Return on spend as a percentage: `(actual_result - actual_spend) / actual_spend * 100`.
///
/// This is the single ROI contract used for line items. The plain ratio
/// `actual_result / actual_spend` is reported separately as [`efficiency`].
#[must_use]
pub fn roi(actual_spend: Option<Decimal>, actual_result: Option<Decimal>) -> Decimal {
    let Some(spend) = actual_spend else {
        return Decimal::ZERO;
    };
    actual_result
        .unwrap_or_default()
        .checked_sub(spend)
        .map_or(Decimal::ZERO, |profit| percent(profit, Some(spend)))
}

/// Budget variance: `budget_amount - actual_spend`.
///
/// Zero when the budget is absent or zero.
#[must_use]
pub fn variance(budget_amount: Option<Decimal>, actual_spend: Option<Decimal>) -> Decimal {
    match budget_amount {
        Some(budget) if !budget.is_zero() => budget
            .checked_sub(actual_spend.unwrap_or_default())
            .unwrap_or(Decimal::ZERO),
        _ => Decimal::ZERO,
    }
}

/// Target achievement: `actual_result / target_value * 100`.
///
/// `None` when no target exists; zero when the target is zero.
#[must_use]
pub fn achievement_rate(actual_result: Option<Decimal>, target_value: Option<Decimal>) -> Option<Decimal> {
    target_value.map(|target| percent(actual_result.unwrap_or_default(), Some(target)))
}

/// Outcome per unit of spend: `total_result / total_spend`.
#[must_use]
pub fn efficiency(total_result: Decimal, total_spend: Decimal) -> Decimal {
    safe_ratio(total_result, Some(total_spend)).map_or(Decimal::ZERO, round_metric)
}
