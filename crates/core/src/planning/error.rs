//! Planning input validation errors.

use thiserror::Error;

/// Errors raised while validating clients, campaigns, budgets and results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanningError {
    /// Year outside the supported range.
    #[error("Year {0} is out of range (2000-2100)")]
    InvalidYear(i32),

    /// Month outside 1-12.
    #[error("Month {0} is out of range (1-12)")]
    InvalidMonth(u32),

    /// Required text field is empty after trimming.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    /// Text field exceeds its maximum length.
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// Field name.
        field: &'static str,
        /// Maximum character count.
        max: usize,
    },

    /// Amount cannot be negative.
    #[error("{0} cannot be negative")]
    NegativeAmount(&'static str),

    /// Amount exceeds the stored precision.
    #[error("{0} must be at most 9999999999999.99")]
    AmountTooLarge(&'static str),

    /// Amount has more than two decimal places.
    #[error("{0} must have at most 2 decimal places")]
    TooManyDecimals(&'static str),

    /// Only one of end year / end month was supplied.
    #[error("End year and end month must be given together")]
    IncompleteEndPeriod,

    /// Campaign ends before it starts.
    #[error("Campaign end period {end} is before start period {start}")]
    EndBeforeStart {
        /// Start period as `YYYY-MM`.
        start: String,
        /// End period as `YYYY-MM`.
        end: String,
    },
}

impl From<PlanningError> for adbudget_shared::AppError {
    fn from(err: PlanningError) -> Self {
        Self::Validation(err.to_string())
    }
}
