//! Field-level validation rules shared by every planning input.

use rust_decimal::Decimal;

use super::error::PlanningError;

/// Earliest accepted calendar year.
pub const MIN_YEAR: i32 = 2000;

/// Latest accepted calendar year.
pub const MAX_YEAR: i32 = 2100;

/// Maximum length of a client or campaign name, in characters.
pub const MAX_NAME_LEN: usize = 200;

/// Maximum length of platform / operation type / budget type / KPI labels.
pub const MAX_LABEL_LEN: usize = 100;

/// Largest amount a `NUMERIC(15, 2)` column holds.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_7FFF, 0x0003_8D7E, 0, false, 2); // 9_999_999_999_999.99

/// Decimal places stored for amounts.
pub const AMOUNT_SCALE: u32 = 2;

/// Checks that `year` lies in the supported range.
pub fn validate_year(year: i32) -> Result<(), PlanningError> {
    if (MIN_YEAR..=MAX_YEAR).contains(&year) {
        Ok(())
    } else {
        Err(PlanningError::InvalidYear(year))
    }
}

/// Checks that `month` is 1-12.
pub fn validate_month(month: u32) -> Result<(), PlanningError> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(PlanningError::InvalidMonth(month))
    }
}

/// Trims a required text field and enforces its maximum length.
pub fn require_text(field: &'static str, value: &str, max: usize) -> Result<String, PlanningError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PlanningError::EmptyField(field));
    }
    if trimmed.chars().count() > max {
        return Err(PlanningError::TooLong { field, max });
    }
    Ok(trimmed.to_string())
}

/// Trims an optional text field; blank becomes `None`.
pub fn optional_text(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<Option<String>, PlanningError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) if v.chars().count() > max => Err(PlanningError::TooLong { field, max }),
        Some(v) => Ok(Some(v.to_string())),
    }
}

/// Validates a client or campaign name.
pub fn validate_name(field: &'static str, value: &str) -> Result<String, PlanningError> {
    require_text(field, value, MAX_NAME_LEN)
}

/// Checks that an amount is not negative and fits the stored precision.
pub fn validate_amount(field: &'static str, amount: Decimal) -> Result<(), PlanningError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(PlanningError::NegativeAmount(field));
    }
    if amount.normalize().scale() > AMOUNT_SCALE {
        return Err(PlanningError::TooManyDecimals(field));
    }
    if amount.abs() > MAX_AMOUNT {
        return Err(PlanningError::AmountTooLarge(field));
    }
    Ok(())
}

/// Validates a campaign's run period.
///
/// The end period is optional but, when present, needs both parts and must
/// not precede the start.
pub fn validate_period(
    start_year: i32,
    start_month: u32,
    end_year: Option<i32>,
    end_month: Option<u32>,
) -> Result<(), PlanningError> {
    validate_year(start_year)?;
    validate_month(start_month)?;

    match (end_year, end_month) {
        (None, None) => Ok(()),
        (Some(year), Some(month)) => {
            validate_year(year)?;
            validate_month(month)?;
            if (year, month) < (start_year, start_month) {
                return Err(PlanningError::EndBeforeStart {
                    start: format!("{start_year:04}-{start_month:02}"),
                    end: format!("{year:04}-{month:02}"),
                });
            }
            Ok(())
        }
        _ => Err(PlanningError::IncompleteEndPeriod),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(2000, true)]
    #[case(2024, true)]
    #[case(2100, true)]
    #[case(1999, false)]
    #[case(2101, false)]
    fn test_validate_year(#[case] year: i32, #[case] ok: bool) {
        assert_eq!(validate_year(year).is_ok(), ok);
    }

    #[rstest]
    #[case(0, false)]
    #[case(1, true)]
    #[case(12, true)]
    #[case(13, false)]
    fn test_validate_month(#[case] month: u32, #[case] ok: bool) {
        assert_eq!(validate_month(month).is_ok(), ok);
    }

    #[test]
    fn test_validate_name_trims() {
        assert_eq!(validate_name("name", "  Acme  ").unwrap(), "Acme");
        assert_eq!(
            validate_name("name", "   "),
            Err(PlanningError::EmptyField("name"))
        );
    }

    #[test]
    fn test_validate_name_length_counts_chars() {
        let exactly = "広".repeat(MAX_NAME_LEN);
        assert!(validate_name("name", &exactly).is_ok());

        let over = "広".repeat(MAX_NAME_LEN + 1);
        assert_eq!(
            validate_name("name", &over),
            Err(PlanningError::TooLong { field: "name", max: MAX_NAME_LEN })
        );
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text("kpi", None, 10).unwrap(), None);
        assert_eq!(optional_text("kpi", Some("  "), 10).unwrap(), None);
        assert_eq!(optional_text("kpi", Some(" CV "), 10).unwrap().as_deref(), Some("CV"));
        assert!(optional_text("kpi", Some("12345678901"), 10).is_err());
    }

    #[rstest]
    #[case(dec!(9999999999999.99), None)]
    #[case(dec!(100.500), None)]
    #[case(dec!(10000000000000), Some(PlanningError::AmountTooLarge("amount")))]
    #[case(dec!(99999999999999999.999), Some(PlanningError::TooManyDecimals("amount")))]
    #[case(dec!(0.125), Some(PlanningError::TooManyDecimals("amount")))]
    fn test_validate_amount_fits_column(#[case] amount: Decimal, #[case] expected: Option<PlanningError>) {
        assert_eq!(validate_amount("amount", amount).err(), expected);
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount("amount", dec!(0)).is_ok());
        assert!(validate_amount("amount", dec!(-0)).is_ok());
        assert!(validate_amount("amount", dec!(100.50)).is_ok());
        assert_eq!(
            validate_amount("amount", dec!(-1)),
            Err(PlanningError::NegativeAmount("amount"))
        );
    }

    #[test]
    fn test_validate_period() {
        assert!(validate_period(2024, 4, None, None).is_ok());
        assert!(validate_period(2024, 4, Some(2024), Some(4)).is_ok());
        assert!(validate_period(2024, 4, Some(2025), Some(1)).is_ok());
        assert!(matches!(
            validate_period(2024, 4, Some(2024), Some(3)),
            Err(PlanningError::EndBeforeStart { .. })
        ));
        assert_eq!(
            validate_period(2024, 4, Some(2024), None),
            Err(PlanningError::IncompleteEndPeriod)
        );
        assert_eq!(
            validate_period(2024, 13, None, None),
            Err(PlanningError::InvalidMonth(13))
        );
    }
}
