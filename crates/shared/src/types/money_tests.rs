use super::*;
use rstest::rstest;
use rust_decimal_macros::dec;

#[rstest]
#[case("100000", dec!(100000))]
#[case("  80000.50 ", dec!(80000.50))]
#[case("¥1,234,567", dec!(1234567))]
#[case("￥2,000", dec!(2000))]
#[case("$99.99", dec!(99.99))]
#[case("80000円", dec!(80000))]
#[case("\"1,000\"", dec!(1000))]
#[case("(500)", dec!(-500))]
#[case("-42.5", dec!(-42.5))]
fn test_parse_amount(#[case] input: &str, #[case] expected: Decimal) {
    assert_eq!(parse_amount(input).unwrap(), expected);
}

#[test]
fn test_parse_amount_empty() {
    assert_eq!(parse_amount(""), Err(AmountParseError::Empty));
    assert_eq!(parse_amount("   "), Err(AmountParseError::Empty));
    assert_eq!(parse_amount("¥"), Err(AmountParseError::Empty));
}

#[test]
fn test_parse_amount_invalid() {
    assert_eq!(
        parse_amount("abc"),
        Err(AmountParseError::Invalid("abc".to_string()))
    );
    assert!(parse_amount("1.2.3").is_err());
}

#[test]
fn test_round_metric() {
    assert_eq!(round_metric(dec!(33.333333)), dec!(33.33));
    assert_eq!(round_metric(dec!(66.665)), dec!(66.67));
    assert_eq!(round_metric(dec!(-0.005)), dec!(-0.01));
    assert_eq!(round_metric(dec!(80)), dec!(80));
}

#[rstest]
#[case(dec!(80), "80.00")]
#[case(dec!(200.5), "200.50")]
#[case(dec!(33.3333), "33.33")]
#[case(dec!(0), "0.00")]
#[case(dec!(-12.345), "-12.35")]
fn test_format_fixed2(#[case] value: Decimal, #[case] expected: &str) {
    assert_eq!(format_fixed2(value), expected);
}
