use rust_decimal_macros::dec;
use uuid::Uuid;

use super::*;

const CAMPAIGN: &str = "0190a6c8-7b1e-7c3a-9d2f-000000000001";

fn campaign_id() -> CampaignId {
    CampaignId::from_uuid(Uuid::parse_str(CAMPAIGN).unwrap())
}

#[test]
fn test_parses_budget_and_result_sides() {
    let csv = format!(
        "campaignId,year,month,platform,operationType,budgetType,budgetAmount,targetKpi,targetValue,actualSpend,actualResult\n\
         {CAMPAIGN},2024,1,Google,運用代行,通常,\"¥100,000\",CV,400,80000,240000\n"
    );

    let parsed = parse_import(csv.as_bytes()).unwrap();

    assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
    assert_eq!(parsed.rows.len(), 1);
    let row = &parsed.rows[0];
    assert_eq!(row.line, 2);
    assert_eq!(row.key.campaign_id, campaign_id());
    assert_eq!(row.key.platform, "Google");

    let budget = row.budget.as_ref().unwrap();
    assert_eq!(budget.amount, dec!(100000));
    assert_eq!(budget.target_kpi.as_deref(), Some("CV"));
    assert_eq!(budget.target_value, Some(dec!(400)));

    let result = row.result.unwrap();
    assert_eq!(result.actual_spend, dec!(80000));
    assert_eq!(result.actual_result, dec!(240000));
}

#[test]
fn test_headers_are_flexible() {
    let csv = format!(
        "Budget Type , campaign_id,YEAR,month,Platform,operation_type,actual_spend\n\
         通常,{CAMPAIGN},2024,2,Yahoo,広告費,5000\n"
    );

    let parsed = parse_import(csv.as_bytes()).unwrap();

    assert_eq!(parsed.rows.len(), 1);
    let row = &parsed.rows[0];
    assert_eq!(row.key.budget_type, "通常");
    assert!(row.budget.is_none());
    let result = row.result.unwrap();
    assert_eq!(result.actual_spend, dec!(5000));
    assert_eq!(result.actual_result, dec!(0));
}

#[test]
fn test_missing_required_column() {
    let csv = "campaignId,year,month,platform,budgetType,budgetAmount\n";

    let err = parse_import(csv.as_bytes()).unwrap_err();

    assert!(matches!(err, TransferError::MissingColumn("operationType")));
}

#[test]
fn test_empty_input() {
    assert!(matches!(parse_import(b""), Err(TransferError::Empty)));
}

#[test]
fn test_row_errors_carry_line_numbers() {
    let csv = format!(
        "campaignId,year,month,platform,operationType,budgetType,budgetAmount\n\
         {CAMPAIGN},2024,1,Google,運用代行,通常,1000\n\
         not-a-uuid,2024,1,Google,運用代行,通常,1000\n\
         {CAMPAIGN},2024,13,Google,運用代行,通常,1000\n\
         {CAMPAIGN},2024,2,Google,運用代行,通常,abc\n\
         {CAMPAIGN},2024,3,Google,運用代行,通常,\n\
         {CAMPAIGN},2024,4,Google,運用代行,通常,-5\n"
    );

    let parsed = parse_import(csv.as_bytes()).unwrap();

    assert_eq!(parsed.rows.len(), 1);
    let lines: Vec<u64> = parsed.errors.iter().map(|e| e.line).collect();
    assert_eq!(lines, vec![3, 4, 5, 6, 7]);
    assert!(parsed.errors[0].message.contains("campaignId"));
    assert!(parsed.errors[1].message.contains("Month 13"));
    assert!(parsed.errors[2].message.contains("budgetAmount"));
    assert!(parsed.errors[3].message.contains("neither"));
    assert!(parsed.errors[4].message.contains("negative"));
}

#[test]
fn test_duplicate_key_in_file() {
    let csv = format!(
        "campaignId,year,month,platform,operationType,budgetType,budgetAmount\n\
         {CAMPAIGN},2024,1,Google,運用代行,通常,1000\n\
         {CAMPAIGN},2024,1, Google ,運用代行,通常,2000\n"
    );

    let parsed = parse_import(csv.as_bytes()).unwrap();

    assert_eq!(parsed.rows.len(), 1);
    assert_eq!(parsed.rows[0].budget.as_ref().unwrap().amount, dec!(1000));
    assert_eq!(parsed.errors, vec![RowError::new(3, "duplicate of the key on line 2")]);
}

#[test]
fn test_budget_and_result_rows_for_one_key_are_both_kept() {
    let csv = format!(
        "campaignId,year,month,platform,operationType,budgetType,budgetAmount,actualSpend,actualResult\n\
         {CAMPAIGN},2024,1,Google,運用代行,通常,100000,,\n\
         {CAMPAIGN},2024,1,Google,運用代行,通常,,80000,240000\n\
         {CAMPAIGN},2024,1,Google,運用代行,通常,,1,1\n"
    );

    let parsed = parse_import(csv.as_bytes()).unwrap();

    assert_eq!(parsed.rows.len(), 2);
    assert_eq!(parsed.rows[0].budget.as_ref().unwrap().amount, dec!(100000));
    assert!(parsed.rows[0].result.is_none());
    assert!(parsed.rows[1].budget.is_none());
    assert_eq!(parsed.rows[1].result.unwrap().actual_spend, dec!(80000));
    assert_eq!(parsed.errors, vec![RowError::new(4, "duplicate of the key on line 3")]);
}

#[test]
fn test_amount_beyond_column_precision_is_row_error() {
    let csv = format!(
        "campaignId,year,month,platform,operationType,budgetType,budgetAmount\n\
         {CAMPAIGN},2024,1,Google,運用代行,通常,99999999999999999.999\n\
         {CAMPAIGN},2024,2,Google,運用代行,通常,10000000000000\n\
         {CAMPAIGN},2024,3,Google,運用代行,通常,1000\n"
    );

    let parsed = parse_import(csv.as_bytes()).unwrap();

    assert_eq!(parsed.rows.len(), 1);
    assert_eq!(parsed.rows[0].line, 4);
    assert_eq!(
        parsed.errors,
        vec![
            RowError::new(2, "amount must have at most 2 decimal places"),
            RowError::new(3, "amount must be at most 9999999999999.99"),
        ]
    );
}

#[test]
fn test_blank_lines_are_skipped() {
    let csv = format!(
        "campaignId,year,month,platform,operationType,budgetType,budgetAmount\n\
         ,,,,,,\n\
         {CAMPAIGN},2024,1,Google,運用代行,通常,1000\n"
    );

    let parsed = parse_import(csv.as_bytes()).unwrap();

    assert!(parsed.errors.is_empty());
    assert_eq!(parsed.rows[0].line, 3);
}

#[test]
fn test_summary_serializes_camel_case() {
    let summary = ImportSummary {
        budgets_created: 2,
        errors: vec![RowError::new(4, "bad")],
        ..ImportSummary::default()
    };

    let json = serde_json::to_value(&summary).unwrap();

    assert_eq!(json["budgetsCreated"], 2);
    assert_eq!(json["resultsUpdated"], 0);
    assert_eq!(json["errors"][0]["line"], 4);
}
