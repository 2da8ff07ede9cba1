//! Property-based and scenario tests for the reconciliation engine.

use std::collections::HashSet;

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use adbudget_shared::types::{BudgetId, CampaignId, ClientId, KeyGranularity, ResultId};

use super::breakdown::{BreakdownDimension, breakdown};
use super::engine::ReconciliationService;
use super::key::{CompositeKey, Keyed};
use super::types::{BudgetRecord, CampaignInfo, ClientInfo, ResultRecord};

// ============================================================================
// Fixtures
// ============================================================================

fn campaign(seed: u128, name: &str) -> CampaignInfo {
    CampaignInfo {
        id: CampaignId::from_uuid(Uuid::from_u128(seed)),
        name: name.to_string(),
        client: ClientInfo {
            id: ClientId::from_uuid(Uuid::from_u128(seed + 1000)),
            name: format!("Client of {name}"),
            department: Some("第一営業部".to_string()),
        },
    }
}

fn budget(
    campaign: &CampaignInfo,
    year: i32,
    month: u32,
    platform: &str,
    amount: Decimal,
) -> BudgetRecord {
    BudgetRecord {
        id: BudgetId::new(),
        campaign: campaign.clone(),
        year,
        month,
        platform: platform.to_string(),
        operation_type: "運用代行".to_string(),
        budget_type: "通常".to_string(),
        amount,
        target_kpi: None,
        target_value: None,
    }
}

fn result(
    campaign: &CampaignInfo,
    year: i32,
    month: u32,
    platform: &str,
    actual_spend: Decimal,
    actual_result: Decimal,
) -> ResultRecord {
    ResultRecord {
        id: ResultId::new(),
        campaign: campaign.clone(),
        year,
        month,
        platform: platform.to_string(),
        operation_type: "運用代行".to_string(),
        budget_type: "通常".to_string(),
        actual_spend,
        actual_result,
    }
}

fn item_key(item: &super::LineItem) -> CompositeKey {
    CompositeKey {
        campaign_id: item.campaign_id,
        year: item.year,
        month: item.month,
        platform: item.platform.clone(),
        operation_type: item.operation_type.clone(),
        budget_type: item.budget_type.clone(),
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_matching_budget_and_result_merge() {
    let c1 = campaign(1, "Spring Sale");
    let budgets = vec![budget(&c1, 2024, 1, "Google", dec!(100000))];
    let results = vec![result(&c1, 2024, 1, "Google", dec!(80000), dec!(240000))];

    let items = ReconciliationService::reconcile(&budgets, &results, KeyGranularity::Full);

    assert_eq!(items.len(), 1);
    let item = &items[0];
    assert_eq!(item.budget_amount, Some(dec!(100000)));
    assert_eq!(item.actual_spend, Some(dec!(80000)));
    assert_eq!(item.actual_result, Some(dec!(240000)));
    assert_eq!(item.budget_utilization, dec!(80.00));
    assert_eq!(item.roi, dec!(200.00));
    assert_eq!(item.variance, dec!(20000));
    assert_eq!(item.achievement_rate, None);
    assert_eq!(item.budget_type.as_deref(), Some("通常"));
}

#[test]
fn test_budget_only_key() {
    let c1 = campaign(1, "Spring Sale");
    let budgets = vec![budget(&c1, 2024, 2, "Yahoo", dec!(50000))];

    let items = ReconciliationService::reconcile(&budgets, &[], KeyGranularity::Full);

    assert_eq!(items.len(), 1);
    let item = &items[0];
    assert_eq!(item.actual_spend, None);
    assert_eq!(item.actual_result, None);
    assert_eq!(item.budget_utilization, Decimal::ZERO);
    assert_eq!(item.roi, Decimal::ZERO);
    assert_eq!(item.variance, dec!(50000));
}

#[test]
fn test_result_only_key() {
    let c1 = campaign(1, "Spring Sale");
    let results = vec![result(&c1, 2024, 2, "Meta", dec!(30000), dec!(45000))];

    let items = ReconciliationService::reconcile(&[], &results, KeyGranularity::Full);

    assert_eq!(items.len(), 1);
    let item = &items[0];
    assert_eq!(item.budget_amount, None);
    assert_eq!(item.budget_utilization, Decimal::ZERO);
    assert_eq!(item.variance, Decimal::ZERO);
    assert_eq!(item.roi, dec!(50.00));
}

#[test]
fn test_two_budgets_one_matching_result() {
    let c1 = campaign(1, "Spring Sale");
    let budgets = vec![
        budget(&c1, 2024, 1, "Google", dec!(100000)),
        budget(&c1, 2024, 1, "Yahoo", dec!(40000)),
    ];
    let results = vec![result(&c1, 2024, 1, "Google", dec!(90000), dec!(100000))];

    let items = ReconciliationService::reconcile(&budgets, &results, KeyGranularity::Full);

    assert_eq!(items.len(), 2);
    let google = items.iter().find(|i| i.platform == "Google").unwrap();
    let yahoo = items.iter().find(|i| i.platform == "Yahoo").unwrap();
    assert!(google.has_budget() && google.has_result());
    assert!(yahoo.has_budget() && !yahoo.has_result());
    assert_eq!(yahoo.variance, dec!(40000));
}

#[test]
fn test_empty_inputs() {
    let report = ReconciliationService::report(&[], &[], KeyGranularity::Full);

    assert!(report.data.is_empty());
    assert_eq!(report.summary.total_budget, Decimal::ZERO);
    assert_eq!(report.summary.total_spend, Decimal::ZERO);
    assert_eq!(report.summary.total_result, Decimal::ZERO);
    assert_eq!(report.summary.total_variance, Decimal::ZERO);
    assert_eq!(report.summary.overall_utilization, Decimal::ZERO);
    assert_eq!(report.summary.efficiency, Decimal::ZERO);
    assert_eq!(report.summary.item_count, 0);
    assert_eq!(report.summary.budget_item_count, 0);
    assert_eq!(report.summary.result_item_count, 0);
}

#[test]
fn test_zero_budget_with_result_is_guarded() {
    let c1 = campaign(1, "Spring Sale");
    let budgets = vec![budget(&c1, 2024, 1, "Google", dec!(0))];
    let results = vec![result(&c1, 2024, 1, "Google", dec!(12000), dec!(30000))];

    let items = ReconciliationService::reconcile(&budgets, &results, KeyGranularity::Full);

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].budget_utilization, Decimal::ZERO);
    assert_eq!(items[0].variance, Decimal::ZERO);
    assert_eq!(items[0].roi, dec!(150.00));
}

#[test]
fn test_achievement_rate_uses_budget_target() {
    let c1 = campaign(1, "Spring Sale");
    let mut b = budget(&c1, 2024, 1, "Google", dec!(100000));
    b.target_kpi = Some("CV".to_string());
    b.target_value = Some(dec!(400));
    let results = vec![result(&c1, 2024, 1, "Google", dec!(90000), dec!(300))];

    let items = ReconciliationService::reconcile(&[b], &results, KeyGranularity::Full);

    assert_eq!(items[0].target_kpi.as_deref(), Some("CV"));
    assert_eq!(items[0].achievement_rate, Some(dec!(75.00)));
}

#[test]
fn test_budget_type_mismatch_does_not_merge_at_full_granularity() {
    let c1 = campaign(1, "Spring Sale");
    let b = budget(&c1, 2024, 1, "Google", dec!(100000));
    let mut r = result(&c1, 2024, 1, "Google", dec!(90000), dec!(100));
    r.budget_type = "追加".to_string();

    let full = ReconciliationService::reconcile(
        std::slice::from_ref(&b),
        std::slice::from_ref(&r),
        KeyGranularity::Full,
    );
    assert_eq!(full.len(), 2);

    let coarse = ReconciliationService::reconcile(&[b], &[r], KeyGranularity::Operation);
    assert_eq!(coarse.len(), 1);
    assert_eq!(coarse[0].budget_type, None);
    assert_eq!(coarse[0].budget_utilization, dec!(90.00));
}

#[test]
fn test_operation_granularity_sums_same_side_rows() {
    let c1 = campaign(1, "Spring Sale");
    let mut extra = budget(&c1, 2024, 1, "Google", dec!(20000));
    extra.budget_type = "追加".to_string();
    extra.target_value = Some(dec!(50));
    let mut base = budget(&c1, 2024, 1, "Google", dec!(100000));
    base.target_kpi = Some("CV".to_string());
    base.target_value = Some(dec!(100));

    let items = ReconciliationService::reconcile(&[base, extra], &[], KeyGranularity::Operation);

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].budget_amount, Some(dec!(120000)));
    assert_eq!(items[0].target_kpi.as_deref(), Some("CV"));
    assert_eq!(items[0].target_value, Some(dec!(150)));
}

#[test]
fn test_display_order() {
    let alpha = campaign(1, "Alpha");
    let beta = campaign(2, "Beta");
    let budgets = vec![
        budget(&beta, 2023, 12, "Google", dec!(1)),
        budget(&alpha, 2024, 1, "Yahoo", dec!(1)),
        budget(&beta, 2024, 1, "Google", dec!(1)),
        budget(&alpha, 2024, 1, "Google", dec!(1)),
        budget(&alpha, 2024, 2, "Google", dec!(1)),
    ];

    let items = ReconciliationService::reconcile(&budgets, &[], KeyGranularity::Full);
    let order: Vec<(i32, u32, &str, &str)> = items
        .iter()
        .map(|i| (i.year, i.month, i.campaign.name.as_str(), i.platform.as_str()))
        .collect();

    assert_eq!(
        order,
        vec![
            (2024, 2, "Alpha", "Google"),
            (2024, 1, "Alpha", "Google"),
            (2024, 1, "Alpha", "Yahoo"),
            (2024, 1, "Beta", "Google"),
            (2023, 12, "Beta", "Google"),
        ]
    );
}

#[test]
fn test_summary_counts_and_efficiency() {
    let c1 = campaign(1, "Spring Sale");
    let budgets = vec![
        budget(&c1, 2024, 1, "Google", dec!(100000)),
        budget(&c1, 2024, 1, "Yahoo", dec!(50000)),
    ];
    let results = vec![
        result(&c1, 2024, 1, "Google", dec!(80000), dec!(240000)),
        result(&c1, 2024, 1, "Meta", dec!(20000), dec!(10000)),
    ];

    let report = ReconciliationService::report(&budgets, &results, KeyGranularity::Full);

    assert_eq!(report.summary.item_count, 3);
    assert_eq!(report.summary.budget_item_count, 2);
    assert_eq!(report.summary.result_item_count, 2);
    assert_eq!(report.summary.total_budget, dec!(150000));
    assert_eq!(report.summary.total_spend, dec!(100000));
    assert_eq!(report.summary.total_result, dec!(250000));
    assert_eq!(report.summary.total_variance, dec!(50000));
    assert_eq!(report.summary.overall_utilization, dec!(66.67));
    assert_eq!(report.summary.efficiency, dec!(2.50));
}

#[test]
fn test_total_variance_counts_unbudgeted_spend() {
    let c1 = campaign(1, "Spring Sale");
    let budgets = vec![budget(&c1, 2024, 1, "Google", dec!(100000))];
    let results = vec![
        result(&c1, 2024, 1, "Google", dec!(80000), dec!(240000)),
        result(&c1, 2024, 1, "Meta", dec!(30000), dec!(45000)),
    ];

    let report = ReconciliationService::report(&budgets, &results, KeyGranularity::Full);
    let item_variance: Decimal = report.data.iter().map(|i| i.variance).sum();

    assert_eq!(item_variance, dec!(20000));
    assert_eq!(report.summary.total_variance, dec!(-10000));
}

#[test]
fn test_breakdown_by_platform_and_month() {
    let c1 = campaign(1, "Spring Sale");
    let budgets = vec![
        budget(&c1, 2024, 1, "Google", dec!(100000)),
        budget(&c1, 2024, 2, "Google", dec!(100000)),
        budget(&c1, 2024, 1, "Yahoo", dec!(50000)),
    ];
    let results = vec![result(&c1, 2024, 1, "Google", dec!(50000), dec!(100000))];
    let items = ReconciliationService::reconcile(&budgets, &results, KeyGranularity::Full);

    let by_platform = breakdown(&items, BreakdownDimension::Platform);
    assert_eq!(by_platform.len(), 2);
    assert_eq!(by_platform[0].label, "Google");
    assert_eq!(by_platform[0].total_budget, dec!(200000));
    assert_eq!(by_platform[0].utilization, dec!(25.00));
    assert_eq!(by_platform[0].efficiency, dec!(2.00));
    assert_eq!(by_platform[0].item_count, 2);
    assert_eq!(by_platform[1].label, "Yahoo");

    let by_month = breakdown(&items, BreakdownDimension::Month);
    let labels: Vec<&str> = by_month.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["2024-01", "2024-02"]);
}

#[test]
fn test_breakdown_by_client_uses_client_name() {
    let c1 = campaign(1, "Spring Sale");
    let items = ReconciliationService::reconcile(
        &[budget(&c1, 2024, 1, "Google", dec!(10))],
        &[],
        KeyGranularity::Full,
    );

    let rows = breakdown(&items, BreakdownDimension::Client);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].label, "Client of Spring Sale");
    assert_eq!(rows[0].key, c1.client.id.to_string());
}

#[test]
fn test_line_item_serializes_camel_case() {
    let c1 = campaign(1, "Spring Sale");
    let items = ReconciliationService::reconcile(
        &[budget(&c1, 2024, 1, "Google", dec!(100))],
        &[],
        KeyGranularity::Full,
    );

    let json = serde_json::to_value(&items[0]).unwrap();
    assert!(json.get("campaignId").is_some());
    assert!(json.get("budgetUtilization").is_some());
    assert!(json["actualSpend"].is_null());
    assert_eq!(json["campaign"]["client"]["name"], "Client of Spring Sale");
}

// ============================================================================
// Properties
// ============================================================================

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Small key space so budgets and results collide often.
fn cell_strategy() -> impl Strategy<Value = (u128, i32, u32, &'static str, &'static str)> {
    (
        0u128..3,
        2023i32..2025,
        1u32..4,
        prop::sample::select(vec!["Google", "Yahoo", "Meta"]),
        prop::sample::select(vec!["通常", "追加"]),
    )
}

fn budgets_strategy() -> impl Strategy<Value = Vec<BudgetRecord>> {
    prop::collection::vec((cell_strategy(), amount_strategy()), 0..20).prop_map(|cells| {
        let mut seen = HashSet::new();
        cells
            .into_iter()
            .filter(|(cell, _)| seen.insert(*cell))
            .map(|((seed, year, month, platform, budget_type), amount)| {
                let mut b = budget(&campaign(seed, "C"), year, month, platform, amount);
                b.budget_type = budget_type.to_string();
                b
            })
            .collect()
    })
}

fn results_strategy() -> impl Strategy<Value = Vec<ResultRecord>> {
    prop::collection::vec((cell_strategy(), amount_strategy(), amount_strategy()), 0..20).prop_map(
        |cells| {
            let mut seen = HashSet::new();
            cells
                .into_iter()
                .filter(|(cell, _, _)| seen.insert(*cell))
                .map(|((seed, year, month, platform, budget_type), spend, outcome)| {
                    let mut r = result(&campaign(seed, "C"), year, month, platform, spend, outcome);
                    r.budget_type = budget_type.to_string();
                    r
                })
                .collect()
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Output keys are exactly the union of input keys, each appearing once.
    #[test]
    fn prop_key_coverage_without_duplicates(
        budgets in budgets_strategy(),
        results in results_strategy(),
    ) {
        let items = ReconciliationService::reconcile(&budgets, &results, KeyGranularity::Full);

        let expected: HashSet<CompositeKey> = budgets
            .iter()
            .map(|b| b.composite_key(KeyGranularity::Full))
            .chain(results.iter().map(|r| r.composite_key(KeyGranularity::Full)))
            .collect();
        let produced: Vec<CompositeKey> = items.iter().map(item_key).collect();
        let unique: HashSet<CompositeKey> = produced.iter().cloned().collect();

        prop_assert_eq!(produced.len(), unique.len());
        prop_assert_eq!(unique, expected);
    }

    /// Budget-only items carry no actuals and zero spend-derived metrics.
    #[test]
    fn prop_budget_only_items_default_to_zero(budgets in budgets_strategy()) {
        let items = ReconciliationService::reconcile(&budgets, &[], KeyGranularity::Full);

        for item in &items {
            prop_assert_eq!(item.actual_spend, None);
            prop_assert_eq!(item.actual_result, None);
            prop_assert_eq!(item.budget_utilization, Decimal::ZERO);
            prop_assert_eq!(item.roi, Decimal::ZERO);
        }
    }

    /// Absent or zero budgets never produce utilization or variance.
    #[test]
    fn prop_division_guard(
        budgets in budgets_strategy(),
        results in results_strategy(),
    ) {
        let items = ReconciliationService::reconcile(&budgets, &results, KeyGranularity::Full);

        for item in items.iter().filter(|i| i.budget_amount.is_none_or(|b| b.is_zero())) {
            prop_assert_eq!(item.budget_utilization, Decimal::ZERO);
            prop_assert_eq!(item.variance, Decimal::ZERO);
        }
    }

    /// Summary totals equal the sums over produced line items and over the inputs.
    #[test]
    fn prop_summary_consistency(
        budgets in budgets_strategy(),
        results in results_strategy(),
        coarse in any::<bool>(),
    ) {
        let granularity = if coarse { KeyGranularity::Operation } else { KeyGranularity::Full };
        let report = ReconciliationService::report(&budgets, &results, granularity);

        let item_budget: Decimal = report.data.iter().map(|i| i.budget_amount.unwrap_or_default()).sum();
        let item_spend: Decimal = report.data.iter().map(|i| i.actual_spend.unwrap_or_default()).sum();
        let item_result: Decimal = report.data.iter().map(|i| i.actual_result.unwrap_or_default()).sum();

        prop_assert_eq!(report.summary.total_budget, item_budget);
        prop_assert_eq!(report.summary.total_spend, item_spend);
        prop_assert_eq!(report.summary.total_result, item_result);
        prop_assert_eq!(report.summary.total_budget, budgets.iter().map(|b| b.amount).sum::<Decimal>());
        prop_assert_eq!(report.summary.total_spend, results.iter().map(|r| r.actual_spend).sum::<Decimal>());
        prop_assert_eq!(report.summary.item_count, report.data.len());
    }

    /// Reconciling the same inputs twice yields identical output.
    #[test]
    fn prop_idempotent(
        budgets in budgets_strategy(),
        results in results_strategy(),
    ) {
        let first = ReconciliationService::report(&budgets, &results, KeyGranularity::Full);
        let second = ReconciliationService::report(&budgets, &results, KeyGranularity::Full);

        prop_assert_eq!(first, second);
    }
}
