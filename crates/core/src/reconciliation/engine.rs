//! Budget/result reconciliation engine.

use std::cmp::Ordering;
use std::collections::HashMap;

use rust_decimal::Decimal;

use adbudget_shared::types::KeyGranularity;

use super::key::{CompositeKey, Keyed};
use super::metrics;
use super::types::{
    BudgetRecord, CampaignInfo, LineItem, ReconciliationReport, ReconciliationSummary,
    ResultRecord,
};

/// Budget-side values accumulated for one key.
#[derive(Debug, Clone)]
struct BudgetSide {
    amount: Decimal,
    target_kpi: Option<String>,
    target_value: Option<Decimal>,
}

impl BudgetSide {
    fn from_record(record: &BudgetRecord) -> Self {
        Self {
            amount: record.amount,
            target_kpi: record.target_kpi.clone(),
            target_value: record.target_value,
        }
    }

    /// Folds another budget on the same key (only happens when the key is coarser than the row).
    fn absorb(&mut self, record: &BudgetRecord) {
        self.amount += record.amount;
        if self.target_kpi.is_none() {
            self.target_kpi.clone_from(&record.target_kpi);
        }
        self.target_value = match (self.target_value, record.target_value) {
            (Some(a), Some(b)) => Some(a + b),
            (a, b) => a.or(b),
        };
    }
}

/// Result-side values accumulated for one key.
#[derive(Debug, Clone, Copy)]
struct ResultSide {
    actual_spend: Decimal,
    actual_result: Decimal,
}

impl ResultSide {
    const fn from_record(record: &ResultRecord) -> Self {
        Self {
            actual_spend: record.actual_spend,
            actual_result: record.actual_result,
        }
    }

    fn absorb(&mut self, record: &ResultRecord) {
        self.actual_spend += record.actual_spend;
        self.actual_result += record.actual_result;
    }
}

/// One cell of the grid while it is being assembled.
#[derive(Debug)]
struct Cell {
    campaign: CampaignInfo,
    platform: String,
    operation_type: String,
    budget: Option<BudgetSide>,
    result: Option<ResultSide>,
}

impl Cell {
    fn into_line_item(self, key: CompositeKey) -> LineItem {
        let budget_amount = self.budget.as_ref().map(|b| b.amount);
        let target_value = self.budget.as_ref().and_then(|b| b.target_value);
        let actual_spend = self.result.map(|r| r.actual_spend);
        let actual_result = self.result.map(|r| r.actual_result);

        LineItem {
            campaign_id: key.campaign_id,
            year: key.year,
            month: key.month,
            platform: self.platform,
            operation_type: self.operation_type,
            budget_type: key.budget_type,
            budget_amount,
            target_kpi: self.budget.and_then(|b| b.target_kpi),
            target_value,
            actual_spend,
            actual_result,
            budget_utilization: metrics::budget_utilization(actual_spend, budget_amount),
            roi: metrics::roi(actual_spend, actual_result),
            variance: metrics::variance(budget_amount, actual_spend),
            achievement_rate: metrics::achievement_rate(actual_result, target_value),
            campaign: self.campaign,
        }
    }
}

/// Stateless reconciliation of budgets against results.
pub struct ReconciliationService;

impl ReconciliationService {
    /// Merges budgets and results into one line item per distinct composite key.
    ///
    /// Keys present on only one side produce a one-sided item. Rows that share
    /// a key on the same side are summed. The output is sorted by
    /// [`Self::display_order`].
    #[must_use]
    pub fn reconcile(
        budgets: &[BudgetRecord],
        results: &[ResultRecord],
        granularity: KeyGranularity,
    ) -> Vec<LineItem> {
        let mut cells: HashMap<CompositeKey, Cell> =
            HashMap::with_capacity(budgets.len() + results.len());

        for budget in budgets {
            let key = budget.composite_key(granularity);
            match cells.get_mut(&key) {
                Some(cell) => match cell.budget.as_mut() {
                    Some(side) => side.absorb(budget),
                    None => cell.budget = Some(BudgetSide::from_record(budget)),
                },
                None => {
                    let cell = Cell {
                        campaign: budget.campaign.clone(),
                        platform: key.platform.clone(),
                        operation_type: key.operation_type.clone(),
                        budget: Some(BudgetSide::from_record(budget)),
                        result: None,
                    };
                    cells.insert(key, cell);
                }
            }
        }

        for result in results {
            let key = result.composite_key(granularity);
            match cells.get_mut(&key) {
                Some(cell) => match cell.result.as_mut() {
                    Some(side) => side.absorb(result),
                    None => cell.result = Some(ResultSide::from_record(result)),
                },
                None => {
                    let cell = Cell {
                        campaign: result.campaign.clone(),
                        platform: key.platform.clone(),
                        operation_type: key.operation_type.clone(),
                        budget: None,
                        result: Some(ResultSide::from_record(result)),
                    };
                    cells.insert(key, cell);
                }
            }
        }

        let mut items: Vec<LineItem> = cells
            .into_iter()
            .map(|(key, cell)| cell.into_line_item(key))
            .collect();
        items.sort_by(Self::display_order);
        items
    }

    /// Computes totals over a set of line items.
    #[must_use]
    pub fn summarize(items: &[LineItem]) -> ReconciliationSummary {
        let total_budget: Decimal = items.iter().filter_map(|i| i.budget_amount).sum();
        let total_spend: Decimal = items.iter().filter_map(|i| i.actual_spend).sum();
        let total_result: Decimal = items.iter().filter_map(|i| i.actual_result).sum();

        ReconciliationSummary {
            total_budget,
            total_spend,
            total_result,
            total_variance: total_budget - total_spend,
            overall_utilization: metrics::percent(total_spend, Some(total_budget)),
            efficiency: metrics::efficiency(total_result, total_spend),
            item_count: items.len(),
            budget_item_count: items.iter().filter(|i| i.has_budget()).count(),
            result_item_count: items.iter().filter(|i| i.has_result()).count(),
        }
    }

    /// Reconciles and summarizes in one call.
    #[must_use]
    pub fn report(
        budgets: &[BudgetRecord],
        results: &[ResultRecord],
        granularity: KeyGranularity,
    ) -> ReconciliationReport {
        let data = Self::reconcile(budgets, results, granularity);
        let summary = Self::summarize(&data);
        ReconciliationReport { data, summary }
    }

    /// Newest period first, then campaign name, platform, operation type,
    /// budget type and campaign ID ascending.
    #[must_use]
    pub fn display_order(a: &LineItem, b: &LineItem) -> Ordering {
        b.year
            .cmp(&a.year)
            .then_with(|| b.month.cmp(&a.month))
            .then_with(|| a.campaign.name.cmp(&b.campaign.name))
            .then_with(|| a.platform.cmp(&b.platform))
            .then_with(|| a.operation_type.cmp(&b.operation_type))
            .then_with(|| a.budget_type.cmp(&b.budget_type))
            .then_with(|| a.campaign_id.cmp(&b.campaign_id))
    }
}
