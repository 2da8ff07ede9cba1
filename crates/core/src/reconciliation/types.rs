//! Reconciliation data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use adbudget_shared::types::{BudgetId, CampaignId, ClientId, ResultId};

/// Client display fields carried alongside every record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    /// Client ID.
    pub id: ClientId,
    /// Client name.
    pub name: String,
    /// Department or division label.
    pub department: Option<String>,
}

/// Campaign display fields with the owning client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignInfo {
    /// Campaign ID.
    pub id: CampaignId,
    /// Campaign name.
    pub name: String,
    /// Owning client.
    pub client: ClientInfo,
}

/// Planned spend for one composite key, already normalized to `Decimal`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetRecord {
    /// Budget row ID.
    pub id: BudgetId,
    /// Campaign the budget belongs to.
    pub campaign: CampaignInfo,
    /// Calendar year.
    pub year: i32,
    /// Calendar month (1-12).
    pub month: u32,
    /// Advertising platform, e.g. "Google".
    pub platform: String,
    /// Operation type, e.g. "運用代行".
    pub operation_type: String,
    /// Budget type.
    pub budget_type: String,
    /// Planned amount.
    pub amount: Decimal,
    /// Name of the target KPI.
    pub target_kpi: Option<String>,
    /// Target KPI value.
    pub target_value: Option<Decimal>,
}

/// Actual spend and outcome for one composite key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    /// Result row ID.
    pub id: ResultId,
    /// Campaign the result belongs to.
    pub campaign: CampaignInfo,
    /// Calendar year.
    pub year: i32,
    /// Calendar month (1-12).
    pub month: u32,
    /// Advertising platform.
    pub platform: String,
    /// Operation type.
    pub operation_type: String,
    /// Budget type.
    pub budget_type: String,
    /// Money actually spent.
    pub actual_spend: Decimal,
    /// Outcome metric (conversions, revenue, ...).
    pub actual_result: Decimal,
}

/// Merged view of the budget and result sharing one composite key.
///
/// Budget-side fields are `None` when no budget exists for the key and
/// result-side fields are `None` when no result exists. Derived metrics are
/// always present and resolve to zero when their denominator is absent or zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Campaign ID.
    pub campaign_id: CampaignId,
    /// Calendar year.
    pub year: i32,
    /// Calendar month.
    pub month: u32,
    /// Platform.
    pub platform: String,
    /// Operation type.
    pub operation_type: String,
    /// Budget type; `None` when the key granularity ignores it.
    pub budget_type: Option<String>,
    /// Planned amount.
    pub budget_amount: Option<Decimal>,
    /// Target KPI name.
    pub target_kpi: Option<String>,
    /// Target KPI value.
    pub target_value: Option<Decimal>,
    /// Actual spend.
    pub actual_spend: Option<Decimal>,
    /// Actual outcome.
    pub actual_result: Option<Decimal>,
    /// `actual_spend / budget_amount * 100`.
    pub budget_utilization: Decimal,
    /// `(actual_result - actual_spend) / actual_spend * 100`.
    pub roi: Decimal,
    /// `budget_amount - actual_spend`.
    pub variance: Decimal,
    /// `actual_result / target_value * 100`; `None` without a target.
    pub achievement_rate: Option<Decimal>,
    /// Campaign and client display fields.
    pub campaign: CampaignInfo,
}

impl LineItem {
    /// Returns true if a budget contributed to this item.
    #[must_use]
    pub const fn has_budget(&self) -> bool {
        self.budget_amount.is_some()
    }

    /// Returns true if a result contributed to this item.
    #[must_use]
    pub const fn has_result(&self) -> bool {
        self.actual_spend.is_some()
    }
}

/// Totals over a set of line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationSummary {
    /// Sum of budget amounts (absent counts as zero).
    pub total_budget: Decimal,
    /// Sum of actual spend.
    pub total_spend: Decimal,
    /// Sum of actual results.
    pub total_result: Decimal,
    /// `total_budget - total_spend`.
    ///
    /// Spend on keys without a budget counts here, while those items carry a
    /// `variance` of 0, so this is not the sum of item variances.
    pub total_variance: Decimal,
    /// `total_spend / total_budget * 100`.
    pub overall_utilization: Decimal,
    /// `total_result / total_spend` as a ratio.
    pub efficiency: Decimal,
    /// Number of line items.
    pub item_count: usize,
    /// Items with a budget side.
    pub budget_item_count: usize,
    /// Items with a result side.
    pub result_item_count: usize,
}

/// Line items plus their summary, the shape returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    /// Sorted line items.
    pub data: Vec<LineItem>,
    /// Totals over `data`.
    pub summary: ReconciliationSummary,
}
