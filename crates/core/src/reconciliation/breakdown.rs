//! Grouped totals for dashboard charts.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::metrics;
use super::types::LineItem;

/// Dimension to group line items by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakdownDimension {
    /// Advertising platform.
    Platform,
    /// Calendar month (`YYYY-MM`).
    Month,
    /// Owning client.
    Client,
    /// Campaign.
    Campaign,
    /// Operation type.
    OperationType,
}

/// Totals for one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownRow {
    /// Stable group key (an ID or the raw label).
    pub key: String,
    /// Display label.
    pub label: String,
    /// Sum of budget amounts.
    pub total_budget: Decimal,
    /// Sum of actual spend.
    pub total_spend: Decimal,
    /// Sum of actual results.
    pub total_result: Decimal,
    /// `total_spend / total_budget * 100`.
    pub utilization: Decimal,
    /// `total_result / total_spend`.
    pub efficiency: Decimal,
    /// Number of line items in the group.
    pub item_count: usize,
}

impl BreakdownDimension {
    fn key_and_label(self, item: &LineItem) -> (String, String) {
        match self {
            Self::Platform => (item.platform.clone(), item.platform.clone()),
            Self::OperationType => (item.operation_type.clone(), item.operation_type.clone()),
            Self::Month => {
                let label = format!("{:04}-{:02}", item.year, item.month);
                (label.clone(), label)
            }
            Self::Client => (
                item.campaign.client.id.to_string(),
                item.campaign.client.name.clone(),
            ),
            Self::Campaign => (item.campaign.id.to_string(), item.campaign.name.clone()),
        }
    }
}

impl std::str::FromStr for BreakdownDimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "platform" => Ok(Self::Platform),
            "month" => Ok(Self::Month),
            "client" => Ok(Self::Client),
            "campaign" => Ok(Self::Campaign),
            "operation_type" => Ok(Self::OperationType),
            _ => Err(format!("Unknown breakdown dimension: {s}")),
        }
    }
}

/// Groups line items by `dimension`, largest budget first.
///
/// Month groups are ordered chronologically instead.
#[must_use]
pub fn breakdown(items: &[LineItem], dimension: BreakdownDimension) -> Vec<BreakdownRow> {
    let mut groups: HashMap<String, BreakdownRow> = HashMap::new();

    for item in items {
        let (key, label) = dimension.key_and_label(item);
        let row = groups.entry(key.clone()).or_insert_with(|| BreakdownRow {
            key,
            label,
            total_budget: Decimal::ZERO,
            total_spend: Decimal::ZERO,
            total_result: Decimal::ZERO,
            utilization: Decimal::ZERO,
            efficiency: Decimal::ZERO,
            item_count: 0,
        });
        row.total_budget += item.budget_amount.unwrap_or_default();
        row.total_spend += item.actual_spend.unwrap_or_default();
        row.total_result += item.actual_result.unwrap_or_default();
        row.item_count += 1;
    }

    let mut rows: Vec<BreakdownRow> = groups
        .into_values()
        .map(|mut row| {
            row.utilization = metrics::percent(row.total_spend, Some(row.total_budget));
            row.efficiency = metrics::efficiency(row.total_result, row.total_spend);
            row
        })
        .collect();

    if dimension == BreakdownDimension::Month {
        rows.sort_by(|a, b| a.key.cmp(&b.key));
    } else {
        rows.sort_by(|a, b| {
            b.total_budget
                .cmp(&a.total_budget)
                .then_with(|| a.label.cmp(&b.label))
                .then_with(|| a.key.cmp(&b.key))
        });
    }
    rows
}
