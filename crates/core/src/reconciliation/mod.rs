//! Budget/result reconciliation and aggregation.
//!
//! Budgets and results are recorded independently against the same composite
//! key. This module merges them into one line item per key, derives
//! utilization, ROI, variance and achievement metrics, and aggregates the
//! items into summaries and grouped breakdowns. Everything here is pure and
//! request-scoped; the caller fetches already-filtered records.

pub mod breakdown;
pub mod engine;
pub mod filter;
pub mod key;
pub mod metrics;
pub mod types;

#[cfg(test)]
mod tests;

pub use breakdown::{BreakdownDimension, BreakdownRow, breakdown};
pub use engine::ReconciliationService;
pub use filter::ReconcileFilter;
pub use key::{CompositeKey, Keyed};
pub use types::{
    BudgetRecord, CampaignInfo, ClientInfo, LineItem, ReconciliationReport, ReconciliationSummary,
    ResultRecord,
};
