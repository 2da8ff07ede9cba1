//! Composite key pairing budgets with results.

use adbudget_shared::types::{CampaignId, KeyGranularity};

use super::types::{BudgetRecord, ResultRecord};

/// Identifies one planning/actuals cell.
///
/// Text fields are trimmed so that `"Google "` and `"Google"` land on the same
/// cell. `budget_type` is `None` under [`KeyGranularity::Operation`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompositeKey {
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
    /// Budget type, when the granularity includes it.
    pub budget_type: Option<String>,
}

impl CompositeKey {
    /// Builds a key from its parts.
    #[must_use]
    pub fn new(
        campaign_id: CampaignId,
        year: i32,
        month: u32,
        platform: &str,
        operation_type: &str,
        budget_type: &str,
        granularity: KeyGranularity,
    ) -> Self {
        Self {
            campaign_id,
            year,
            month,
            platform: platform.trim().to_string(),
            operation_type: operation_type.trim().to_string(),
            budget_type: granularity
                .includes_budget_type()
                .then(|| budget_type.trim().to_string()),
        }
    }
}

/// Records that can be placed on the reconciliation grid.
pub trait Keyed {
    /// Returns the record's composite key at the given granularity.
    fn composite_key(&self, granularity: KeyGranularity) -> CompositeKey;
}

impl Keyed for BudgetRecord {
    fn composite_key(&self, granularity: KeyGranularity) -> CompositeKey {
        CompositeKey::new(
            self.campaign.id,
            self.year,
            self.month,
            &self.platform,
            &self.operation_type,
            &self.budget_type,
            granularity,
        )
    }
}

impl Keyed for ResultRecord {
    fn composite_key(&self, granularity: KeyGranularity) -> CompositeKey {
        CompositeKey::new(
            self.campaign.id,
            self.year,
            self.month,
            &self.platform,
            &self.operation_type,
            &self.budget_type,
            granularity,
        )
    }
}
