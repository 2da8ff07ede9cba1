//! Shared pieces of the budget and result repositories.

use sea_orm::{ColumnTrait, Condition, DbErr, SqlErr};
use serde::Deserialize;

use adbudget_core::planning::EntryKey;
use adbudget_shared::AppError;
use adbudget_shared::types::CampaignId;

use super::campaign::month_column;

/// Error types for budget and result operations.
#[derive(Debug, thiserror::Error)]
pub enum EntryError {
    /// Row not found.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// "Budget" or "Result".
        kind: &'static str,
        /// Row ID.
        id: uuid::Uuid,
    },

    /// Referenced campaign does not exist.
    #[error("Campaign not found: {0}")]
    CampaignNotFound(CampaignId),

    /// A row with the same composite key already exists.
    #[error("{kind} already exists for {campaign_id} {year}-{month:02} {platform}/{operation_type}/{budget_type}")]
    DuplicateKey {
        /// "Budget" or "Result".
        kind: &'static str,
        /// Campaign.
        campaign_id: CampaignId,
        /// Year.
        year: i32,
        /// Month.
        month: u32,
        /// Platform.
        platform: String,
        /// Operation type.
        operation_type: String,
        /// Budget type.
        budget_type: String,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl EntryError {
    pub(crate) fn duplicate(kind: &'static str, key: &EntryKey) -> Self {
        Self::DuplicateKey {
            kind,
            campaign_id: key.campaign_id,
            year: key.year,
            month: key.month,
            platform: key.platform.clone(),
            operation_type: key.operation_type.clone(),
            budget_type: key.budget_type.clone(),
        }
    }

    /// Maps a unique-constraint violation raced past the pre-check.
    pub(crate) fn from_insert(kind: &'static str, key: &EntryKey, err: DbErr) -> Self {
        if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
            Self::duplicate(kind, key)
        } else {
            Self::Database(err)
        }
    }
}

impl From<EntryError> for AppError {
    fn from(err: EntryError) -> Self {
        match err {
            EntryError::NotFound { .. } => Self::NotFound(err.to_string()),
            EntryError::CampaignNotFound(_) => Self::Validation(err.to_string()),
            EntryError::DuplicateKey { .. } => Self::Conflict(err.to_string()),
            EntryError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Filter options for listing budgets or results.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryFilter {
    /// Campaign.
    #[serde(alias = "campaignId")]
    pub campaign_id: Option<CampaignId>,
    /// Year.
    pub year: Option<i32>,
    /// Month.
    pub month: Option<u32>,
    /// Platform (exact match).
    pub platform: Option<String>,
    /// Operation type (exact match).
    #[serde(alias = "operationType")]
    pub operation_type: Option<String>,
}

/// Column set common to the `budgets` and `results` tables.
pub(crate) struct KeyColumns<C> {
    pub campaign_id: C,
    pub year: C,
    pub month: C,
    pub platform: C,
    pub operation_type: C,
    pub budget_type: C,
}

impl<C: ColumnTrait> KeyColumns<C> {
    /// Exact match on all six key fields.
    pub fn matching(&self, key: &EntryKey) -> Condition {
        Condition::all()
            .add(self.campaign_id.eq(key.campaign_id.into_inner()))
            .add(self.year.eq(key.year))
            .add(self.month.eq(month_column(key.month)))
            .add(self.platform.eq(key.platform.as_str()))
            .add(self.operation_type.eq(key.operation_type.as_str()))
            .add(self.budget_type.eq(key.budget_type.as_str()))
    }

    /// Condition for a list filter; empty criteria match everything.
    pub fn filtered(&self, filter: &EntryFilter) -> Condition {
        let mut cond = Condition::all();
        if let Some(campaign_id) = filter.campaign_id {
            cond = cond.add(self.campaign_id.eq(campaign_id.into_inner()));
        }
        if let Some(year) = filter.year {
            cond = cond.add(self.year.eq(year));
        }
        if let Some(month) = filter.month {
            cond = cond.add(self.month.eq(month_column(month)));
        }
        if let Some(platform) = filter.platform.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
            cond = cond.add(self.platform.eq(platform));
        }
        if let Some(op) = filter
            .operation_type
            .as_deref()
            .map(str::trim)
            .filter(|o| !o.is_empty())
        {
            cond = cond.add(self.operation_type.eq(op));
        }
        cond
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> EntryKey {
        EntryKey {
            campaign_id: CampaignId::new(),
            year: 2024,
            month: 1,
            platform: "Google".to_string(),
            operation_type: "運用代行".to_string(),
            budget_type: "通常".to_string(),
        }
    }

    #[test]
    fn test_duplicate_maps_to_conflict() {
        let err = EntryError::duplicate("Budget", &key());
        assert!(err.to_string().contains("2024-01 Google/運用代行/通常"));
        assert_eq!(AppError::from(err).status_code(), 409);
    }

    #[test]
    fn test_other_insert_errors_stay_database_errors() {
        let err = EntryError::from_insert("Result", &key(), DbErr::Custom("boom".to_string()));
        assert!(matches!(err, EntryError::Database(_)));
        assert_eq!(AppError::from(err).status_code(), 500);
    }

    #[test]
    fn test_missing_campaign_is_validation_error() {
        let err = EntryError::CampaignNotFound(CampaignId::new());
        assert_eq!(AppError::from(err).status_code(), 400);
    }
}
