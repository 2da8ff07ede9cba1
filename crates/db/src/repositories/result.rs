//! Result repository for actual spend and outcome per composite key.

use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

use adbudget_core::planning::{EntryKey, ResultAmounts, ResultInput};
use adbudget_shared::types::ResultId;

use super::campaign::month_column;
use super::entry::{EntryError, EntryFilter, KeyColumns};
use crate::entities::{campaigns, results};

const KIND: &str = "Result";

pub(crate) const fn key_columns() -> KeyColumns<results::Column> {
    KeyColumns {
        campaign_id: results::Column::CampaignId,
        year: results::Column::Year,
        month: results::Column::Month,
        platform: results::Column::Platform,
        operation_type: results::Column::OperationType,
        budget_type: results::Column::BudgetType,
    }
}

/// Result repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ResultRepository {
    db: DatabaseConnection,
}

impl ResultRepository {
    /// Creates a new result repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists results matching `filter`, newest period first.
    pub async fn list(&self, filter: &EntryFilter) -> Result<Vec<results::Model>, EntryError> {
        let rows = results::Entity::find()
            .filter(key_columns().filtered(filter))
            .order_by_desc(results::Column::Year)
            .order_by_desc(results::Column::Month)
            .order_by_asc(results::Column::Platform)
            .order_by_asc(results::Column::OperationType)
            .order_by_asc(results::Column::BudgetType)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Gets a result by ID.
    pub async fn get(&self, id: ResultId) -> Result<results::Model, EntryError> {
        results::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(EntryError::NotFound {
                kind: KIND,
                id: id.into_inner(),
            })
    }

    /// Creates a result row.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Campaign not found
    /// - A result already exists for the same composite key
    pub async fn create(&self, input: ResultInput) -> Result<results::Model, EntryError> {
        let ResultInput { key, amounts } = input;

        let campaign_exists = campaigns::Entity::find_by_id(key.campaign_id.into_inner())
            .count(&self.db)
            .await?
            > 0;
        if !campaign_exists {
            return Err(EntryError::CampaignNotFound(key.campaign_id));
        }

        let existing = results::Entity::find()
            .filter(key_columns().matching(&key))
            .count(&self.db)
            .await?;
        if existing > 0 {
            return Err(EntryError::duplicate(KIND, &key));
        }

        new_result(&key, amounts)
            .insert(&self.db)
            .await
            .map_err(|e| EntryError::from_insert(KIND, &key, e))
    }

    /// Replaces spend and outcome. The key is fixed once created.
    pub async fn update(&self, id: ResultId, amounts: ResultAmounts) -> Result<results::Model, EntryError> {
        let row = self.get(id).await?;

        let mut active: results::ActiveModel = row.into();
        apply_amounts(&mut active, amounts);
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a result.
    pub async fn delete(&self, id: ResultId) -> Result<(), EntryError> {
        let result = results::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(EntryError::NotFound {
                kind: KIND,
                id: id.into_inner(),
            });
        }
        Ok(())
    }
}

/// Builds an insertable row for `key`.
pub(crate) fn new_result(key: &EntryKey, amounts: ResultAmounts) -> results::ActiveModel {
    let now = chrono::Utc::now().into();
    let mut active = results::ActiveModel {
        id: Set(ResultId::new().into_inner()),
        campaign_id: Set(key.campaign_id.into_inner()),
        year: Set(key.year),
        month: Set(month_column(key.month)),
        platform: Set(key.platform.clone()),
        operation_type: Set(key.operation_type.clone()),
        budget_type: Set(key.budget_type.clone()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    apply_amounts(&mut active, amounts);
    active
}

pub(crate) fn apply_amounts(active: &mut results::ActiveModel, amounts: ResultAmounts) {
    active.actual_spend = Set(amounts.actual_spend);
    active.actual_result = Set(amounts.actual_result);
}
