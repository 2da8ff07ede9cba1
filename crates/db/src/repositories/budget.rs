//! Budget repository for planned spend per composite key.

use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

use adbudget_core::planning::{BudgetAmounts, BudgetInput, EntryKey};
use adbudget_shared::types::BudgetId;

use super::campaign::month_column;
use super::entry::{EntryError, EntryFilter, KeyColumns};
use crate::entities::{budgets, campaigns};

const KIND: &str = "Budget";

pub(crate) const fn key_columns() -> KeyColumns<budgets::Column> {
    KeyColumns {
        campaign_id: budgets::Column::CampaignId,
        year: budgets::Column::Year,
        month: budgets::Column::Month,
        platform: budgets::Column::Platform,
        operation_type: budgets::Column::OperationType,
        budget_type: budgets::Column::BudgetType,
    }
}

/// Budget repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct BudgetRepository {
    db: DatabaseConnection,
}

impl BudgetRepository {
    /// Creates a new budget repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists budgets matching `filter`, newest period first.
    pub async fn list(&self, filter: &EntryFilter) -> Result<Vec<budgets::Model>, EntryError> {
        let rows = budgets::Entity::find()
            .filter(key_columns().filtered(filter))
            .order_by_desc(budgets::Column::Year)
            .order_by_desc(budgets::Column::Month)
            .order_by_asc(budgets::Column::Platform)
            .order_by_asc(budgets::Column::OperationType)
            .order_by_asc(budgets::Column::BudgetType)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Gets a budget by ID.
    pub async fn get(&self, id: BudgetId) -> Result<budgets::Model, EntryError> {
        budgets::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(EntryError::NotFound {
                kind: KIND,
                id: id.into_inner(),
            })
    }

    /// Creates a budget row.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Campaign not found
    /// - A budget already exists for the same composite key
    pub async fn create(&self, input: BudgetInput) -> Result<budgets::Model, EntryError> {
        let BudgetInput { key, amounts } = input;

        let campaign_exists = campaigns::Entity::find_by_id(key.campaign_id.into_inner())
            .count(&self.db)
            .await?
            > 0;
        if !campaign_exists {
            return Err(EntryError::CampaignNotFound(key.campaign_id));
        }

        let existing = budgets::Entity::find()
            .filter(key_columns().matching(&key))
            .count(&self.db)
            .await?;
        if existing > 0 {
            return Err(EntryError::duplicate(KIND, &key));
        }

        new_budget(&key, amounts)
            .insert(&self.db)
            .await
            .map_err(|e| EntryError::from_insert(KIND, &key, e))
    }

    /// Replaces the amount and KPI target. The key is fixed once created.
    pub async fn update(&self, id: BudgetId, amounts: BudgetAmounts) -> Result<budgets::Model, EntryError> {
        let budget = self.get(id).await?;

        let mut active: budgets::ActiveModel = budget.into();
        apply_amounts(&mut active, amounts);
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a budget.
    pub async fn delete(&self, id: BudgetId) -> Result<(), EntryError> {
        let result = budgets::Entity::delete_by_id(id.into_inner())
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
pub(crate) fn new_budget(key: &EntryKey, amounts: BudgetAmounts) -> budgets::ActiveModel {
    let now = chrono::Utc::now().into();
    let mut active = budgets::ActiveModel {
        id: Set(BudgetId::new().into_inner()),
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

pub(crate) fn apply_amounts(active: &mut budgets::ActiveModel, amounts: BudgetAmounts) {
    active.amount = Set(amounts.amount);
    active.target_kpi = Set(amounts.target_kpi);
    active.target_value = Set(amounts.target_value);
}
