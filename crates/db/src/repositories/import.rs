//! Bulk upsert of parsed CSV rows.

use std::collections::HashSet;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use adbudget_core::planning::{BudgetAmounts, EntryKey, ResultAmounts};
use adbudget_core::transfer::{ImportSummary, ParsedImport, RowError};
use adbudget_shared::AppError;

use super::{budget, result};
use crate::entities::{budgets, campaigns, results};

/// Error types for import operations.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// Database error; the whole import was rolled back.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ImportError> for AppError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Whether an upsert inserted or overwrote a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Upserted {
    Created,
    Updated,
}

/// Writes imported rows inside a single transaction.
#[derive(Debug, Clone)]
pub struct ImportRepository {
    db: DatabaseConnection,
}

impl ImportRepository {
    /// Creates a new import repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Upserts every valid row; rows naming an unknown campaign become row errors.
    ///
    /// Budget and result sides are written independently by composite key.
    /// Either all rows are stored or, on a database failure, none are.
    pub async fn apply(&self, parsed: ParsedImport) -> Result<ImportSummary, ImportError> {
        let ParsedImport { rows, errors } = parsed;
        let mut summary = ImportSummary {
            errors,
            ..ImportSummary::default()
        };
        if rows.is_empty() {
            return Ok(summary);
        }

        let txn = self.db.begin().await?;

        let wanted: Vec<Uuid> = rows
            .iter()
            .map(|r| r.key.campaign_id.into_inner())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let known: HashSet<Uuid> = campaigns::Entity::find()
            .select_only()
            .column(campaigns::Column::Id)
            .filter(campaigns::Column::Id.is_in(wanted))
            .into_tuple::<Uuid>()
            .all(&txn)
            .await?
            .into_iter()
            .collect();

        for row in rows {
            if !known.contains(&row.key.campaign_id.into_inner()) {
                summary.errors.push(RowError::new(
                    row.line,
                    format!("Campaign not found: {}", row.key.campaign_id),
                ));
                continue;
            }

            if let Some(amounts) = row.budget {
                match upsert_budget(&txn, &row.key, amounts).await? {
                    Upserted::Created => summary.budgets_created += 1,
                    Upserted::Updated => summary.budgets_updated += 1,
                }
            }
            if let Some(amounts) = row.result {
                match upsert_result(&txn, &row.key, amounts).await? {
                    Upserted::Created => summary.results_created += 1,
                    Upserted::Updated => summary.results_updated += 1,
                }
            }
        }

        txn.commit().await?;

        summary.errors.sort_by_key(|e| e.line);
        info!(
            budgets_created = summary.budgets_created,
            budgets_updated = summary.budgets_updated,
            results_created = summary.results_created,
            results_updated = summary.results_updated,
            rejected = summary.errors.len(),
            "CSV import applied"
        );
        Ok(summary)
    }
}

async fn upsert_budget(
    txn: &DatabaseTransaction,
    key: &EntryKey,
    amounts: BudgetAmounts,
) -> Result<Upserted, DbErr> {
    let existing = budgets::Entity::find()
        .filter(budget::key_columns().matching(key))
        .one(txn)
        .await?;

    if let Some(row) = existing {
        let mut active: budgets::ActiveModel = row.into();
        budget::apply_amounts(&mut active, amounts);
        active.updated_at = Set(chrono::Utc::now().into());
        active.update(txn).await?;
        Ok(Upserted::Updated)
    } else {
        budget::new_budget(key, amounts).insert(txn).await?;
        Ok(Upserted::Created)
    }
}

async fn upsert_result(
    txn: &DatabaseTransaction,
    key: &EntryKey,
    amounts: ResultAmounts,
) -> Result<Upserted, DbErr> {
    let existing = results::Entity::find()
        .filter(result::key_columns().matching(key))
        .one(txn)
        .await?;

    if let Some(row) = existing {
        let mut active: results::ActiveModel = row.into();
        result::apply_amounts(&mut active, amounts);
        active.updated_at = Set(chrono::Utc::now().into());
        active.update(txn).await?;
        Ok(Upserted::Updated)
    } else {
        result::new_result(key, amounts).insert(txn).await?;
        Ok(Upserted::Created)
    }
}
