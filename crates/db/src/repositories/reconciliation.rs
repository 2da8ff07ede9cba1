//! Store boundary for reconciliation.
//!
//! Fetches the budgets and results matching a [`ReconcileFilter`] and maps the
//! ORM rows into engine records. Every numeric column is converted to
//! `Decimal` exactly once, here; the engine never sees database types.

use std::collections::HashMap;

use sea_orm::{ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use tracing::{debug, warn};
use uuid::Uuid;

use adbudget_core::reconciliation::{
    BudgetRecord, CampaignInfo, ClientInfo, ReconcileFilter, ResultRecord,
};
use adbudget_shared::types::{BudgetId, CampaignId, ClientId, ResultId};

use super::campaign::month_column;
use crate::entities::{budgets, campaigns, clients, results};

/// Budgets and results narrowed by the same criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationInputs {
    /// Budget records.
    pub budgets: Vec<BudgetRecord>,
    /// Result records.
    pub results: Vec<ResultRecord>,
}

/// Read-only repository feeding the reconciliation engine.
#[derive(Debug, Clone)]
pub struct ReconciliationRepository {
    db: DatabaseConnection,
}

impl ReconciliationRepository {
    /// Creates a new reconciliation repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Loads every budget and result matching `filter`, each carrying its
    /// campaign and client display fields.
    pub async fn fetch(&self, filter: &ReconcileFilter) -> Result<ReconciliationInputs, DbErr> {
        let campaigns = self.campaigns(filter).await?;
        if campaigns.is_empty() {
            return Ok(ReconciliationInputs::default());
        }
        let campaign_ids: Vec<Uuid> = campaigns.keys().copied().collect();
        let scope = CampaignScope::new(filter, campaign_ids);

        let budget_rows = budgets::Entity::find()
            .filter(period_condition(
                filter,
                budgets::Column::Year,
                budgets::Column::Month,
                budgets::Column::Platform,
                budgets::Column::OperationType,
            ))
            .filter(scope.condition(budgets::Column::CampaignId))
            .all(&self.db)
            .await?;

        let result_rows = results::Entity::find()
            .filter(period_condition(
                filter,
                results::Column::Year,
                results::Column::Month,
                results::Column::Platform,
                results::Column::OperationType,
            ))
            .filter(scope.condition(results::Column::CampaignId))
            .all(&self.db)
            .await?;

        debug!(
            campaigns = campaigns.len(),
            budgets = budget_rows.len(),
            results = result_rows.len(),
            "Loaded reconciliation inputs"
        );

        Ok(ReconciliationInputs {
            budgets: budget_rows
                .into_iter()
                .filter_map(|row| {
                    let campaign = campaigns.get(&row.campaign_id)?;
                    Some(budget_record(row, campaign))
                })
                .collect(),
            results: result_rows
                .into_iter()
                .filter_map(|row| {
                    let campaign = campaigns.get(&row.campaign_id)?;
                    Some(result_record(row, campaign))
                })
                .collect(),
        })
    }

    /// Campaigns (with clients) allowed by the client and department criteria.
    async fn campaigns(&self, filter: &ReconcileFilter) -> Result<HashMap<Uuid, CampaignInfo>, DbErr> {
        let mut query = campaigns::Entity::find().find_also_related(clients::Entity);

        if let Some(client_id) = filter.client_id {
            query = query.filter(campaigns::Column::ClientId.eq(client_id.into_inner()));
        }
        if let Some(department) = filter.department.as_deref() {
            query = query.filter(clients::Column::Department.eq(department));
        }

        let rows = query.all(&self.db).await?;
        Ok(rows
            .into_iter()
            .filter_map(|(campaign, client)| {
                let Some(client) = client else {
                    warn!(campaign_id = %campaign.id, "Campaign has no client row");
                    return None;
                };
                Some((campaign.id, campaign_info(campaign, client)))
            })
            .collect())
    }
}

/// Campaign restriction applied to entry queries.
///
/// Without client or department criteria every campaign is in scope, so no
/// ID list is bound; rows whose campaign was not loaded are dropped when mapped.
struct CampaignScope(Option<Vec<Uuid>>);

impl CampaignScope {
    fn new(filter: &ReconcileFilter, campaign_ids: Vec<Uuid>) -> Self {
        Self(filter.narrows_campaigns().then_some(campaign_ids))
    }

    fn condition<C: ColumnTrait>(&self, column: C) -> Condition {
        match &self.0 {
            Some(ids) => Condition::all().add(column.is_in(ids.iter().copied())),
            None => Condition::all(),
        }
    }
}

fn period_condition<C: ColumnTrait>(
    filter: &ReconcileFilter,
    year: C,
    month: C,
    platform: C,
    operation_type: C,
) -> Condition {
    let mut cond = Condition::all();
    if let Some(y) = filter.year {
        cond = cond.add(year.eq(y));
    }
    if let Some(m) = filter.month {
        cond = cond.add(month.eq(month_column(m)));
    }
    if let Some(p) = filter.platform.as_deref() {
        cond = cond.add(platform.eq(p));
    }
    if let Some(op) = filter.operation_type.as_deref() {
        cond = cond.add(operation_type.eq(op));
    }
    cond
}

/// Maps campaign and client rows to display info.
pub fn campaign_info(campaign: campaigns::Model, client: clients::Model) -> CampaignInfo {
    CampaignInfo {
        id: CampaignId::from_uuid(campaign.id),
        name: campaign.name,
        client: ClientInfo {
            id: ClientId::from_uuid(client.id),
            name: client.name,
            department: client.department,
        },
    }
}

/// The table's CHECK constraint keeps months in 1-12.
fn month_value(month: i32) -> u32 {
    u32::try_from(month).unwrap_or_default()
}

/// Maps a budget row to an engine record.
pub fn budget_record(row: budgets::Model, campaign: &CampaignInfo) -> BudgetRecord {
    BudgetRecord {
        id: BudgetId::from_uuid(row.id),
        campaign: campaign.clone(),
        year: row.year,
        month: month_value(row.month),
        platform: row.platform,
        operation_type: row.operation_type,
        budget_type: row.budget_type,
        amount: row.amount,
        target_kpi: row.target_kpi,
        target_value: row.target_value,
    }
}

/// Maps a result row to an engine record.
pub fn result_record(row: results::Model, campaign: &CampaignInfo) -> ResultRecord {
    ResultRecord {
        id: ResultId::from_uuid(row.id),
        campaign: campaign.clone(),
        year: row.year,
        month: month_value(row.month),
        platform: row.platform,
        operation_type: row.operation_type,
        budget_type: row.budget_type,
        actual_spend: row.actual_spend,
        actual_result: row.actual_result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase, QueryTrait};

    fn now() -> sea_orm::prelude::DateTimeWithTimeZone {
        chrono::Utc::now().into()
    }

    fn client() -> clients::Model {
        clients::Model {
            id: Uuid::now_v7(),
            name: "Acme".to_string(),
            department: Some("第一営業部".to_string()),
            created_at: now(),
            updated_at: now(),
        }
    }

    fn campaign(client_id: Uuid) -> campaigns::Model {
        campaigns::Model {
            id: Uuid::now_v7(),
            client_id,
            name: "Spring Sale".to_string(),
            total_budget: dec!(500000),
            start_year: 2024,
            start_month: 1,
            end_year: None,
            end_month: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    #[test]
    fn test_budget_record_normalizes_row() {
        let client = client();
        let campaign = campaign(client.id);
        let info = campaign_info(campaign.clone(), client.clone());
        let row = budgets::Model {
            id: Uuid::now_v7(),
            campaign_id: campaign.id,
            year: 2024,
            month: 3,
            platform: "Google".to_string(),
            operation_type: "運用代行".to_string(),
            budget_type: "通常".to_string(),
            amount: dec!(100000.00),
            target_kpi: None,
            target_value: Some(dec!(250)),
            created_at: now(),
            updated_at: now(),
        };

        let record = budget_record(row.clone(), &info);

        assert_eq!(record.id.into_inner(), row.id);
        assert_eq!(record.month, 3);
        assert_eq!(record.amount, dec!(100000));
        assert_eq!(record.target_value, Some(dec!(250)));
        assert_eq!(record.campaign.client.name, "Acme");
        assert_eq!(record.campaign.client.department.as_deref(), Some("第一営業部"));
    }

    #[test]
    fn test_result_record_normalizes_row() {
        let client = client();
        let campaign = campaign(client.id);
        let info = campaign_info(campaign.clone(), client);
        let row = results::Model {
            id: Uuid::now_v7(),
            campaign_id: campaign.id,
            year: 2024,
            month: 12,
            platform: "Yahoo".to_string(),
            operation_type: "広告費".to_string(),
            budget_type: "通常".to_string(),
            actual_spend: dec!(80000),
            actual_result: dec!(240000),
            created_at: now(),
            updated_at: now(),
        };

        let record = result_record(row, &info);

        assert_eq!(record.campaign.id.into_inner(), campaign.id);
        assert_eq!(record.month, 12);
        assert_eq!(record.actual_spend, dec!(80000));
    }

    #[test]
    fn test_month_value_rejects_negative() {
        assert_eq!(month_value(-1), 0);
        assert_eq!(month_value(7), 7);
    }

    fn budget_sql(scope: &CampaignScope) -> String {
        budgets::Entity::find()
            .filter(scope.condition(budgets::Column::CampaignId))
            .build(DatabaseBackend::Postgres)
            .to_string()
    }

    #[test]
    fn test_unfiltered_scope_binds_no_campaign_ids() {
        let ids = vec![Uuid::now_v7(), Uuid::now_v7()];
        let scope = CampaignScope::new(&ReconcileFilter::new().with_year(2024), ids);

        assert!(!budget_sql(&scope).contains(" IN ("));
    }

    #[test]
    fn test_client_scope_binds_campaign_ids() {
        let id = Uuid::now_v7();
        let filter = ReconcileFilter::new().with_client(ClientId::new());
        let scope = CampaignScope::new(&filter, vec![id]);

        let sql = budget_sql(&scope);
        assert!(sql.contains(" IN ("));
        assert!(sql.contains(&id.to_string()));
    }

    #[tokio::test]
    async fn test_fetch_without_matching_campaigns_skips_entry_queries() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<campaigns::Model>::new()])
            .into_connection();
        let repo = ReconciliationRepository::new(db.clone());

        let inputs = repo
            .fetch(&ReconcileFilter::new().with_department("存在しない部"))
            .await
            .unwrap();

        assert_eq!(inputs, ReconciliationInputs::default());
        assert_eq!(db.into_transaction_log().len(), 1);
    }
}
