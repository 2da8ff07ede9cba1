//! Budget routes: planned spend per composite key.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use crate::{
    AppState,
    error::ApiError,
    extractors::{ApiJson, ApiQuery},
    middleware::AuthUser,
};
use adbudget_core::planning::{BudgetAmounts, BudgetInput};
use adbudget_db::{BudgetRepository, entities::budgets, repositories::EntryFilter};
use adbudget_shared::types::{BudgetId, CampaignId};

/// Creates the budget routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/budgets", get(list_budgets).post(create_budget))
        .route(
            "/budgets/{budget_id}",
            get(get_budget).put(update_budget).delete(delete_budget),
        )
}

/// Response for a budget row.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetResponse {
    /// Budget ID.
    pub id: BudgetId,
    /// Campaign ID.
    pub campaign_id: CampaignId,
    /// Year.
    pub year: i32,
    /// Month.
    pub month: i32,
    /// Platform.
    pub platform: String,
    /// Operation type.
    pub operation_type: String,
    /// Budget type.
    pub budget_type: String,
    /// Planned amount.
    pub amount: Decimal,
    /// Target KPI name.
    pub target_kpi: Option<String>,
    /// Target KPI value.
    pub target_value: Option<Decimal>,
    /// Last update timestamp.
    pub updated_at: DateTime<FixedOffset>,
}

impl From<budgets::Model> for BudgetResponse {
    fn from(model: budgets::Model) -> Self {
        Self {
            id: BudgetId::from_uuid(model.id),
            campaign_id: CampaignId::from_uuid(model.campaign_id),
            year: model.year,
            month: model.month,
            platform: model.platform,
            operation_type: model.operation_type,
            budget_type: model.budget_type,
            amount: model.amount,
            target_kpi: model.target_kpi,
            target_value: model.target_value,
            updated_at: model.updated_at,
        }
    }
}

/// GET `/budgets` - List budgets matching the filter.
async fn list_budgets(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiQuery(filter): ApiQuery<EntryFilter>,
) -> Result<Json<Vec<BudgetResponse>>, ApiError> {
    let repo = BudgetRepository::new((*state.db).clone());
    let rows = repo.list(&filter).await?;
    Ok(Json(rows.into_iter().map(BudgetResponse::from).collect()))
}

/// GET `/budgets/{budget_id}` - Get a budget.
async fn get_budget(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(budget_id): Path<BudgetId>,
) -> Result<Json<BudgetResponse>, ApiError> {
    let repo = BudgetRepository::new((*state.db).clone());
    Ok(Json(repo.get(budget_id).await?.into()))
}

/// POST `/budgets` - Create a budget; 409 if the composite key is taken.
async fn create_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<BudgetInput>,
) -> Result<(StatusCode, Json<BudgetResponse>), ApiError> {
    auth.require_write()?;
    let input = payload.validated()?;

    let repo = BudgetRepository::new((*state.db).clone());
    let budget = repo.create(input).await?;

    info!(budget_id = %budget.id, campaign_id = %budget.campaign_id, "Budget created");
    Ok((StatusCode::CREATED, Json(budget.into())))
}

/// PUT `/budgets/{budget_id}` - Replace the amount and KPI target.
async fn update_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(budget_id): Path<BudgetId>,
    ApiJson(payload): ApiJson<BudgetAmounts>,
) -> Result<Json<BudgetResponse>, ApiError> {
    auth.require_write()?;
    let amounts = payload.validated()?;

    let repo = BudgetRepository::new((*state.db).clone());
    let budget = repo.update(budget_id, amounts).await?;

    info!(budget_id = %budget_id, "Budget updated");
    Ok(Json(budget.into()))
}

/// DELETE `/budgets/{budget_id}` - Delete a budget.
async fn delete_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(budget_id): Path<BudgetId>,
) -> Result<StatusCode, ApiError> {
    auth.require_write()?;

    let repo = BudgetRepository::new((*state.db).clone());
    repo.delete(budget_id).await?;

    info!(budget_id = %budget_id, "Budget deleted");
    Ok(StatusCode::NO_CONTENT)
}
