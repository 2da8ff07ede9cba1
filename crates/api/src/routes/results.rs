//! Result routes: actual spend and outcome per composite key.

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
use adbudget_core::planning::{ResultAmounts, ResultInput};
use adbudget_db::{ResultRepository, entities::results, repositories::EntryFilter};
use adbudget_shared::types::{CampaignId, ResultId};

/// Creates the result routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/results", get(list_results).post(create_result))
        .route(
            "/results/{result_id}",
            get(get_result).put(update_result).delete(delete_result),
        )
}

/// Response for a result row.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultResponse {
    /// Result ID.
    pub id: ResultId,
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
    /// Money actually spent.
    pub actual_spend: Decimal,
    /// Outcome metric.
    pub actual_result: Decimal,
    /// Last update timestamp.
    pub updated_at: DateTime<FixedOffset>,
}

impl From<results::Model> for ResultResponse {
    fn from(model: results::Model) -> Self {
        Self {
            id: ResultId::from_uuid(model.id),
            campaign_id: CampaignId::from_uuid(model.campaign_id),
            year: model.year,
            month: model.month,
            platform: model.platform,
            operation_type: model.operation_type,
            budget_type: model.budget_type,
            actual_spend: model.actual_spend,
            actual_result: model.actual_result,
            updated_at: model.updated_at,
        }
    }
}

/// GET `/results` - List results matching the filter.
async fn list_results(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiQuery(filter): ApiQuery<EntryFilter>,
) -> Result<Json<Vec<ResultResponse>>, ApiError> {
    let repo = ResultRepository::new((*state.db).clone());
    let rows = repo.list(&filter).await?;
    Ok(Json(rows.into_iter().map(ResultResponse::from).collect()))
}

/// GET `/results/{result_id}` - Get a result.
async fn get_result(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(result_id): Path<ResultId>,
) -> Result<Json<ResultResponse>, ApiError> {
    let repo = ResultRepository::new((*state.db).clone());
    Ok(Json(repo.get(result_id).await?.into()))
}

/// POST `/results` - Create a result; 409 if the composite key is taken.
async fn create_result(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<ResultInput>,
) -> Result<(StatusCode, Json<ResultResponse>), ApiError> {
    auth.require_write()?;
    let input = payload.validated()?;

    let repo = ResultRepository::new((*state.db).clone());
    let row = repo.create(input).await?;

    info!(result_id = %row.id, campaign_id = %row.campaign_id, "Result created");
    Ok((StatusCode::CREATED, Json(row.into())))
}

/// PUT `/results/{result_id}` - Replace spend and outcome.
async fn update_result(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(result_id): Path<ResultId>,
    ApiJson(payload): ApiJson<ResultAmounts>,
) -> Result<Json<ResultResponse>, ApiError> {
    auth.require_write()?;
    let amounts = payload.validated()?;

    let repo = ResultRepository::new((*state.db).clone());
    let row = repo.update(result_id, amounts).await?;

    info!(result_id = %result_id, "Result updated");
    Ok(Json(row.into()))
}

/// DELETE `/results/{result_id}` - Delete a result.
async fn delete_result(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(result_id): Path<ResultId>,
) -> Result<StatusCode, ApiError> {
    auth.require_write()?;

    let repo = ResultRepository::new((*state.db).clone());
    repo.delete(result_id).await?;

    info!(result_id = %result_id, "Result deleted");
    Ok(StatusCode::NO_CONTENT)
}
