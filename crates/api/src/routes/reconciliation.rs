//! Reconciliation routes: merged budget/result report, CSV export and breakdowns.

use axum::{
    Json, Router,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{AppState, error::ApiError, extractors::ApiQuery, middleware::AuthUser};
use adbudget_core::reconciliation::{
    BreakdownDimension, BreakdownRow, ReconcileFilter, ReconciliationReport,
    ReconciliationService, breakdown,
};
use adbudget_core::transfer::export_csv;
use adbudget_db::ReconciliationRepository;
use adbudget_shared::types::{ClientId, KeyGranularity};

/// Creates the reconciliation routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reconciliation", get(get_report))
        .route("/reconciliation/export", get(export_report))
        .route("/reconciliation/breakdown", get(get_breakdown))
}

/// Query parameters shared by every reconciliation endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ReconcileQuery {
    /// Calendar year.
    pub year: Option<i32>,
    /// Calendar month.
    pub month: Option<u32>,
    /// Owning client.
    #[serde(alias = "clientId")]
    pub client_id: Option<ClientId>,
    /// Platform.
    pub platform: Option<String>,
    /// Operation type.
    #[serde(alias = "operationType")]
    pub operation_type: Option<String>,
    /// Client department.
    pub department: Option<String>,
    /// Key granularity; falls back to the configured default.
    pub granularity: Option<KeyGranularity>,
    /// Breakdown dimension (breakdown endpoint only).
    pub by: Option<BreakdownDimension>,
}

impl ReconcileQuery {
    fn filter(&self) -> Result<ReconcileFilter, ApiError> {
        let filter = ReconcileFilter {
            year: self.year,
            month: self.month,
            client_id: self.client_id,
            platform: self.platform.clone(),
            operation_type: self.operation_type.clone(),
            department: self.department.clone(),
        }
        .normalized();
        filter.validate()?;
        Ok(filter)
    }
}

/// Response for the breakdown endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownResponse {
    /// Grouping dimension.
    pub dimension: BreakdownDimension,
    /// One row per group.
    pub rows: Vec<BreakdownRow>,
}

async fn build_report(state: &AppState, query: &ReconcileQuery) -> Result<ReconciliationReport, ApiError> {
    let filter = query.filter()?;
    let granularity = query.granularity.unwrap_or(state.granularity);

    let repo = ReconciliationRepository::new((*state.db).clone());
    let inputs = repo.fetch(&filter).await?;
    debug!(
        budgets = inputs.budgets.len(),
        results = inputs.results.len(),
        ?granularity,
        "Reconciling"
    );

    Ok(ReconciliationService::report(
        &inputs.budgets,
        &inputs.results,
        granularity,
    ))
}

/// GET `/reconciliation` - Line items and summary for the filter.
async fn get_report(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiQuery(query): ApiQuery<ReconcileQuery>,
) -> Result<Json<ReconciliationReport>, ApiError> {
    Ok(Json(build_report(&state, &query).await?))
}

/// GET `/reconciliation/export` - Line items as a CSV download.
async fn export_report(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<ReconcileQuery>,
) -> Result<Response, ApiError> {
    let report = build_report(&state, &query).await?;
    let body = export_csv(&report.data)?;

    info!(rows = report.data.len(), user_id = %auth.user_id(), "Reconciliation exported");
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"reconciliation.csv\"",
            ),
        ],
        body,
    )
        .into_response())
}

/// GET `/reconciliation/breakdown?by=` - Totals grouped by one dimension.
async fn get_breakdown(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiQuery(query): ApiQuery<ReconcileQuery>,
) -> Result<Json<BreakdownResponse>, ApiError> {
    let dimension = query
        .by
        .ok_or_else(|| ApiError::validation("Query parameter 'by' is required"))?;
    let report = build_report(&state, &query).await?;

    Ok(Json(BreakdownResponse {
        dimension,
        rows: breakdown(&report.data, dimension),
    }))
}
