//! Bulk CSV import of budgets and results.

use axum::{Json, Router, body::Bytes, extract::State, routing::post};
use tracing::info;

use crate::{AppState, error::ApiError, middleware::AuthUser};
use adbudget_core::transfer::{ImportSummary, parse_import};
use adbudget_db::ImportRepository;

/// Creates the import routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/import", post(import_csv))
}

/// POST `/import` - Upsert budgets and results from a CSV body.
///
/// Row-level problems are reported in the summary; only an unreadable file
/// fails the whole request.
async fn import_csv(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Bytes,
) -> Result<Json<ImportSummary>, ApiError> {
    auth.require_write()?;
    let parsed = parse_import(&body)?;

    let repo = ImportRepository::new((*state.db).clone());
    let summary = repo.apply(parsed).await?;

    info!(
        user_id = %auth.user_id(),
        errors = summary.errors.len(),
        "CSV import finished"
    );
    Ok(Json(summary))
}
