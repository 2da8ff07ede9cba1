//! Campaign management routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    AppState,
    error::ApiError,
    extractors::{ApiJson, ApiQuery},
    middleware::AuthUser,
};
use adbudget_core::planning::{CampaignDetails, CampaignInput};
use adbudget_db::{CampaignRepository, repositories::CampaignWithClient};
use adbudget_shared::types::{CampaignId, ClientId, PageRequest, PageResponse};

/// Creates the campaign routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/campaigns", get(list_campaigns).post(create_campaign))
        .route(
            "/campaigns/{campaign_id}",
            get(get_campaign).put(update_campaign).delete(delete_campaign),
        )
}

/// Query parameters for listing campaigns.
#[derive(Debug, Deserialize)]
pub struct ListCampaignsQuery {
    /// Restrict to one client.
    #[serde(alias = "clientId")]
    pub client_id: Option<ClientId>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

/// Client fields embedded in a campaign response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignClient {
    /// Client ID.
    pub id: ClientId,
    /// Client name.
    pub name: String,
    /// Department label.
    pub department: Option<String>,
}

/// Response for a campaign.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignResponse {
    /// Campaign ID.
    pub id: CampaignId,
    /// Owning client ID.
    pub client_id: ClientId,
    /// Campaign name.
    pub name: String,
    /// Overall campaign budget.
    pub total_budget: Decimal,
    /// Start year.
    pub start_year: i32,
    /// Start month.
    pub start_month: i32,
    /// End year.
    pub end_year: Option<i32>,
    /// End month.
    pub end_month: Option<i32>,
    /// Owning client.
    pub client: CampaignClient,
}

impl From<CampaignWithClient> for CampaignResponse {
    fn from(row: CampaignWithClient) -> Self {
        let CampaignWithClient { campaign, client } = row;
        Self {
            id: CampaignId::from_uuid(campaign.id),
            client_id: ClientId::from_uuid(campaign.client_id),
            name: campaign.name,
            total_budget: campaign.total_budget,
            start_year: campaign.start_year,
            start_month: campaign.start_month,
            end_year: campaign.end_year,
            end_month: campaign.end_month,
            client: CampaignClient {
                id: ClientId::from_uuid(client.id),
                name: client.name,
                department: client.department,
            },
        }
    }
}

/// GET `/campaigns` - List campaigns, optionally for one client.
async fn list_campaigns(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiQuery(query): ApiQuery<ListCampaignsQuery>,
) -> Result<Json<PageResponse<CampaignResponse>>, ApiError> {
    let defaults = PageRequest::default();
    let page = PageRequest {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    }
    .normalized();

    let repo = CampaignRepository::new((*state.db).clone());
    let (rows, total) = repo.list(query.client_id, &page).await?;

    let response = PageResponse::new(rows, page.page, page.per_page, total);
    Ok(Json(response.map(CampaignResponse::from)))
}

/// GET `/campaigns/{campaign_id}` - Get a campaign with its client.
async fn get_campaign(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(campaign_id): Path<CampaignId>,
) -> Result<Json<CampaignResponse>, ApiError> {
    let repo = CampaignRepository::new((*state.db).clone());
    Ok(Json(repo.get(campaign_id).await?.into()))
}

/// POST `/campaigns` - Create a campaign under an existing client.
async fn create_campaign(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<CampaignInput>,
) -> Result<(StatusCode, Json<CampaignResponse>), ApiError> {
    auth.require_write()?;
    let input = payload.validated()?;

    let repo = CampaignRepository::new((*state.db).clone());
    let created = repo.create(input).await?;

    info!(
        campaign_id = %created.campaign.id,
        client_id = %created.client.id,
        "Campaign created"
    );
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// PUT `/campaigns/{campaign_id}` - Replace a campaign's editable fields.
async fn update_campaign(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(campaign_id): Path<CampaignId>,
    ApiJson(payload): ApiJson<CampaignDetails>,
) -> Result<Json<CampaignResponse>, ApiError> {
    auth.require_write()?;
    let details = payload.validated()?;

    let repo = CampaignRepository::new((*state.db).clone());
    let updated = repo.update(campaign_id, details).await?;

    info!(campaign_id = %campaign_id, "Campaign updated");
    Ok(Json(updated.into()))
}

/// DELETE `/campaigns/{campaign_id}` - Delete a campaign with its budgets and results.
async fn delete_campaign(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(campaign_id): Path<CampaignId>,
) -> Result<StatusCode, ApiError> {
    auth.require_write()?;

    let repo = CampaignRepository::new((*state.db).clone());
    repo.delete(campaign_id).await?;

    info!(campaign_id = %campaign_id, user_id = %auth.user_id(), "Campaign deleted");
    Ok(StatusCode::NO_CONTENT)
}
