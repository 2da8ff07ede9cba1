//! Client management routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use tracing::info;

use crate::{
    AppState,
    error::ApiError,
    extractors::{ApiJson, ApiQuery},
    middleware::AuthUser,
};
use adbudget_core::planning::ClientInput;
use adbudget_db::{ClientRepository, entities::clients};
use adbudget_shared::Role;
use adbudget_shared::types::{ClientId, PageRequest, PageResponse};

/// Creates the client routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/clients", get(list_clients).post(create_client))
        .route(
            "/clients/{client_id}",
            get(get_client).put(update_client).delete(delete_client),
        )
}

/// Response for a client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientResponse {
    /// Client ID.
    pub id: ClientId,
    /// Client name.
    pub name: String,
    /// Department label.
    pub department: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<FixedOffset>,
    /// Last update timestamp.
    pub updated_at: DateTime<FixedOffset>,
}

impl From<clients::Model> for ClientResponse {
    fn from(model: clients::Model) -> Self {
        Self {
            id: ClientId::from_uuid(model.id),
            name: model.name,
            department: model.department,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// GET `/clients` - List clients.
async fn list_clients(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiQuery(page): ApiQuery<PageRequest>,
) -> Result<Json<PageResponse<ClientResponse>>, ApiError> {
    let page = page.normalized();
    let repo = ClientRepository::new((*state.db).clone());

    let (rows, total) = repo.list(&page).await?;
    let response = PageResponse::new(rows, page.page, page.per_page, total);
    Ok(Json(response.map(ClientResponse::from)))
}

/// GET `/clients/{client_id}` - Get a client.
async fn get_client(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(client_id): Path<ClientId>,
) -> Result<Json<ClientResponse>, ApiError> {
    let repo = ClientRepository::new((*state.db).clone());
    Ok(Json(repo.get(client_id).await?.into()))
}

/// POST `/clients` - Create a client.
async fn create_client(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<ClientInput>,
) -> Result<(StatusCode, Json<ClientResponse>), ApiError> {
    auth.require_write()?;
    let input = payload.validated()?;

    let repo = ClientRepository::new((*state.db).clone());
    let client = repo.create(input).await?;

    info!(client_id = %client.id, user_id = %auth.user_id(), "Client created");
    Ok((StatusCode::CREATED, Json(client.into())))
}

/// PUT `/clients/{client_id}` - Replace a client's name and department.
async fn update_client(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(client_id): Path<ClientId>,
    ApiJson(payload): ApiJson<ClientInput>,
) -> Result<Json<ClientResponse>, ApiError> {
    auth.require_write()?;
    let input = payload.validated()?;

    let repo = ClientRepository::new((*state.db).clone());
    let client = repo.update(client_id, input).await?;

    info!(client_id = %client_id, "Client updated");
    Ok(Json(client.into()))
}

/// DELETE `/clients/{client_id}` - Delete a client without campaigns (admin only).
async fn delete_client(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(client_id): Path<ClientId>,
) -> Result<StatusCode, ApiError> {
    auth.require(Role::Admin)?;

    let repo = ClientRepository::new((*state.db).clone());
    repo.delete(client_id).await?;

    info!(client_id = %client_id, user_id = %auth.user_id(), "Client deleted");
    Ok(StatusCode::NO_CONTENT)
}
