//! Campaign repository.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use adbudget_core::planning::{CampaignDetails, CampaignInput};
use adbudget_shared::AppError;
use adbudget_shared::types::{CampaignId, ClientId, PageRequest};

use crate::entities::{campaigns, clients};

/// Error types for campaign operations.
#[derive(Debug, thiserror::Error)]
pub enum CampaignError {
    /// Campaign not found.
    #[error("Campaign not found: {0}")]
    NotFound(CampaignId),

    /// Owning client does not exist.
    #[error("Client not found: {0}")]
    ClientNotFound(ClientId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<CampaignError> for AppError {
    fn from(err: CampaignError) -> Self {
        match err {
            CampaignError::NotFound(_) => Self::NotFound(err.to_string()),
            CampaignError::ClientNotFound(_) => Self::Validation(err.to_string()),
            CampaignError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// A campaign together with its owning client.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignWithClient {
    /// Campaign row.
    pub campaign: campaigns::Model,
    /// Client row.
    pub client: clients::Model,
}

/// Campaign repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CampaignRepository {
    db: DatabaseConnection,
}

impl CampaignRepository {
    /// Creates a new campaign repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists campaigns with their clients, optionally restricted to one client.
    pub async fn list(
        &self,
        client_id: Option<ClientId>,
        page: &PageRequest,
    ) -> Result<(Vec<CampaignWithClient>, u64), CampaignError> {
        let page = page.normalized();

        let mut count_query = campaigns::Entity::find();
        let mut query = campaigns::Entity::find()
            .find_also_related(clients::Entity)
            .order_by_desc(campaigns::Column::StartYear)
            .order_by_desc(campaigns::Column::StartMonth)
            .order_by_asc(campaigns::Column::Name);

        if let Some(client_id) = client_id {
            count_query = count_query.filter(campaigns::Column::ClientId.eq(client_id.into_inner()));
            query = query.filter(campaigns::Column::ClientId.eq(client_id.into_inner()));
        }

        let total = count_query.count(&self.db).await?;
        let rows = query
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        let items = rows
            .into_iter()
            .filter_map(|(campaign, client)| {
                client.map(|client| CampaignWithClient { campaign, client })
            })
            .collect();

        Ok((items, total))
    }

    /// Gets a campaign and its client.
    pub async fn get(&self, id: CampaignId) -> Result<CampaignWithClient, CampaignError> {
        let (campaign, client) = campaigns::Entity::find_by_id(id.into_inner())
            .find_also_related(clients::Entity)
            .one(&self.db)
            .await?
            .ok_or(CampaignError::NotFound(id))?;

        let client = client.ok_or(CampaignError::NotFound(id))?;
        Ok(CampaignWithClient { campaign, client })
    }

    /// Returns true if the campaign exists.
    pub async fn exists(&self, id: CampaignId) -> Result<bool, CampaignError> {
        let count = campaigns::Entity::find_by_id(id.into_inner())
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    /// Creates a campaign under an existing client.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Client not found
    pub async fn create(&self, input: CampaignInput) -> Result<CampaignWithClient, CampaignError> {
        let client = clients::Entity::find_by_id(input.client_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(CampaignError::ClientNotFound(input.client_id))?;

        let now = chrono::Utc::now().into();
        let details = input.details;
        let campaign = campaigns::ActiveModel {
            id: Set(CampaignId::new().into_inner()),
            client_id: Set(client.id),
            name: Set(details.name),
            total_budget: Set(details.total_budget),
            start_year: Set(details.start_year),
            start_month: Set(month_column(details.start_month)),
            end_year: Set(details.end_year),
            end_month: Set(details.end_month.map(month_column)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let campaign = campaign.insert(&self.db).await?;
        Ok(CampaignWithClient { campaign, client })
    }

    /// Replaces a campaign's editable fields. The owning client is fixed.
    pub async fn update(
        &self,
        id: CampaignId,
        details: CampaignDetails,
    ) -> Result<CampaignWithClient, CampaignError> {
        let current = self.get(id).await?;

        let mut active: campaigns::ActiveModel = current.campaign.into();
        active.name = Set(details.name);
        active.total_budget = Set(details.total_budget);
        active.start_year = Set(details.start_year);
        active.start_month = Set(month_column(details.start_month));
        active.end_year = Set(details.end_year);
        active.end_month = Set(details.end_month.map(month_column));
        active.updated_at = Set(chrono::Utc::now().into());

        let campaign = active.update(&self.db).await?;
        Ok(CampaignWithClient {
            campaign,
            client: current.client,
        })
    }

    /// Deletes a campaign. Its budgets and results go with it (`ON DELETE CASCADE`).
    pub async fn delete(&self, id: CampaignId) -> Result<(), CampaignError> {
        let result = campaigns::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(CampaignError::NotFound(id));
        }
        Ok(())
    }
}

/// Months are validated to 1-12 before they get here.
pub(crate) fn month_column(month: u32) -> i32 {
    i32::try_from(month).unwrap_or(i32::MAX)
}
