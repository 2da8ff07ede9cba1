//! Client repository.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use adbudget_core::planning::ClientInput;
use adbudget_shared::AppError;
use adbudget_shared::types::{ClientId, PageRequest};

use crate::entities::{campaigns, clients};

/// Error types for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Client not found.
    #[error("Client not found: {0}")]
    NotFound(ClientId),

    /// Client still owns campaigns.
    #[error("Client still has {0} campaign(s)")]
    HasCampaigns(u64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::NotFound(_) => Self::NotFound(err.to_string()),
            ClientError::HasCampaigns(_) => Self::Conflict(err.to_string()),
            ClientError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Client repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    db: DatabaseConnection,
}

impl ClientRepository {
    /// Creates a new client repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists clients ordered by name, one page at a time.
    ///
    /// Returns the page and the total number of clients.
    pub async fn list(&self, page: &PageRequest) -> Result<(Vec<clients::Model>, u64), ClientError> {
        let page = page.normalized();
        let total = clients::Entity::find().count(&self.db).await?;

        let rows = clients::Entity::find()
            .order_by_asc(clients::Column::Name)
            .order_by_asc(clients::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((rows, total))
    }

    /// Finds a client by ID.
    pub async fn find_by_id(&self, id: ClientId) -> Result<Option<clients::Model>, ClientError> {
        let client = clients::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?;
        Ok(client)
    }

    /// Gets a client by ID or fails with [`ClientError::NotFound`].
    pub async fn get(&self, id: ClientId) -> Result<clients::Model, ClientError> {
        self.find_by_id(id).await?.ok_or(ClientError::NotFound(id))
    }

    /// Creates a client from already validated input.
    pub async fn create(&self, input: ClientInput) -> Result<clients::Model, ClientError> {
        let now = chrono::Utc::now().into();
        let client = clients::ActiveModel {
            id: Set(ClientId::new().into_inner()),
            name: Set(input.name),
            department: Set(input.department),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(client.insert(&self.db).await?)
    }

    /// Replaces a client's name and department.
    pub async fn update(&self, id: ClientId, input: ClientInput) -> Result<clients::Model, ClientError> {
        let client = self.get(id).await?;

        let mut active: clients::ActiveModel = client.into();
        active.name = Set(input.name);
        active.department = Set(input.department);
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a client that no campaign references.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Client not found
    /// - Client still has campaigns
    pub async fn delete(&self, id: ClientId) -> Result<(), ClientError> {
        let client = self.get(id).await?;

        let campaign_count = campaigns::Entity::find()
            .filter(campaigns::Column::ClientId.eq(client.id))
            .count(&self.db)
            .await?;
        if campaign_count > 0 {
            return Err(ClientError::HasCampaigns(campaign_count));
        }

        clients::Entity::delete_by_id(client.id).exec(&self.db).await?;
        Ok(())
    }
}
