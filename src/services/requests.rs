use crate::{
    commands::requests::{
        approve_request_command::{ApproveRequestCommand, ApproveRequestResult},
        create_request_command::{CreatePurchaseRequestCommand, CreatePurchaseRequestResult},
        delete_request_command::DeleteRequestCommand,
        receive_request_command::{ReceiveRequestCommand, ReceiveRequestResult},
        reject_request_command::{RejectRequestCommand, RejectRequestResult},
    },
    commands::Command,
    db::DbPool,
    entities::{purchase_request, request_item},
    errors::ServiceError,
    events::EventSender,
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Service for the purchase request lifecycle
#[derive(Clone)]
pub struct RequestService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl RequestService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Submits a new purchase request with its priced items
    #[instrument(skip(self, command))]
    pub async fn create_request(
        &self,
        command: CreatePurchaseRequestCommand,
    ) -> Result<CreatePurchaseRequestResult, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    /// Approves a pending purchase request
    #[instrument(skip(self))]
    pub async fn approve_request(
        &self,
        command: ApproveRequestCommand,
    ) -> Result<ApproveRequestResult, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    /// Rejects a pending purchase request
    #[instrument(skip(self))]
    pub async fn reject_request(
        &self,
        command: RejectRequestCommand,
    ) -> Result<RejectRequestResult, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    /// Receives an approved request, materializing its lot
    #[instrument(skip(self))]
    pub async fn receive_request(
        &self,
        command: ReceiveRequestCommand,
    ) -> Result<ReceiveRequestResult, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    /// Deletes a pending request together with its items
    #[instrument(skip(self))]
    pub async fn delete_request(&self, command: DeleteRequestCommand) -> Result<(), ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await?;
        Ok(())
    }

    /// Gets a purchase request with its items
    #[instrument(skip(self))]
    pub async fn get_request(
        &self,
        id: Uuid,
    ) -> Result<(purchase_request::Model, Vec<request_item::Model>), ServiceError> {
        let db = &*self.db_pool;

        let request = purchase_request::Entity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Purchase request {} not found", id)))?;

        let items = request_item::Entity::find()
            .filter(request_item::Column::RequestId.eq(id))
            .order_by_asc(request_item::Column::CreatedAt)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok((request, items))
    }

    /// Lists purchase requests, optionally filtered by status, newest first
    #[instrument(skip(self))]
    pub async fn list_requests(
        &self,
        status: Option<String>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<purchase_request::Model>, u64), ServiceError> {
        let db = &*self.db_pool;

        let mut query = purchase_request::Entity::find()
            .order_by_desc(purchase_request::Column::CreatedAt);
        if let Some(status) = status {
            query = query.filter(purchase_request::Column::Status.eq(status));
        }

        let paginator = query.paginate(db, per_page);
        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::db_error)?;
        let requests = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;

        Ok((requests, total))
    }
}
