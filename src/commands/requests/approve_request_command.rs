use crate::{
    commands::Command,
    db::DbPool,
    entities::purchase_request::{self, RequestStatus},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set, TransactionError, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ApproveRequestCommand {
    pub id: Uuid,
    pub approver_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApproveRequestResult {
    pub id: Uuid,
    pub status: String,
}

#[async_trait::async_trait]
impl Command for ApproveRequestCommand {
    type Result = ApproveRequestResult;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = db_pool.as_ref();
        let id = self.id;
        let approver_id = self.approver_id;

        let updated = db
            .transaction::<_, purchase_request::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let request = purchase_request::Entity::find_by_id(id)
                        .one(txn)
                        .await
                        .map_err(ServiceError::db_error)?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Purchase request {} not found", id))
                        })?;

                    if request.status != RequestStatus::Pending.as_str() {
                        return Err(ServiceError::InvalidTransition {
                            id,
                            status: request.status,
                            action: "approve",
                        });
                    }

                    let mut active: purchase_request::ActiveModel = request.into();
                    active.status = Set(RequestStatus::Approved.as_str().to_string());
                    active.approved_by = Set(Some(approver_id));
                    active.confirmed_at = Set(Some(Utc::now()));
                    active.updated_at = Set(Utc::now());

                    active.update(txn).await.map_err(ServiceError::db_error)
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(db_err) => ServiceError::db_error(db_err),
                TransactionError::Transaction(service_err) => service_err,
            })?;

        info!(request_id = %updated.id, approver = %approver_id, "Purchase request approved");

        event_sender
            .send(Event::RequestApproved {
                request_id: updated.id,
                request_number: updated.request_number,
                requester_id: updated.requester_id,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(ApproveRequestResult {
            id: updated.id,
            status: updated.status,
        })
    }
}
