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
pub struct RejectRequestCommand {
    pub id: Uuid,
    pub approver_id: Uuid,
    #[validate(length(min = 1, max = 500, message = "Rejection reason is required"))]
    pub reason: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RejectRequestResult {
    pub id: Uuid,
    pub status: String,
}

#[async_trait::async_trait]
impl Command for RejectRequestCommand {
    type Result = RejectRequestResult;

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
        let reason = self.reason.clone();

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
                            action: "reject",
                        });
                    }

                    // The rejection reason is appended to the request notes
                    // so the requester sees it alongside their own remarks.
                    let notes = match &request.notes {
                        Some(existing) => format!("{}\nRejected: {}", existing, reason),
                        None => format!("Rejected: {}", reason),
                    };

                    let mut active: purchase_request::ActiveModel = request.into();
                    active.status = Set(RequestStatus::Rejected.as_str().to_string());
                    active.approved_by = Set(Some(approver_id));
                    active.confirmed_at = Set(Some(Utc::now()));
                    active.notes = Set(Some(notes));
                    active.updated_at = Set(Utc::now());

                    active.update(txn).await.map_err(ServiceError::db_error)
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(db_err) => ServiceError::db_error(db_err),
                TransactionError::Transaction(service_err) => service_err,
            })?;

        info!(request_id = %updated.id, approver = %approver_id, "Purchase request rejected");

        event_sender
            .send(Event::RequestRejected {
                request_id: updated.id,
                request_number: updated.request_number,
                requester_id: updated.requester_id,
                reason: self.reason.clone(),
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(RejectRequestResult {
            id: updated.id,
            status: updated.status,
        })
    }
}
