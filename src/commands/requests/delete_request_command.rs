use crate::{
    commands::Command,
    db::DbPool,
    entities::{
        purchase_request::{self, RequestStatus},
        request_item,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use sea_orm::{ColumnTrait, EntityTrait, ModelTrait, QueryFilter, TransactionError, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

/// Removes a request that never reached an approval decision. Items go with
/// it; once any decision is recorded the request is part of the audit trail
/// and can no longer be deleted.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct DeleteRequestCommand {
    pub id: Uuid,
    pub actor_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteRequestResult {
    pub id: Uuid,
}

#[async_trait::async_trait]
impl Command for DeleteRequestCommand {
    type Result = DeleteRequestResult;

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

        db.transaction::<_, (), ServiceError>(move |txn| {
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
                        action: "delete",
                    });
                }

                request_item::Entity::delete_many()
                    .filter(request_item::Column::RequestId.eq(id))
                    .exec(txn)
                    .await
                    .map_err(ServiceError::db_error)?;

                request
                    .delete(txn)
                    .await
                    .map_err(ServiceError::db_error)?;

                Ok(())
            })
        })
        .await
        .map_err(|e| match e {
            TransactionError::Connection(db_err) => ServiceError::db_error(db_err),
            TransactionError::Transaction(service_err) => service_err,
        })?;

        info!(request_id = %id, actor = %self.actor_id, "Purchase request deleted");

        event_sender
            .send(Event::RequestDeleted(id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(DeleteRequestResult { id })
    }
}
