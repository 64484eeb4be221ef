use crate::{
    commands::Command,
    db::DbPool,
    entities::{
        lot::{self, LotStatus},
        purchase_request::{self, RequestStatus},
        request_item,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr, TransactionError, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ReceiveRequestCommand {
    pub id: Uuid,
    pub receiver_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReceiveRequestResult {
    pub request_id: Uuid,
    pub lot_id: Uuid,
    pub lot_number: String,
    pub total_weight_kg: Decimal,
    pub total_value: Decimal,
    pub item_count: i32,
}

struct ReceivedRequest {
    request: purchase_request::Model,
    lot: lot::Model,
}

#[async_trait::async_trait]
impl Command for ReceiveRequestCommand {
    type Result = ReceiveRequestResult;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = db_pool.as_ref();
        let received = self.receive(db).await?;

        info!(
            request_id = %received.request.id,
            lot_id = %received.lot.id,
            lot_number = %received.lot.lot_number,
            total_value = %received.lot.total_value,
            "Purchase request received into inventory"
        );

        event_sender
            .send(Event::RequestReceived {
                request_id: received.request.id,
                request_number: received.request.request_number.clone(),
                requester_id: received.request.requester_id,
                lot_id: received.lot.id,
                lot_number: received.lot.lot_number.clone(),
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(ReceiveRequestResult {
            request_id: received.request.id,
            lot_id: received.lot.id,
            lot_number: received.lot.lot_number,
            total_weight_kg: received.lot.total_weight_kg,
            total_value: received.lot.total_value,
            item_count: received.lot.item_count,
        })
    }
}

impl ReceiveRequestCommand {
    fn generate_lot_number() -> String {
        format!("LOT-{}", Uuid::new_v4().simple())
    }

    /// Materializes the lot and back-links the items, all-or-nothing.
    ///
    /// The status check runs inside the transaction and the unique index on
    /// `lots.request_id` backs it up: when two receive calls race, exactly
    /// one lot exists afterwards and the loser surfaces `AlreadyReceived`.
    async fn receive(&self, db: &DbPool) -> Result<ReceivedRequest, ServiceError> {
        let id = self.id;

        db.transaction::<_, ReceivedRequest, ServiceError>(move |txn| {
            Box::pin(async move {
                let request = purchase_request::Entity::find_by_id(id)
                    .one(txn)
                    .await
                    .map_err(ServiceError::db_error)?
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!("Purchase request {} not found", id))
                    })?;

                match RequestStatus::parse(&request.status) {
                    Some(RequestStatus::Approved) => {}
                    Some(RequestStatus::Received) => {
                        return Err(ServiceError::AlreadyReceived(id));
                    }
                    _ => {
                        return Err(ServiceError::InvalidTransition {
                            id,
                            status: request.status,
                            action: "receive",
                        });
                    }
                }

                let items = request_item::Entity::find()
                    .filter(request_item::Column::RequestId.eq(id))
                    .order_by_asc(request_item::Column::CreatedAt)
                    .all(txn)
                    .await
                    .map_err(ServiceError::db_error)?;

                let first = items.first().ok_or_else(|| {
                    ServiceError::InternalError(format!("Request {} has no items", id))
                })?;

                // Aggregates are sums of the item snapshots, never a fresh
                // pricing pass.
                let total_weight_kg: Decimal = items.iter().map(|i| i.weight_kg).sum();
                let total_value: Decimal = items.iter().map(|i| i.total_value).sum();

                let now = Utc::now();
                let new_lot = lot::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    lot_number: Set(Self::generate_lot_number()),
                    request_id: Set(request.id),
                    supplier_id: Set(request.supplier_id),
                    material_type_id: Set(first.material_type_id),
                    classification: Set(first.classification.clone()),
                    total_weight_kg: Set(total_weight_kg),
                    total_value: Set(total_value),
                    item_count: Set(items.len() as i32),
                    status: Set(LotStatus::Open.as_str().to_string()),
                    created_at: Set(now),
                    updated_at: Set(now),
                };

                let saved_lot = new_lot.insert(txn).await.map_err(|e| {
                    if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                        ServiceError::AlreadyReceived(id)
                    } else {
                        ServiceError::db_error(e)
                    }
                })?;

                request_item::Entity::update_many()
                    .col_expr(request_item::Column::LotId, Expr::value(saved_lot.id))
                    .filter(request_item::Column::RequestId.eq(id))
                    .exec(txn)
                    .await
                    .map_err(ServiceError::db_error)?;

                let mut active: purchase_request::ActiveModel = request.into();
                active.status = Set(RequestStatus::Received.as_str().to_string());
                active.updated_at = Set(now);
                let updated_request =
                    active.update(txn).await.map_err(ServiceError::db_error)?;

                Ok(ReceivedRequest {
                    request: updated_request,
                    lot: saved_lot,
                })
            })
        })
        .await
        .map_err(|e| match e {
            TransactionError::Connection(db_err) => ServiceError::db_error(db_err),
            TransactionError::Transaction(service_err) => service_err,
        })
    }
}
