use crate::{
    commands::movements::record_movement_command::{
        latest_destination, RecordMovementCommand, RecordMovementResult,
    },
    commands::Command,
    db::DbPool,
    entities::{
        lot::{self, LotStatus},
        lot_movement::{self, DEFAULT_LOCATION},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionError, TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Service for lots and their movement ledger
#[derive(Clone)]
pub struct LotService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl LotService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Gets a lot by ID
    #[instrument(skip(self))]
    pub async fn get_lot(&self, id: Uuid) -> Result<lot::Model, ServiceError> {
        let db = &*self.db_pool;
        lot::Entity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Lot {} not found", id)))
    }

    /// Lists lots newest first
    #[instrument(skip(self))]
    pub async fn list_lots(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<lot::Model>, u64), ServiceError> {
        let db = &*self.db_pool;

        let paginator = lot::Entity::find()
            .order_by_desc(lot::Column::CreatedAt)
            .paginate(db, per_page);
        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::db_error)?;
        let lots = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;

        Ok((lots, total))
    }

    /// Appends a movement ledger entry for a lot
    #[instrument(skip(self))]
    pub async fn record_movement(
        &self,
        command: RecordMovementCommand,
    ) -> Result<RecordMovementResult, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    /// Current location of a lot, derived from the ledger. A lot with no
    /// entries sits at the default receiving yard. Never materialized as
    /// mutable state.
    #[instrument(skip(self))]
    pub async fn current_location(&self, lot_id: Uuid) -> Result<String, ServiceError> {
        let db = &*self.db_pool;

        // Existence check first so an unknown lot is a NotFound, not a
        // phantom lot sitting in the yard.
        lot::Entity::find_by_id(lot_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Lot {} not found", lot_id)))?;

        Ok(latest_destination(db, lot_id)
            .await?
            .unwrap_or_else(|| DEFAULT_LOCATION.to_string()))
    }

    /// Full movement history of a lot, newest first
    #[instrument(skip(self))]
    pub async fn movement_history(
        &self,
        lot_id: Uuid,
    ) -> Result<Vec<lot_movement::Model>, ServiceError> {
        let db = &*self.db_pool;

        lot::Entity::find_by_id(lot_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Lot {} not found", lot_id)))?;

        lot_movement::Entity::find()
            .filter(lot_movement::Column::LotId.eq(lot_id))
            .order_by_desc(lot_movement::Column::MovedAt)
            .order_by_desc(lot_movement::Column::Id)
            .all(db)
            .await
            .map_err(ServiceError::db_error)
    }

    /// Records the inspection decision on an open lot. Open lots can move to
    /// approved or rejected; both are terminal for the lot lifecycle.
    #[instrument(skip(self))]
    pub async fn set_status(
        &self,
        lot_id: Uuid,
        new_status: LotStatus,
    ) -> Result<lot::Model, ServiceError> {
        let db = &*self.db_pool;

        let updated = db
            .transaction::<_, lot::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let lot = lot::Entity::find_by_id(lot_id)
                        .one(txn)
                        .await
                        .map_err(ServiceError::db_error)?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Lot {} not found", lot_id))
                        })?;

                    let allowed = lot.status == LotStatus::Open.as_str()
                        && matches!(new_status, LotStatus::Approved | LotStatus::Rejected);
                    if !allowed {
                        return Err(ServiceError::InvalidTransition {
                            id: lot_id,
                            status: lot.status,
                            action: "update status of",
                        });
                    }

                    let old_status = lot.status.clone();
                    let mut active: lot::ActiveModel = lot.into();
                    active.status = Set(new_status.as_str().to_string());
                    active.updated_at = Set(Utc::now());
                    let updated = active.update(txn).await.map_err(ServiceError::db_error)?;

                    info!(lot_id = %lot_id, from = %old_status, to = %new_status, "Lot status changed");
                    Ok(updated)
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(db_err) => ServiceError::db_error(db_err),
                TransactionError::Transaction(service_err) => service_err,
            })?;

        self.event_sender
            .send(Event::LotStatusChanged {
                lot_id,
                old_status: LotStatus::Open.as_str().to_string(),
                new_status: updated.status.clone(),
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(updated)
    }
}
