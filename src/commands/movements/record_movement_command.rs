use crate::{
    commands::Command,
    db::DbPool,
    entities::{
        lot,
        lot_movement::{self, AuditEvent, LocationSnapshot, MovementType, DEFAULT_LOCATION},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionError,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

/// Appends one entry to a lot's movement ledger. The origin is always the
/// derived current location; callers only name the destination.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RecordMovementCommand {
    pub lot_id: Uuid,
    /// One of: transfer, dispatch, return, correction
    pub movement_type: String,
    #[validate(length(min = 1, max = 120))]
    pub destination_location: String,
    pub performed_by: Uuid,
    /// Weight moved; defaults to the lot's aggregate weight
    pub weight_kg: Option<f64>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
    /// Opaque client details from the calling surface, stored on the audit
    /// sub-event
    pub client_metadata: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordMovementResult {
    pub entry_id: i64,
    pub lot_id: Uuid,
    pub origin_location: String,
    pub destination_location: String,
}

#[async_trait::async_trait]
impl Command for RecordMovementCommand {
    type Result = RecordMovementResult;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let movement_type = MovementType::parse(&self.movement_type).ok_or_else(|| {
            ServiceError::ValidationError(format!(
                "Unknown movement type '{}': expected transfer, dispatch, return or correction",
                self.movement_type
            ))
        })?;

        let weight_override = match self.weight_kg {
            Some(raw) => Some(
                Decimal::from_f64_retain(raw)
                    .filter(|w| *w > Decimal::ZERO)
                    .ok_or_else(|| {
                        ServiceError::ValidationError(format!(
                            "Movement weight must be positive, got {}",
                            raw
                        ))
                    })?,
            ),
            None => None,
        };

        let db = db_pool.as_ref();
        let lot_id = self.lot_id;
        let destination = self.destination_location.clone();
        let performed_by = self.performed_by;
        let notes = self.notes.clone();
        let client_metadata = self.client_metadata.clone();

        let (entry, lot_number) = db
            .transaction::<_, (lot_movement::Model, String), ServiceError>(move |txn| {
                Box::pin(async move {
                    let lot = lot::Entity::find_by_id(lot_id)
                        .one(txn)
                        .await
                        .map_err(ServiceError::db_error)?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Lot {} not found", lot_id))
                        })?;

                    // Origin is derived from the ledger inside this same
                    // transaction, so concurrent writers cannot both read a
                    // stale location.
                    let origin = latest_destination(txn, lot_id)
                        .await?
                        .unwrap_or_else(|| DEFAULT_LOCATION.to_string());

                    let weight_kg = weight_override.unwrap_or(lot.total_weight_kg);
                    let now = Utc::now();

                    let before = LocationSnapshot {
                        lot_id: lot.id,
                        lot_number: lot.lot_number.clone(),
                        location: origin.clone(),
                        weight_kg: lot.total_weight_kg,
                    };
                    let after = LocationSnapshot {
                        lot_id: lot.id,
                        lot_number: lot.lot_number.clone(),
                        location: destination.clone(),
                        weight_kg,
                    };
                    let audit = vec![AuditEvent {
                        action: "movement.recorded".to_string(),
                        actor_id: performed_by,
                        timestamp: now,
                        client_metadata,
                    }];

                    let new_entry = lot_movement::ActiveModel {
                        lot_id: Set(lot.id),
                        movement_type: Set(movement_type.as_str().to_string()),
                        origin_location: Set(origin),
                        destination_location: Set(destination),
                        weight_kg: Set(weight_kg),
                        performed_by: Set(performed_by),
                        notes: Set(notes),
                        before_snapshot: Set(serde_json::to_value(&before)
                            .map_err(|e| ServiceError::InternalError(e.to_string()))?),
                        after_snapshot: Set(serde_json::to_value(&after)
                            .map_err(|e| ServiceError::InternalError(e.to_string()))?),
                        audit_trail: Set(serde_json::to_value(&audit)
                            .map_err(|e| ServiceError::InternalError(e.to_string()))?),
                        moved_at: Set(now),
                        created_at: Set(now),
                        ..Default::default()
                    };

                    let entry = new_entry
                        .insert(txn)
                        .await
                        .map_err(ServiceError::db_error)?;
                    Ok((entry, lot.lot_number))
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(db_err) => ServiceError::db_error(db_err),
                TransactionError::Transaction(service_err) => service_err,
            })?;

        info!(
            lot_id = %entry.lot_id,
            entry_id = %entry.id,
            origin = %entry.origin_location,
            destination = %entry.destination_location,
            "Lot movement recorded"
        );

        event_sender
            .send(Event::LotMoved {
                lot_id: entry.lot_id,
                lot_number,
                origin: entry.origin_location.clone(),
                destination: entry.destination_location.clone(),
                performed_by,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(RecordMovementResult {
            entry_id: entry.id,
            lot_id: entry.lot_id,
            origin_location: entry.origin_location,
            destination_location: entry.destination_location,
        })
    }
}

/// Destination of the chronologically latest ledger entry for a lot.
/// Timestamp collisions are broken by the highest-assigned entry id.
pub async fn latest_destination<C: sea_orm::ConnectionTrait>(
    db: &C,
    lot_id: Uuid,
) -> Result<Option<String>, ServiceError> {
    let latest = lot_movement::Entity::find()
        .filter(lot_movement::Column::LotId.eq(lot_id))
        .order_by_desc(lot_movement::Column::MovedAt)
        .order_by_desc(lot_movement::Column::Id)
        .one(db)
        .await
        .map_err(ServiceError::db_error)?;

    Ok(latest.map(|entry| entry.destination_location))
}
