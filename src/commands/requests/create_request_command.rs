use crate::{
    commands::Command,
    db::DbPool,
    entities::{
        purchase_request::{self, RequestStatus},
        request_item, supplier, material_type, Classification,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::pricing,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionError, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreatePurchaseRequestCommand {
    pub requester_id: Uuid,
    pub supplier_id: Uuid,
    #[validate(length(min = 1, message = "At least one item is required"))]
    pub items: Vec<RequestItemInput>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
    pub pickup_requested: bool,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct RequestItemInput {
    pub material_type_id: Uuid,
    /// Weight in kilograms; must be strictly positive
    pub weight_kg: f64,
    /// Final classification used for pricing: light, medium or heavy
    pub classification: String,
    /// Bucket suggested by the requester or intake tooling, if different
    pub suggested_classification: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePurchaseRequestResult {
    pub id: Uuid,
    pub request_number: String,
    pub status: String,
    pub item_count: usize,
    pub total_value: Decimal,
    pub created_at: DateTime<Utc>,
}

/// A weighed item with its classification parsed and weight normalized,
/// ready for pricing.
struct ValidatedItem {
    material_type_id: Uuid,
    weight_kg: Decimal,
    classification: Classification,
    suggested_classification: Option<String>,
}

#[async_trait::async_trait]
impl Command for CreatePurchaseRequestCommand {
    type Result = CreatePurchaseRequestResult;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate().map_err(|e| {
            let msg = format!("Invalid input: {}", e);
            error!("{}", msg);
            ServiceError::ValidationError(msg)
        })?;

        let items = self.validate_items()?;

        let db = db_pool.as_ref();
        let saved = self.create_request(db, items).await?;

        info!(
            request_id = %saved.request.id,
            request_number = %saved.request.request_number,
            supplier_id = %self.supplier_id,
            items_count = %saved.items.len(),
            total_value = %saved.total_value,
            "Purchase request submitted"
        );

        event_sender
            .send(Event::RequestSubmitted {
                request_id: saved.request.id,
                request_number: saved.request.request_number.clone(),
                supplier_id: self.supplier_id,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(CreatePurchaseRequestResult {
            id: saved.request.id,
            request_number: saved.request.request_number,
            status: saved.request.status,
            item_count: saved.items.len(),
            total_value: saved.total_value,
            created_at: saved.request.created_at,
        })
    }
}

struct SavedRequest {
    request: purchase_request::Model,
    items: Vec<request_item::Model>,
    total_value: Decimal,
}

impl CreatePurchaseRequestCommand {
    /// Rejects malformed items before any persistence is attempted.
    fn validate_items(&self) -> Result<Vec<ValidatedItem>, ServiceError> {
        self.items
            .iter()
            .map(|item| {
                let classification =
                    Classification::parse(&item.classification).ok_or_else(|| {
                        ServiceError::ValidationError(format!(
                            "Unknown classification '{}': expected light, medium or heavy",
                            item.classification
                        ))
                    })?;

                let weight_kg = Decimal::from_f64_retain(item.weight_kg)
                    .filter(|w| *w > Decimal::ZERO)
                    .ok_or_else(|| {
                        ServiceError::ValidationError(format!(
                            "Item weight must be positive, got {}",
                            item.weight_kg
                        ))
                    })?;

                Ok(ValidatedItem {
                    material_type_id: item.material_type_id,
                    weight_kg,
                    classification,
                    suggested_classification: item.suggested_classification.clone(),
                })
            })
            .collect()
    }

    fn generate_request_number() -> String {
        format!("REQ-{}", Uuid::new_v4().simple())
    }

    /// Persists the request header and every priced item in one transaction.
    /// A pricing failure on any item aborts the whole submission; no
    /// partially-priced request is ever visible.
    async fn create_request(
        &self,
        db: &DbPool,
        items: Vec<ValidatedItem>,
    ) -> Result<SavedRequest, ServiceError> {
        let requester_id = self.requester_id;
        let supplier_id = self.supplier_id;
        let notes = self.notes.clone();
        let pickup_requested = self.pickup_requested;

        db.transaction::<_, SavedRequest, ServiceError>(move |txn| {
            Box::pin(async move {
                let supplier = supplier::Entity::find_by_id(supplier_id)
                    .one(txn)
                    .await
                    .map_err(ServiceError::db_error)?
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!("Supplier {} not found", supplier_id))
                    })?;

                if !supplier.active {
                    return Err(ServiceError::ValidationError(format!(
                        "Supplier {} is inactive",
                        supplier_id
                    )));
                }

                let now = Utc::now();
                let new_request = purchase_request::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    request_number: Set(Self::generate_request_number()),
                    requester_id: Set(requester_id),
                    supplier_id: Set(supplier_id),
                    notes: Set(notes),
                    pickup_requested: Set(pickup_requested),
                    status: Set(RequestStatus::Pending.as_str().to_string()),
                    created_at: Set(now),
                    confirmed_at: Set(None),
                    approved_by: Set(None),
                    updated_at: Set(now),
                };

                let saved_request = new_request
                    .insert(txn)
                    .await
                    .map_err(ServiceError::db_error)?;

                let mut saved_items = Vec::with_capacity(items.len());
                let mut total_value = Decimal::ZERO;

                for item in items {
                    let material_exists = material_type::Entity::find_by_id(item.material_type_id)
                        .filter(material_type::Column::Active.eq(true))
                        .one(txn)
                        .await
                        .map_err(ServiceError::db_error)?
                        .is_some();
                    if !material_exists {
                        return Err(ServiceError::NotFound(format!(
                            "Material type {} not found",
                            item.material_type_id
                        )));
                    }

                    let resolved = pricing::resolve(
                        txn,
                        supplier_id,
                        item.material_type_id,
                        item.classification,
                        item.weight_kg,
                    )
                    .await?;

                    let new_item = request_item::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        request_id: Set(saved_request.id),
                        material_type_id: Set(item.material_type_id),
                        weight_kg: Set(item.weight_kg),
                        suggested_classification: Set(item.suggested_classification),
                        classification: Set(item.classification.as_str().to_string()),
                        stars: Set(resolved.stars),
                        unit_price: Set(resolved.unit_price),
                        total_value: Set(resolved.total_value),
                        lot_id: Set(None),
                        created_at: Set(Utc::now()),
                    };

                    let saved_item =
                        new_item.insert(txn).await.map_err(ServiceError::db_error)?;
                    total_value += saved_item.total_value;
                    saved_items.push(saved_item);
                }

                Ok(SavedRequest {
                    request: saved_request,
                    items: saved_items,
                    total_value,
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
