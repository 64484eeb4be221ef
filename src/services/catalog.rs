//! Reference catalog administration.
//!
//! Suppliers, material types and the two pricing tables are maintained by
//! administrators out of band; these operations are pass-through writes with
//! input validation, not business logic. The pricing resolver only ever
//! reads this data.

use crate::{
    db::DbPool,
    entities::{
        material_type, price_configuration,
        rating_configuration::{self, stars_in_range, STAR_RANGE},
        supplier, Classification,
    },
    errors::ServiceError,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Clone)]
pub struct CatalogService {
    db_pool: Arc<DbPool>,
}

/// Input for creating a supplier record
#[derive(Debug, Clone)]
pub struct NewSupplier {
    pub name: String,
    pub document: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
}

/// Input for creating a material type
#[derive(Debug, Clone)]
pub struct NewMaterialType {
    pub name: String,
    pub code: String,
    pub base_classification: Option<String>,
}

/// Star ratings for the three buckets of one (supplier, material) pair
#[derive(Debug, Clone, Copy)]
pub struct RatingStars {
    pub light: i16,
    pub medium: i16,
    pub heavy: i16,
}

impl CatalogService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, input))]
    pub async fn create_supplier(
        &self,
        input: NewSupplier,
    ) -> Result<supplier::Model, ServiceError> {
        if input.name.trim().is_empty() || input.document.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "Supplier name and document are required".to_string(),
            ));
        }

        let db = &*self.db_pool;
        let now = Utc::now();
        let model = supplier::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            document: Set(input.document),
            email: Set(input.email),
            phone: Set(input.phone),
            street: Set(input.street),
            city: Set(input.city),
            state: Set(input.state),
            postal_code: Set(input.postal_code),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        model.insert(db).await.map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn get_supplier(&self, id: Uuid) -> Result<supplier::Model, ServiceError> {
        let db = &*self.db_pool;
        supplier::Entity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Supplier {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn list_suppliers(&self) -> Result<Vec<supplier::Model>, ServiceError> {
        let db = &*self.db_pool;
        supplier::Entity::find()
            .order_by_asc(supplier::Column::Name)
            .all(db)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self, input))]
    pub async fn create_material_type(
        &self,
        input: NewMaterialType,
    ) -> Result<material_type::Model, ServiceError> {
        if input.name.trim().is_empty() || input.code.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "Material name and code are required".to_string(),
            ));
        }
        if let Some(base) = &input.base_classification {
            if Classification::parse(base).is_none() {
                return Err(ServiceError::ValidationError(format!(
                    "Unknown base classification '{}': expected light, medium or heavy",
                    base
                )));
            }
        }

        let db = &*self.db_pool;
        let now = Utc::now();
        let model = material_type::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            code: Set(input.code),
            base_classification: Set(input.base_classification),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        model.insert(db).await.map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn list_material_types(&self) -> Result<Vec<material_type::Model>, ServiceError> {
        let db = &*self.db_pool;
        material_type::Entity::find()
            .order_by_asc(material_type::Column::Name)
            .all(db)
            .await
            .map_err(ServiceError::db_error)
    }

    /// Creates or replaces the rating table for a (supplier, material) pair.
    /// Stars outside [1,5] are rejected outright; there is no clamping.
    #[instrument(skip(self))]
    pub async fn upsert_rating_configuration(
        &self,
        supplier_id: Uuid,
        material_type_id: Uuid,
        stars: RatingStars,
        updated_by: Uuid,
    ) -> Result<rating_configuration::Model, ServiceError> {
        for (bucket, value) in [
            ("light", stars.light),
            ("medium", stars.medium),
            ("heavy", stars.heavy),
        ] {
            if !stars_in_range(value) {
                return Err(ServiceError::ValidationError(format!(
                    "Star rating for {} must be within {:?}, got {}",
                    bucket, STAR_RANGE, value
                )));
            }
        }

        let db = &*self.db_pool;
        let existing = rating_configuration::Entity::find()
            .filter(rating_configuration::Column::SupplierId.eq(supplier_id))
            .filter(rating_configuration::Column::MaterialTypeId.eq(material_type_id))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;

        let now = Utc::now();
        let saved = match existing {
            Some(current) => {
                let mut active: rating_configuration::ActiveModel = current.into();
                active.light_stars = Set(stars.light);
                active.medium_stars = Set(stars.medium);
                active.heavy_stars = Set(stars.heavy);
                active.updated_by = Set(Some(updated_by));
                active.updated_at = Set(now);
                active.update(db).await.map_err(ServiceError::db_error)?
            }
            None => {
                let model = rating_configuration::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    supplier_id: Set(supplier_id),
                    material_type_id: Set(material_type_id),
                    light_stars: Set(stars.light),
                    medium_stars: Set(stars.medium),
                    heavy_stars: Set(stars.heavy),
                    updated_by: Set(Some(updated_by)),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                model.insert(db).await.map_err(ServiceError::db_error)?
            }
        };

        info!(
            supplier_id = %supplier_id,
            material_type_id = %material_type_id,
            "Rating configuration updated"
        );
        Ok(saved)
    }

    #[instrument(skip(self))]
    pub async fn get_rating_configuration(
        &self,
        supplier_id: Uuid,
        material_type_id: Uuid,
    ) -> Result<rating_configuration::Model, ServiceError> {
        let db = &*self.db_pool;
        rating_configuration::Entity::find()
            .filter(rating_configuration::Column::SupplierId.eq(supplier_id))
            .filter(rating_configuration::Column::MaterialTypeId.eq(material_type_id))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or(ServiceError::MissingRatingConfig {
                supplier_id,
                material_type_id,
            })
    }

    /// Creates or replaces the price for a (material, classification) pair.
    #[instrument(skip(self))]
    pub async fn upsert_price_configuration(
        &self,
        material_type_id: Uuid,
        classification: Classification,
        price_per_kg: Decimal,
        updated_by: Uuid,
    ) -> Result<price_configuration::Model, ServiceError> {
        if price_per_kg < Decimal::ZERO {
            return Err(ServiceError::ValidationError(format!(
                "Price per kg must not be negative, got {}",
                price_per_kg
            )));
        }

        let db = &*self.db_pool;
        let existing = price_configuration::Entity::find()
            .filter(price_configuration::Column::MaterialTypeId.eq(material_type_id))
            .filter(price_configuration::Column::Classification.eq(classification.as_str()))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;

        let now = Utc::now();
        let saved = match existing {
            Some(current) => {
                let mut active: price_configuration::ActiveModel = current.into();
                active.price_per_kg = Set(price_per_kg);
                active.updated_by = Set(Some(updated_by));
                active.updated_at = Set(now);
                active.update(db).await.map_err(ServiceError::db_error)?
            }
            None => {
                let model = price_configuration::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    material_type_id: Set(material_type_id),
                    classification: Set(classification.as_str().to_string()),
                    price_per_kg: Set(price_per_kg),
                    updated_by: Set(Some(updated_by)),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                model.insert(db).await.map_err(ServiceError::db_error)?
            }
        };

        info!(
            material_type_id = %material_type_id,
            classification = %classification,
            price_per_kg = %price_per_kg,
            "Price configuration updated"
        );
        Ok(saved)
    }

    #[instrument(skip(self))]
    pub async fn list_price_configurations(
        &self,
        material_type_id: Uuid,
    ) -> Result<Vec<price_configuration::Model>, ServiceError> {
        let db = &*self.db_pool;
        price_configuration::Entity::find()
            .filter(price_configuration::Column::MaterialTypeId.eq(material_type_id))
            .order_by_asc(price_configuration::Column::Classification)
            .all(db)
            .await
            .map_err(ServiceError::db_error)
    }
}
