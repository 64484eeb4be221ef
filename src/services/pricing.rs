//! Classification-based pricing resolution.
//!
//! A pure read over the catalog: rating stars come from the
//! (supplier, material) rating table, the unit price from the
//! (material, classification) price table, and the item value is their
//! product rounded to cents. Resolution runs once, inside the submit
//! transaction; the resolved figures are snapshotted onto the item and
//! never recomputed, so later catalog edits only affect future items.

use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::{
    entities::{price_configuration, rating_configuration, Classification},
    errors::ServiceError,
};

/// Outcome of a successful price resolution for one weighed item.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPrice {
    pub stars: i16,
    pub unit_price: Decimal,
    pub total_value: Decimal,
}

/// Resolves stars, unit price and total value for a weighed item.
///
/// Fails with `MissingRatingConfig` / `MissingPriceConfig` when the catalog
/// has no row for the pair — there is no implicit default — and with
/// `InvalidComputedValue` when positive inputs still produce a non-positive
/// value (a misconfigured catalog, not a valid zero-value item).
pub async fn resolve<C: ConnectionTrait>(
    db: &C,
    supplier_id: Uuid,
    material_type_id: Uuid,
    classification: Classification,
    weight_kg: Decimal,
) -> Result<ResolvedPrice, ServiceError> {
    let rating = rating_configuration::Entity::find()
        .filter(rating_configuration::Column::SupplierId.eq(supplier_id))
        .filter(rating_configuration::Column::MaterialTypeId.eq(material_type_id))
        .one(db)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or(ServiceError::MissingRatingConfig {
            supplier_id,
            material_type_id,
        })?;

    let stars = rating.stars_for(classification.as_str());

    let price = price_configuration::Entity::find()
        .filter(price_configuration::Column::MaterialTypeId.eq(material_type_id))
        .filter(price_configuration::Column::Classification.eq(classification.as_str()))
        .one(db)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or(ServiceError::MissingPriceConfig {
            material_type_id,
            classification: classification.as_str().to_string(),
        })?;

    let unit_price = price.price_per_kg;
    let total_value = (unit_price * weight_kg).round_dp(2);

    if total_value <= Decimal::ZERO && unit_price > Decimal::ZERO && weight_kg > Decimal::ZERO {
        return Err(ServiceError::InvalidComputedValue {
            material_type_id,
            unit_price,
            weight_kg,
            computed: total_value,
        });
    }

    Ok(ResolvedPrice {
        stars,
        unit_price,
        total_value,
    })
}
