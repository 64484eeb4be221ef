use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Price per unit weight, one row per (material, classification) pair.
/// Independent of supplier; classification is the sole price key.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "price_configurations")]
pub struct Model {
    #[sea_orm(primary_key, column_type = "Uuid")]
    pub id: Uuid,
    pub material_type_id: Uuid,
    pub classification: String,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub price_per_kg: rust_decimal::Decimal,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::material_type::Entity",
        from = "Column::MaterialTypeId",
        to = "super::material_type::Column::Id"
    )]
    MaterialType,
}

impl Related<super::material_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MaterialType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
