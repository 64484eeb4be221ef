use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single weighed material entry within a purchase request.
///
/// `stars`, `unit_price` and `total_value` are snapshots taken when the
/// request is submitted. Catalog changes apply to future items only; these
/// columns are never recomputed.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "request_items")]
pub struct Model {
    #[sea_orm(primary_key, column_type = "Uuid")]
    pub id: Uuid,
    pub request_id: Uuid,
    pub material_type_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub weight_kg: rust_decimal::Decimal,
    /// Bucket suggested by the requester or the intake tooling, if any
    pub suggested_classification: Option<String>,
    /// Bucket actually used for pricing
    pub classification: String,
    pub stars: i16,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub unit_price: rust_decimal::Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub total_value: rust_decimal::Decimal,
    /// Back-reference to the lot this item was folded into on receive
    pub lot_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::purchase_request::Entity",
        from = "Column::RequestId",
        to = "super::purchase_request::Column::Id"
    )]
    PurchaseRequest,
    #[sea_orm(
        belongs_to = "super::material_type::Entity",
        from = "Column::MaterialTypeId",
        to = "super::material_type::Column::Id"
    )]
    MaterialType,
    #[sea_orm(
        belongs_to = "super::lot::Entity",
        from = "Column::LotId",
        to = "super::lot::Column::Id"
    )]
    Lot,
}

impl Related<super::purchase_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseRequest.def()
    }
}

impl Related<super::material_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MaterialType.def()
    }
}

impl Related<super::lot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lot.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
