use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Physical inventory unit materialized when a purchase request is received.
/// Exactly one lot per request, enforced by the unique index on
/// `request_id`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lots")]
pub struct Model {
    #[sea_orm(primary_key, column_type = "Uuid")]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub lot_number: String,
    #[sea_orm(unique)]
    pub request_id: Uuid,
    pub supplier_id: Uuid,
    /// Material of the first item in the originating request, by convention
    pub material_type_id: Uuid,
    /// Predominant classification: the first item's final bucket
    pub classification: String,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub total_weight_kg: rust_decimal::Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub total_value: rust_decimal::Decimal,
    pub item_count: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::supplier::Entity",
        from = "Column::SupplierId",
        to = "super::supplier::Column::Id"
    )]
    Supplier,
    #[sea_orm(
        belongs_to = "super::material_type::Entity",
        from = "Column::MaterialTypeId",
        to = "super::material_type::Column::Id"
    )]
    MaterialType,
    #[sea_orm(has_many = "super::request_item::Entity")]
    RequestItems,
    #[sea_orm(has_many = "super::lot_movement::Entity")]
    LotMovements,
}

impl Related<super::supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supplier.def()
    }
}

impl Related<super::material_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MaterialType.def()
    }
}

impl Related<super::request_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RequestItems.def()
    }
}

impl Related<super::lot_movement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LotMovements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Lot lifecycle, independent of the originating request's status. A lot
/// begins life `open` — it only exists once the request was received — and
/// an inspection decision moves it to `approved` or `rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LotStatus {
    Open,
    Approved,
    Rejected,
}

impl LotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LotStatus::Open => "open",
            LotStatus::Approved => "approved",
            LotStatus::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<LotStatus> {
        match value {
            "open" => Some(LotStatus::Open),
            "approved" => Some(LotStatus::Approved),
            "rejected" => Some(LotStatus::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for LotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
