use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Location a lot occupies before its first recorded movement.
pub const DEFAULT_LOCATION: &str = "receiving-yard";

/// Append-only ledger entry for a lot's relocation between named physical
/// locations. Rows are never updated or deleted; corrections append a
/// compensating entry. The integer primary key doubles as the tie-break
/// when two entries share a timestamp.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lot_movements")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub lot_id: Uuid,
    pub movement_type: String,
    pub origin_location: String,
    pub destination_location: String,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub weight_kg: rust_decimal::Decimal,
    pub performed_by: Uuid,
    pub notes: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub before_snapshot: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub after_snapshot: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub audit_trail: Json,
    pub moved_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::lot::Entity",
        from = "Column::LotId",
        to = "super::lot::Column::Id"
    )]
    Lot,
}

impl Related<super::lot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lot.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Structured lot state captured on both sides of a movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSnapshot {
    pub lot_id: Uuid,
    pub lot_number: String,
    pub location: String,
    pub weight_kg: rust_decimal::Decimal,
}

/// One audit sub-event embedded in a ledger entry. `client_metadata` carries
/// whatever the calling surface knows about the client (address, device),
/// opaque to the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub action: String,
    pub actor_id: Uuid,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    Transfer,
    Dispatch,
    Return,
    Correction,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Transfer => "transfer",
            MovementType::Dispatch => "dispatch",
            MovementType::Return => "return",
            MovementType::Correction => "correction",
        }
    }

    pub fn parse(value: &str) -> Option<MovementType> {
        match value {
            "transfer" => Some(MovementType::Transfer),
            "dispatch" => Some(MovementType::Dispatch),
            "return" => Some(MovementType::Return),
            "correction" => Some(MovementType::Correction),
            _ => None,
        }
    }
}

impl std::fmt::Display for MovementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
