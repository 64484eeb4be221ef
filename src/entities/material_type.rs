use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "material_types")]
pub struct Model {
    #[sea_orm(primary_key, column_type = "Uuid")]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub code: String,
    /// Suggested starting bucket for new items of this material, if any
    pub base_classification: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::price_configuration::Entity")]
    PriceConfigurations,
    #[sea_orm(has_many = "super::rating_configuration::Entity")]
    RatingConfigurations,
}

impl Related<super::price_configuration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PriceConfigurations.def()
    }
}

impl Related<super::rating_configuration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RatingConfigurations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
