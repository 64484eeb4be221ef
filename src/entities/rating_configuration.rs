use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Classification;

/// Valid range for a star rating. Values outside are rejected at
/// construction, never clamped.
pub const STAR_RANGE: std::ops::RangeInclusive<i16> = 1..=5;

/// Star ratings per classification bucket, one row per (supplier, material)
/// pair. The pair is unique; absence means the pair cannot be priced.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rating_configurations")]
pub struct Model {
    #[sea_orm(primary_key, column_type = "Uuid")]
    pub id: Uuid,
    pub supplier_id: Uuid,
    pub material_type_id: Uuid,
    pub light_stars: i16,
    pub medium_stars: i16,
    pub heavy_stars: i16,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    /// Star rating for a classification label. Labels outside the three
    /// known buckets resolve to the medium column — a deliberate fallback
    /// carried over from the original rating table, kept in this one place.
    /// Validated input paths never reach it.
    pub fn stars_for(&self, classification: &str) -> i16 {
        match Classification::parse(classification) {
            Some(Classification::Light) => self.light_stars,
            Some(Classification::Heavy) => self.heavy_stars,
            Some(Classification::Medium) | None => self.medium_stars,
        }
    }
}

/// Checks a single star value against [`STAR_RANGE`].
pub fn stars_in_range(value: i16) -> bool {
    STAR_RANGE.contains(&value)
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

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(light: i16, medium: i16, heavy: i16) -> Model {
        Model {
            id: Uuid::new_v4(),
            supplier_id: Uuid::new_v4(),
            material_type_id: Uuid::new_v4(),
            light_stars: light,
            medium_stars: medium,
            heavy_stars: heavy,
            updated_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn stars_for_maps_each_bucket_to_its_column() {
        let cfg = config(1, 3, 5);
        assert_eq!(cfg.stars_for("light"), 1);
        assert_eq!(cfg.stars_for("medium"), 3);
        assert_eq!(cfg.stars_for("heavy"), 5);
    }

    #[test]
    fn unknown_labels_fall_back_to_medium() {
        let cfg = config(1, 3, 5);
        assert_eq!(cfg.stars_for("unknown"), 3);
        assert_eq!(cfg.stars_for(""), 3);
    }

    #[test]
    fn star_range_bounds() {
        assert!(!stars_in_range(0));
        assert!(stars_in_range(1));
        assert!(stars_in_range(5));
        assert!(!stars_in_range(6));
    }
}
