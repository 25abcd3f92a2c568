use super::impl_bookkeeping_behavior;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Vehicle (brand, model, year); the triple is unique
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vehicles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub brand: String,
    pub model: String,
    pub brand_folded: String,
    pub model_folded: String,
    pub year: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::part_vehicle::Entity")]
    PartVehicle,
}

impl Related<super::part_vehicle::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PartVehicle.def()
    }
}

impl Related<super::part::Entity> for Entity {
    fn to() -> RelationDef {
        super::part_vehicle::Relation::Part.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::part_vehicle::Relation::Vehicle.def().rev())
    }
}

impl_bookkeeping_behavior!(brand => brand_folded, model => model_folded);

impl Model {
    /// Default ordering: brand, model, year, then id.
    pub fn sort_key(&self) -> (&str, &str, i32, i32) {
        (&self.brand, &self.model, self.year, self.id)
    }
}
