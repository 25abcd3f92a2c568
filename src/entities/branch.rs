use super::impl_bookkeeping_behavior;
use crate::geo::{FeatureKind, GeoPoint, Locatable};
use crate::hours::{OpeningHours, WeekdaySet};
use chrono::{DateTime, NaiveTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Branch (sucursal): a physical location of a store
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "branches")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub store_id: i32,
    pub name: String,
    pub name_folded: String,
    pub address: String,
    pub phone: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub has_delivery: bool,
    pub opening_time: Option<NaiveTime>,
    pub closing_time: Option<NaiveTime>,
    pub days_of_week: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::store::Entity",
        from = "Column::StoreId",
        to = "super::store::Column::Id",
        on_delete = "Cascade"
    )]
    Store,
    #[sea_orm(has_many = "super::stock::Entity")]
    Stock,
}

impl Related<super::store::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Store.def()
    }
}

impl Related<super::stock::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Stock.def()
    }
}

impl_bookkeeping_behavior!(name => name_folded);

impl Model {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.longitude, self.latitude)
    }

    pub fn weekdays(&self) -> WeekdaySet {
        WeekdaySet::from_stored(&self.days_of_week)
    }
}

impl Locatable for Model {
    const KIND: FeatureKind = FeatureKind::Branch;

    fn id(&self) -> i32 {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn address(&self) -> Option<&str> {
        Some(&self.address)
    }

    fn location(&self) -> Option<GeoPoint> {
        Some(self.point())
    }

    fn opening_hours(&self) -> OpeningHours {
        OpeningHours::new(self.weekdays(), self.opening_time, self.closing_time)
    }
}
