use super::impl_bookkeeping_behavior;
use crate::geo::{FeatureKind, GeoPoint, Locatable};
use crate::hours::{OpeningHours, WeekdaySet};
use chrono::{DateTime, NaiveTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Store (tienda): the brand owning one or more branches
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stores")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub name_folded: String,
    pub logo_url: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Free-text schedule shown to customers, e.g. "Lunes a Sábado"
    pub hours_description: Option<String>,
    pub has_delivery: bool,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub opening_time: Option<NaiveTime>,
    pub closing_time: Option<NaiveTime>,
    /// Comma-separated weekday codes
    pub days_of_week: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::branch::Entity")]
    Branches,
}

impl Related<super::branch::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Branches.def()
    }
}

impl_bookkeeping_behavior!(name => name_folded);

impl Model {
    pub fn weekdays(&self) -> WeekdaySet {
        WeekdaySet::from_stored(&self.days_of_week)
    }
}

impl Locatable for Model {
    const KIND: FeatureKind = FeatureKind::Store;

    fn id(&self) -> i32 {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    fn location(&self) -> Option<GeoPoint> {
        GeoPoint::from_columns(self.latitude, self.longitude)
    }

    fn opening_hours(&self) -> OpeningHours {
        OpeningHours::new(self.weekdays(), self.opening_time, self.closing_time)
    }
}
