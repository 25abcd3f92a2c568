use super::impl_bookkeeping_behavior;
use crate::geo::{FeatureKind, GeoPoint, Locatable};
use crate::hours::{OpeningHours, WeekdaySet};
use chrono::{DateTime, NaiveTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Independent workshop listed next to the stores on the map
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "professionals")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub workshop_name: String,
    pub workshop_name_folded: String,
    pub head_mechanic_name: Option<String>,
    pub address: String,
    pub contact_phone: Option<String>,
    /// Comma-separated [`ServiceType`] codes
    pub service_types: String,
    pub is_featured: bool,
    pub latitude: f64,
    pub longitude: f64,
    pub logo_url: Option<String>,
    pub opening_time: Option<NaiveTime>,
    pub closing_time: Option<NaiveTime>,
    pub days_of_week: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl_bookkeeping_behavior!(workshop_name => workshop_name_folded);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ServiceType {
    Mecanica,
    Chaperia,
    Pintura,
    Electricidad,
}

impl ServiceType {
    pub fn code(self) -> &'static str {
        match self {
            ServiceType::Mecanica => "MECANICA",
            ServiceType::Chaperia => "CHAPERIA",
            ServiceType::Pintura => "PINTURA",
            ServiceType::Electricidad => "ELECTRICIDAD",
        }
    }

    /// Parses the stored comma-separated form, skipping unknown codes.
    pub fn parse_list(raw: &str) -> Vec<ServiceType> {
        let mut types: Vec<ServiceType> = raw
            .split(',')
            .filter_map(|code| code.parse().ok())
            .collect();
        types.sort();
        types.dedup();
        types
    }

    pub fn join(types: &[ServiceType]) -> String {
        let mut sorted = types.to_vec();
        sorted.sort();
        sorted.dedup();
        sorted
            .iter()
            .map(|t| t.code())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ServiceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MECANICA" => Ok(ServiceType::Mecanica),
            "CHAPERIA" => Ok(ServiceType::Chaperia),
            "PINTURA" => Ok(ServiceType::Pintura),
            "ELECTRICIDAD" => Ok(ServiceType::Electricidad),
            other => Err(format!("unknown service type '{}'", other)),
        }
    }
}

impl Model {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.longitude, self.latitude)
    }

    pub fn services(&self) -> Vec<ServiceType> {
        ServiceType::parse_list(&self.service_types)
    }
}

impl Locatable for Model {
    const KIND: FeatureKind = FeatureKind::Professional;

    fn id(&self) -> i32 {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.workshop_name
    }

    fn address(&self) -> Option<&str> {
        Some(&self.address)
    }

    fn location(&self) -> Option<GeoPoint> {
        Some(self.point())
    }

    fn opening_hours(&self) -> OpeningHours {
        OpeningHours::new(
            WeekdaySet::from_stored(&self.days_of_week),
            self.opening_time,
            self.closing_time,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_types_are_normalized() {
        let parsed = ServiceType::parse_list("pintura, MECANICA,bogus,PINTURA");
        assert_eq!(parsed, vec![ServiceType::Mecanica, ServiceType::Pintura]);
        assert_eq!(ServiceType::join(&parsed), "MECANICA,PINTURA");
    }
}
