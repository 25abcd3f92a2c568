//! Point geometry and the GeoJSON feature collection rendered on map pages.

use crate::hours::OpeningHours;
use chrono::NaiveDateTime;
use geo_types::Point;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use utoipa::ToSchema;
use validator::ValidationError;

/// WGS84 point (x = longitude, y = latitude). Serialized as a GeoJSON
/// `Point`, longitude first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "GeoJsonPoint", try_from = "GeoJsonPoint")]
pub struct GeoPoint(Point<f64>);

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self(Point::new(longitude, latitude))
    }

    pub fn longitude(&self) -> f64 {
        self.0.x()
    }

    pub fn latitude(&self) -> f64 {
        self.0.y()
    }

    /// Builds a point from nullable storage columns. Both must be present.
    pub fn from_columns(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(lat), Some(lng)) => Some(Self::new(lng, lat)),
            _ => None,
        }
    }

    pub fn in_range(&self) -> bool {
        let (lng, lat) = self.0.x_y();
        lat.is_finite()
            && lng.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lng)
    }
}

impl From<Point<f64>> for GeoPoint {
    fn from(point: Point<f64>) -> Self {
        Self(point)
    }
}

impl From<GeoPoint> for Point<f64> {
    fn from(point: GeoPoint) -> Self {
        point.0
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "POINT({} {})", self.longitude(), self.latitude())
    }
}

/// Validator hook for payload fields carrying a point.
pub fn validate_point(point: &GeoPoint) -> Result<(), ValidationError> {
    if point.in_range() {
        return Ok(());
    }
    let mut err = ValidationError::new("coordinates");
    err.message = Some(
        format!(
            "latitude must lie in [-90, 90] and longitude in [-180, 180], got {}",
            point
        )
        .into(),
    );
    Err(err)
}

/// GeoJSON wire form of a point
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({"type": "Point", "coordinates": [-57.6479, -25.2965]}))]
pub struct GeoJsonPoint {
    #[serde(rename = "type")]
    #[schema(example = "Point")]
    pub kind: String,
    /// `[longitude, latitude]`
    pub coordinates: Vec<f64>,
}

impl From<GeoPoint> for GeoJsonPoint {
    fn from(point: GeoPoint) -> Self {
        Self {
            kind: "Point".to_string(),
            coordinates: vec![point.longitude(), point.latitude()],
        }
    }
}

impl TryFrom<GeoJsonPoint> for GeoPoint {
    type Error = String;

    fn try_from(raw: GeoJsonPoint) -> Result<Self, Self::Error> {
        if raw.kind != "Point" {
            return Err(format!("expected geometry type 'Point', got '{}'", raw.kind));
        }
        match raw.coordinates.as_slice() {
            [lng, lat] => Ok(GeoPoint::new(*lng, *lat)),
            other => Err(format!(
                "a point needs exactly two coordinates, got {}",
                other.len()
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    Store,
    Branch,
    Professional,
}

impl FeatureKind {
    fn path_segment(self) -> &'static str {
        match self {
            FeatureKind::Store => "stores",
            FeatureKind::Branch => "branches",
            FeatureKind::Professional => "professionals",
        }
    }

    /// Detail page path, e.g. `/branches/3/`.
    pub fn detail_url(self, id: i32) -> String {
        format!("/{}/{}/", self.path_segment(), id)
    }
}

/// Anything that can be placed on the map.
pub trait Locatable {
    const KIND: FeatureKind;

    fn id(&self) -> i32;
    fn display_name(&self) -> &str;
    fn address(&self) -> Option<&str>;
    fn location(&self) -> Option<GeoPoint>;
    fn opening_hours(&self) -> OpeningHours;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FeatureProperties {
    pub kind: FeatureKind,
    pub id: i32,
    pub name: String,
    pub url: String,
    pub is_open: bool,
    pub status: String,
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    #[schema(value_type = GeoJsonPoint)]
    pub geometry: GeoPoint,
    pub properties: FeatureProperties,
}

impl Feature {
    /// Projects one entity. Entities without a location yield `None`.
    pub fn from_entity<L: Locatable>(item: &L, now: NaiveDateTime) -> Option<Self> {
        let geometry = item.location()?;
        let status = item.opening_hours().status_at(now);
        Some(Self {
            kind: "Feature".to_string(),
            geometry,
            properties: FeatureProperties {
                kind: L::KIND,
                id: item.id(),
                name: item.display_name().to_string(),
                url: L::KIND.detail_url(item.id()),
                is_open: status.is_open(),
                status: status.label().to_string(),
                address: item.address().map(str::to_string),
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self {
            kind: "FeatureCollection".to_string(),
            features: Vec::new(),
        }
    }
}

impl FeatureCollection {
    /// Appends every located item, in slice order, evaluated at `now`.
    pub fn extend_from<L: Locatable>(&mut self, items: &[L], now: NaiveDateTime) -> &mut Self {
        self.features
            .extend(items.iter().filter_map(|item| Feature::from_entity(item, now)));
        self
    }

    pub fn retain_open(&mut self) {
        self.features.retain(|f| f.properties.is_open);
    }

    pub fn retain_closed(&mut self) {
        self.features.retain(|f| !f.properties.is_open);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
