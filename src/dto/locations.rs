use super::catalog::{InventarioResponse, PartLookup};
use super::double_option;
use crate::entities::professional::{self, ServiceType};
use crate::entities::{branch, stock, store};
use crate::geo::GeoPoint;
use crate::hours::WeekdaySet;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

// ---------------------------------------------------------------------------
// Stores

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct TiendaRequest {
    #[validate(length(min = 1, max = 100))]
    pub nombre: String,
    #[validate(length(max = 500))]
    pub logo_url: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 20))]
    pub telefono: Option<String>,
    /// Free-text schedule, e.g. "Lunes a Sábado"
    #[validate(length(max = 100))]
    pub dias_atencion: Option<String>,
    #[serde(default)]
    pub tiene_delivery: bool,
    #[validate(length(max = 255))]
    pub direccion: Option<String>,
    #[validate(custom = "crate::geo::validate_point")]
    #[schema(value_type = Option<crate::geo::GeoJsonPoint>)]
    pub ubicacion: Option<GeoPoint>,
    #[schema(value_type = Option<String>, example = "08:00:00")]
    pub hora_apertura: Option<NaiveTime>,
    #[schema(value_type = Option<String>, example = "18:00:00")]
    pub hora_cierre: Option<NaiveTime>,
    #[serde(default)]
    #[schema(value_type = Vec<crate::hours::DayCode>)]
    pub dias_semana: WeekdaySet,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct TiendaPatch {
    #[validate(length(min = 1, max = 100))]
    pub nombre: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub logo_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub telefono: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub dias_atencion: Option<Option<String>>,
    pub tiene_delivery: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub direccion: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<crate::geo::GeoJsonPoint>)]
    pub ubicacion: Option<Option<GeoPoint>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub hora_apertura: Option<Option<NaiveTime>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub hora_cierre: Option<Option<NaiveTime>>,
    #[schema(value_type = Option<Vec<crate::hours::DayCode>>)]
    pub dias_semana: Option<WeekdaySet>,
}

impl TiendaPatch {
    /// Field checks the derive cannot express on nested options.
    pub fn check(&self) -> Result<(), validator::ValidationErrors> {
        self.validate()?;
        let mut errors = validator::ValidationErrors::new();
        if let Some(Some(point)) = &self.ubicacion {
            if let Err(err) = crate::geo::validate_point(point) {
                errors.add("ubicacion", err);
            }
        }
        if let Some(Some(email)) = &self.email {
            if !validator::validate_email(email) {
                errors.add("email", validator::ValidationError::new("email"));
            }
        }
        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl From<TiendaRequest> for TiendaPatch {
    fn from(req: TiendaRequest) -> Self {
        Self {
            nombre: Some(req.nombre),
            logo_url: Some(req.logo_url),
            email: Some(req.email),
            telefono: Some(req.telefono),
            dias_atencion: Some(req.dias_atencion),
            tiene_delivery: Some(req.tiene_delivery),
            direccion: Some(req.direccion),
            ubicacion: Some(req.ubicacion),
            hora_apertura: Some(req.hora_apertura),
            hora_cierre: Some(req.hora_cierre),
            dias_semana: Some(req.dias_semana),
        }
    }
}

/// Store with its branches, each with its inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TiendaResponse {
    pub id: i32,
    pub nombre: String,
    pub logo_url: Option<String>,
    pub email: Option<String>,
    pub telefono: Option<String>,
    pub dias_atencion: Option<String>,
    pub tiene_delivery: bool,
    pub direccion: Option<String>,
    #[schema(value_type = Option<crate::geo::GeoJsonPoint>)]
    pub ubicacion: Option<GeoPoint>,
    #[schema(value_type = Option<String>)]
    pub hora_apertura: Option<NaiveTime>,
    #[schema(value_type = Option<String>)]
    pub hora_cierre: Option<NaiveTime>,
    #[schema(value_type = Vec<crate::hours::DayCode>)]
    pub dias_semana: WeekdaySet,
    pub sucursales: Vec<SucursalResponse>,
}

// ---------------------------------------------------------------------------
// Branches

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct SucursalRequest {
    pub tienda_id: i32,
    #[validate(length(min = 1, max = 100))]
    pub nombre: String,
    #[validate(length(min = 1, max = 255))]
    pub direccion: String,
    #[validate(length(max = 20))]
    pub telefono: Option<String>,
    #[validate(custom = "crate::geo::validate_point")]
    #[schema(value_type = crate::geo::GeoJsonPoint)]
    pub ubicacion: GeoPoint,
    #[serde(default)]
    pub tiene_delivery: bool,
    #[schema(value_type = Option<String>, example = "08:00:00")]
    pub hora_apertura: Option<NaiveTime>,
    #[schema(value_type = Option<String>, example = "18:00:00")]
    pub hora_cierre: Option<NaiveTime>,
    #[serde(default)]
    #[schema(value_type = Vec<crate::hours::DayCode>)]
    pub dias_semana: WeekdaySet,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct SucursalPatch {
    pub tienda_id: Option<i32>,
    #[validate(length(min = 1, max = 100))]
    pub nombre: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub direccion: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub telefono: Option<Option<String>>,
    #[validate(custom = "crate::geo::validate_point")]
    #[schema(value_type = Option<crate::geo::GeoJsonPoint>)]
    pub ubicacion: Option<GeoPoint>,
    pub tiene_delivery: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub hora_apertura: Option<Option<NaiveTime>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub hora_cierre: Option<Option<NaiveTime>>,
    #[schema(value_type = Option<Vec<crate::hours::DayCode>>)]
    pub dias_semana: Option<WeekdaySet>,
}

impl From<SucursalRequest> for SucursalPatch {
    fn from(req: SucursalRequest) -> Self {
        Self {
            tienda_id: Some(req.tienda_id),
            nombre: Some(req.nombre),
            direccion: Some(req.direccion),
            telefono: Some(req.telefono),
            ubicacion: Some(req.ubicacion),
            tiene_delivery: Some(req.tiene_delivery),
            hora_apertura: Some(req.hora_apertura),
            hora_cierre: Some(req.hora_cierre),
            dias_semana: Some(req.dias_semana),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SucursalResponse {
    pub id: i32,
    pub tienda_id: i32,
    pub nombre: String,
    pub direccion: String,
    pub telefono: Option<String>,
    #[schema(value_type = crate::geo::GeoJsonPoint)]
    pub ubicacion: GeoPoint,
    pub tiene_delivery: bool,
    #[schema(value_type = Option<String>)]
    pub hora_apertura: Option<NaiveTime>,
    #[schema(value_type = Option<String>)]
    pub hora_cierre: Option<NaiveTime>,
    #[schema(value_type = Vec<crate::hours::DayCode>)]
    pub dias_semana: WeekdaySet,
    pub inventario: Vec<InventarioResponse>,
}

// ---------------------------------------------------------------------------
// Professionals

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct ProfesionalRequest {
    #[validate(length(min = 1, max = 100))]
    pub nombre_taller: String,
    #[validate(length(max = 100))]
    pub jefe_mecanico: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub direccion: String,
    #[validate(length(max = 20))]
    pub telefono_contacto: Option<String>,
    #[serde(default)]
    pub tipos_servicio: Vec<ServiceType>,
    #[serde(default)]
    pub destacado: bool,
    #[validate(custom = "crate::geo::validate_point")]
    #[schema(value_type = crate::geo::GeoJsonPoint)]
    pub ubicacion: GeoPoint,
    #[validate(length(max = 500))]
    pub logo_url: Option<String>,
    #[schema(value_type = Option<String>, example = "08:00:00")]
    pub hora_apertura: Option<NaiveTime>,
    #[schema(value_type = Option<String>, example = "18:00:00")]
    pub hora_cierre: Option<NaiveTime>,
    #[serde(default)]
    #[schema(value_type = Vec<crate::hours::DayCode>)]
    pub dias_semana: WeekdaySet,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct ProfesionalPatch {
    #[validate(length(min = 1, max = 100))]
    pub nombre_taller: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub jefe_mecanico: Option<Option<String>>,
    #[validate(length(min = 1, max = 255))]
    pub direccion: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub telefono_contacto: Option<Option<String>>,
    pub tipos_servicio: Option<Vec<ServiceType>>,
    pub destacado: Option<bool>,
    #[validate(custom = "crate::geo::validate_point")]
    #[schema(value_type = Option<crate::geo::GeoJsonPoint>)]
    pub ubicacion: Option<GeoPoint>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub logo_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub hora_apertura: Option<Option<NaiveTime>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub hora_cierre: Option<Option<NaiveTime>>,
    #[schema(value_type = Option<Vec<crate::hours::DayCode>>)]
    pub dias_semana: Option<WeekdaySet>,
}

impl From<ProfesionalRequest> for ProfesionalPatch {
    fn from(req: ProfesionalRequest) -> Self {
        Self {
            nombre_taller: Some(req.nombre_taller),
            jefe_mecanico: Some(req.jefe_mecanico),
            direccion: Some(req.direccion),
            telefono_contacto: Some(req.telefono_contacto),
            tipos_servicio: Some(req.tipos_servicio),
            destacado: Some(req.destacado),
            ubicacion: Some(req.ubicacion),
            logo_url: Some(req.logo_url),
            hora_apertura: Some(req.hora_apertura),
            hora_cierre: Some(req.hora_cierre),
            dias_semana: Some(req.dias_semana),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProfesionalResponse {
    pub id: i32,
    pub nombre_taller: String,
    pub jefe_mecanico: Option<String>,
    pub direccion: String,
    pub telefono_contacto: Option<String>,
    pub tipos_servicio: Vec<ServiceType>,
    pub destacado: bool,
    #[schema(value_type = crate::geo::GeoJsonPoint)]
    pub ubicacion: GeoPoint,
    pub logo_url: Option<String>,
    #[schema(value_type = Option<String>)]
    pub hora_apertura: Option<NaiveTime>,
    #[schema(value_type = Option<String>)]
    pub hora_cierre: Option<NaiveTime>,
    #[schema(value_type = Vec<crate::hours::DayCode>)]
    pub dias_semana: WeekdaySet,
}

impl From<professional::Model> for ProfesionalResponse {
    fn from(model: professional::Model) -> Self {
        Self {
            id: model.id,
            tipos_servicio: model.services(),
            ubicacion: model.point(),
            dias_semana: WeekdaySet::from_stored(&model.days_of_week),
            nombre_taller: model.workshop_name,
            jefe_mecanico: model.head_mechanic_name,
            direccion: model.address,
            telefono_contacto: model.contact_phone,
            destacado: model.is_featured,
            logo_url: model.logo_url,
            hora_apertura: model.opening_time,
            hora_cierre: model.closing_time,
        }
    }
}

// ---------------------------------------------------------------------------
// Tree builders
//
// Pure functions over batch-loaded rows. Callers may pass rows belonging to
// other stores or branches; only matching foreign keys are attached.

/// Branch with exactly the stock rows whose `branch_id` is the branch id,
/// in id order.
pub fn branch_tree(
    branch: &branch::Model,
    rows: &[stock::Model],
    lookup: &PartLookup,
) -> SucursalResponse {
    let mut own: Vec<&stock::Model> = rows.iter().filter(|r| r.branch_id == branch.id).collect();
    own.sort_by_key(|r| r.id);

    SucursalResponse {
        id: branch.id,
        tienda_id: branch.store_id,
        nombre: branch.name.clone(),
        direccion: branch.address.clone(),
        telefono: branch.phone.clone(),
        ubicacion: branch.point(),
        tiene_delivery: branch.has_delivery,
        hora_apertura: branch.opening_time,
        hora_cierre: branch.closing_time,
        dias_semana: branch.weekdays(),
        inventario: own
            .into_iter()
            .filter_map(|row| lookup.inventory_row(row))
            .collect(),
    }
}

/// Store with exactly the branches whose `store_id` is the store id. Branch
/// order is kept from `branches`.
pub fn store_tree(
    store: &store::Model,
    branches: &[branch::Model],
    rows: &[stock::Model],
    lookup: &PartLookup,
) -> TiendaResponse {
    TiendaResponse {
        id: store.id,
        nombre: store.name.clone(),
        logo_url: store.logo_url.clone(),
        email: store.email.clone(),
        telefono: store.phone.clone(),
        dias_atencion: store.hours_description.clone(),
        tiene_delivery: store.has_delivery,
        direccion: store.address.clone(),
        ubicacion: GeoPoint::from_columns(store.latitude, store.longitude),
        hora_apertura: store.opening_time,
        hora_cierre: store.closing_time,
        dias_semana: store.weekdays(),
        sucursales: branches
            .iter()
            .filter(|b| b.store_id == store.id)
            .map(|b| branch_tree(b, rows, lookup))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::catalog::fixtures;
    use chrono::Utc;

    fn store(id: i32, name: &str) -> store::Model {
        store::Model {
            id,
            name: name.into(),
            name_folded: crate::entities::fold_text(name),
            logo_url: None,
            email: Some("ventas@repuestos.com.py".into()),
            phone: None,
            hours_description: Some("Lunes a Sábado".into()),
            has_delivery: true,
            address: None,
            latitude: None,
            longitude: None,
            opening_time: None,
            closing_time: None,
            days_of_week: "LUN,MAR".into(),
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn lookup() -> PartLookup {
        PartLookup::new(
            vec![
                fixtures::part(1, "Pastillas de Freno", None),
                fixtures::part(2, "Filtro de Aceite", None),
            ],
            vec![],
            vec![],
        )
    }

    #[test]
    fn store_tree_contains_exactly_matching_branches_and_rows() {
        let branches = vec![
            fixtures::branch(1, 1, "Asunción"),
            fixtures::branch(2, 2, "Otra tienda"),
            fixtures::branch(3, 1, "San Lorenzo"),
        ];
        let rows = vec![
            fixtures::stock(10, 1, 1),
            fixtures::stock(11, 2, 1),
            fixtures::stock(12, 3, 2),
            fixtures::stock(13, 1, 2),
        ];

        let tree = store_tree(&store(1, "Repuestos Total"), &branches, &rows, &lookup());

        let branch_ids: Vec<i32> = tree.sucursales.iter().map(|b| b.id).collect();
        assert_eq!(branch_ids, vec![1, 3]);
        for branch in &tree.sucursales {
            assert_eq!(branch.tienda_id, 1);
        }
        let first: Vec<i32> = tree.sucursales[0].inventario.iter().map(|r| r.id).collect();
        assert_eq!(first, vec![10, 13]);
        let second: Vec<i32> = tree.sucursales[1].inventario.iter().map(|r| r.id).collect();
        assert_eq!(second, vec![12]);
        assert_eq!(
            tree.sucursales[1].inventario[0].repuesto_global.nombre,
            "Filtro de Aceite"
        );
    }

    #[test]
    fn store_without_location_has_null_ubicacion() {
        let tree = store_tree(&store(1, "Sin mapa"), &[], &[], &lookup());
        let json = serde_json::to_value(&tree).unwrap();
        assert!(json["ubicacion"].is_null());
        assert_eq!(json["dias_atencion"], "Lunes a Sábado");
        assert_eq!(json["dias_semana"], serde_json::json!(["LUN", "MAR"]));
        assert_eq!(json["sucursales"], serde_json::json!([]));
    }

    #[test]
    fn branch_json_embeds_point_and_part() {
        let branch = fixtures::branch(1, 1, "Asunción");
        let repr = branch_tree(&branch, &[fixtures::stock(5, 1, 1)], &lookup());
        let json = serde_json::to_value(&repr).unwrap();
        assert_eq!(json["ubicacion"]["type"], "Point");
        assert_eq!(json["ubicacion"]["coordinates"][0], -57.6479);
        assert_eq!(json["inventario"][0]["precio"], "150000.00");
        assert_eq!(json["inventario"][0]["repuesto_global"]["id"], 1);
    }

    #[test]
    fn patch_with_bad_coordinates_fails_check() {
        let patch: TiendaPatch = serde_json::from_value(serde_json::json!({
            "ubicacion": {"type": "Point", "coordinates": [-57.6, 120.0]}
        }))
        .unwrap();
        assert!(patch.check().is_err());

        let cleared: TiendaPatch =
            serde_json::from_value(serde_json::json!({"ubicacion": null})).unwrap();
        assert_eq!(cleared.ubicacion, Some(None));
        assert!(cleared.check().is_ok());
    }

    #[test]
    fn professional_request_parses_service_types() {
        let req: ProfesionalRequest = serde_json::from_value(serde_json::json!({
            "nombre_taller": "Taller Don Pedro",
            "direccion": "Av. España 1200",
            "tipos_servicio": ["MECANICA", "PINTURA"],
            "ubicacion": {"type": "Point", "coordinates": [-57.6, -25.3]},
            "dias_semana": ["LUN", "VIE"]
        }))
        .unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.tipos_servicio, vec![ServiceType::Mecanica, ServiceType::Pintura]);
        assert_eq!(req.dias_semana.len(), 2);
    }
}
