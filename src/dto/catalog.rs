use super::{double_option, money, validate_price};
use crate::entities::{branch, category, part, stock, vehicle};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;
use validator::Validate;

// ---------------------------------------------------------------------------
// Categories

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CategoriaRequest {
    #[validate(length(min = 1, max = 100))]
    pub nombre: String,
    pub descripcion: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CategoriaPatch {
    #[validate(length(min = 1, max = 100))]
    pub nombre: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub descripcion: Option<Option<String>>,
}

impl From<CategoriaRequest> for CategoriaPatch {
    fn from(req: CategoriaRequest) -> Self {
        Self {
            nombre: Some(req.nombre),
            descripcion: Some(req.descripcion),
        }
    }
}

/// Category summary embedded in part representations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoriaRef {
    pub id: i32,
    pub nombre: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoriaResponse {
    pub id: i32,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub activo: bool,
}

impl From<&category::Model> for CategoriaRef {
    fn from(model: &category::Model) -> Self {
        Self {
            id: model.id,
            nombre: model.name.clone(),
        }
    }
}

impl From<category::Model> for CategoriaResponse {
    fn from(model: category::Model) -> Self {
        Self {
            id: model.id,
            nombre: model.name,
            descripcion: model.description,
            activo: model.active,
        }
    }
}

// ---------------------------------------------------------------------------
// Vehicles

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct VehiculoRequest {
    #[validate(length(min = 1, max = 50))]
    pub marca: String,
    #[validate(length(min = 1, max = 50))]
    pub modelo: String,
    #[validate(range(min = 1886, max = 2100))]
    pub anio: i32,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct VehiculoPatch {
    #[validate(length(min = 1, max = 50))]
    pub marca: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub modelo: Option<String>,
    #[validate(range(min = 1886, max = 2100))]
    pub anio: Option<i32>,
}

impl From<VehiculoRequest> for VehiculoPatch {
    fn from(req: VehiculoRequest) -> Self {
        Self {
            marca: Some(req.marca),
            modelo: Some(req.modelo),
            anio: Some(req.anio),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VehiculoResponse {
    pub id: i32,
    pub marca: String,
    pub modelo: String,
    pub anio: i32,
}

impl From<&vehicle::Model> for VehiculoResponse {
    fn from(model: &vehicle::Model) -> Self {
        Self {
            id: model.id,
            marca: model.brand.clone(),
            modelo: model.model.clone(),
            anio: model.year,
        }
    }
}

// ---------------------------------------------------------------------------
// Parts

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct RepuestoRequest {
    #[validate(length(min = 1, max = 200))]
    pub nombre: String,
    pub descripcion: Option<String>,
    pub categoria_id: Option<i32>,
    #[validate(length(max = 500))]
    pub imagen_url: Option<String>,
    /// Ids of compatible vehicles
    #[serde(default)]
    pub compatibilidad_ids: Vec<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct RepuestoPatch {
    #[validate(length(min = 1, max = 200))]
    pub nombre: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub descripcion: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub categoria_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub imagen_url: Option<Option<String>>,
    /// Replaces the whole compatibility set when present
    pub compatibilidad_ids: Option<Vec<i32>>,
}

impl From<RepuestoRequest> for RepuestoPatch {
    fn from(req: RepuestoRequest) -> Self {
        Self {
            nombre: Some(req.nombre),
            descripcion: Some(req.descripcion),
            categoria_id: Some(req.categoria_id),
            imagen_url: Some(req.imagen_url),
            compatibilidad_ids: Some(req.compatibilidad_ids),
        }
    }
}

/// Full part representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RepuestoResponse {
    pub id: i32,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub categoria: Option<CategoriaRef>,
    pub imagen_url: Option<String>,
    pub compatibilidad: Vec<VehiculoResponse>,
}

/// Branch summary used on the part side of the inventory relation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SucursalRef {
    pub id: i32,
    pub nombre: String,
    pub direccion: String,
    pub tienda_id: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InventarioSucursalResponse {
    pub id: i32,
    #[schema(value_type = String, example = "150000.00")]
    pub precio: Decimal,
    pub stock: i32,
    pub stock_minimo: i32,
    pub sucursal: SucursalRef,
}

/// Part plus every stock row carrying it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RepuestoConInventarioResponse {
    #[serde(flatten)]
    pub repuesto: RepuestoResponse,
    pub inventario_sucursales: Vec<InventarioSucursalResponse>,
}

// ---------------------------------------------------------------------------
// Stock rows

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct RepuestoSucursalRequest {
    pub sucursal_id: i32,
    pub repuesto_global_id: i32,
    #[validate(custom = "validate_price")]
    #[schema(value_type = String, example = "150000.00")]
    pub precio: Decimal,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub stock: i32,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub stock_minimo: i32,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct RepuestoSucursalPatch {
    pub sucursal_id: Option<i32>,
    pub repuesto_global_id: Option<i32>,
    #[validate(custom = "validate_price")]
    #[schema(value_type = Option<String>)]
    pub precio: Option<Decimal>,
    #[validate(range(min = 0))]
    pub stock: Option<i32>,
    #[validate(range(min = 0))]
    pub stock_minimo: Option<i32>,
}

impl From<RepuestoSucursalRequest> for RepuestoSucursalPatch {
    fn from(req: RepuestoSucursalRequest) -> Self {
        Self {
            sucursal_id: Some(req.sucursal_id),
            repuesto_global_id: Some(req.repuesto_global_id),
            precio: Some(req.precio),
            stock: Some(req.stock),
            stock_minimo: Some(req.stock_minimo),
        }
    }
}

/// Flat stock row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RepuestoSucursalResponse {
    pub id: i32,
    pub sucursal_id: i32,
    pub repuesto_global_id: i32,
    #[schema(value_type = String, example = "150000.00")]
    pub precio: Decimal,
    pub stock: i32,
    pub stock_minimo: i32,
    /// Stock at or below the minimum
    pub stock_bajo: bool,
}

impl From<stock::Model> for RepuestoSucursalResponse {
    fn from(model: stock::Model) -> Self {
        Self {
            stock_bajo: model.is_low(),
            id: model.id,
            sucursal_id: model.branch_id,
            repuesto_global_id: model.part_id,
            precio: money(model.price),
            stock: model.stock,
            stock_minimo: model.min_stock,
        }
    }
}

/// Stock row nested under a branch, carrying the full part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InventarioResponse {
    pub id: i32,
    #[schema(value_type = String, example = "150000.00")]
    pub precio: Decimal,
    pub stock: i32,
    pub stock_minimo: i32,
    pub repuesto_global: RepuestoResponse,
}

// ---------------------------------------------------------------------------
// Builders

/// Batch-loaded part data: parts by id, their categories and compatible
/// vehicles. Representations are built from this without further queries.
#[derive(Debug, Clone, Default)]
pub struct PartLookup {
    parts: HashMap<i32, part::Model>,
    categories: HashMap<i32, category::Model>,
    compat: HashMap<i32, Vec<vehicle::Model>>,
}

impl PartLookup {
    /// `links` pairs a part id with one compatible vehicle.
    pub fn new(
        parts: Vec<part::Model>,
        categories: Vec<category::Model>,
        links: Vec<(i32, vehicle::Model)>,
    ) -> Self {
        let mut compat: HashMap<i32, Vec<vehicle::Model>> = HashMap::new();
        for (part_id, vehicle) in links {
            compat.entry(part_id).or_default().push(vehicle);
        }
        for vehicles in compat.values_mut() {
            vehicles.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        }
        Self {
            parts: parts.into_iter().map(|p| (p.id, p)).collect(),
            categories: categories.into_iter().map(|c| (c.id, c)).collect(),
            compat,
        }
    }

    pub fn part(&self, id: i32) -> Option<&part::Model> {
        self.parts.get(&id)
    }

    pub fn represent(&self, part: &part::Model) -> RepuestoResponse {
        RepuestoResponse {
            id: part.id,
            nombre: part.name.clone(),
            descripcion: part.description.clone(),
            categoria: part
                .category_id
                .and_then(|id| self.categories.get(&id))
                .map(CategoriaRef::from),
            imagen_url: part.image_url.clone(),
            compatibilidad: self
                .compat
                .get(&part.id)
                .map(|vehicles| vehicles.iter().map(VehiculoResponse::from).collect())
                .unwrap_or_default(),
        }
    }

    /// Nested stock row; `None` when the part was not loaded.
    pub fn inventory_row(&self, row: &stock::Model) -> Option<InventarioResponse> {
        let part = self.part(row.part_id)?;
        Some(InventarioResponse {
            id: row.id,
            precio: money(row.price),
            stock: row.stock,
            stock_minimo: row.min_stock,
            repuesto_global: self.represent(part),
        })
    }
}

/// Part with its inventory across branches. `rows` may hold stock rows of
/// other parts; only those of `part` are kept, in id order.
pub fn part_with_inventory(
    part: &part::Model,
    lookup: &PartLookup,
    rows: &[stock::Model],
    branches: &HashMap<i32, branch::Model>,
) -> RepuestoConInventarioResponse {
    let mut own: Vec<&stock::Model> = rows.iter().filter(|r| r.part_id == part.id).collect();
    own.sort_by_key(|r| r.id);

    RepuestoConInventarioResponse {
        repuesto: lookup.represent(part),
        inventario_sucursales: own
            .into_iter()
            .filter_map(|row| {
                let branch = branches.get(&row.branch_id)?;
                Some(InventarioSucursalResponse {
                    id: row.id,
                    precio: money(row.price),
                    stock: row.stock,
                    stock_minimo: row.min_stock,
                    sucursal: SucursalRef {
                        id: branch.id,
                        nombre: branch.name.clone(),
                        direccion: branch.address.clone(),
                        tienda_id: branch.store_id,
                    },
                })
            })
            .collect(),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::entities::fold_text;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    pub fn category(id: i32, name: &str) -> category::Model {
        category::Model {
            id,
            name: name.into(),
            description: None,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn vehicle(id: i32, brand: &str, model: &str, year: i32) -> vehicle::Model {
        vehicle::Model {
            id,
            brand: brand.into(),
            model: model.into(),
            brand_folded: fold_text(brand),
            model_folded: fold_text(model),
            year,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn part(id: i32, name: &str, category_id: Option<i32>) -> part::Model {
        part::Model {
            id,
            name: name.into(),
            name_folded: fold_text(name),
            description: None,
            description_folded: None,
            category_id,
            image_url: None,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn stock(id: i32, branch_id: i32, part_id: i32) -> stock::Model {
        stock::Model {
            id,
            branch_id,
            part_id,
            price: dec!(150000),
            stock: 10,
            min_stock: 2,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn branch(id: i32, store_id: i32, name: &str) -> branch::Model {
        branch::Model {
            id,
            store_id,
            name: name.into(),
            name_folded: fold_text(name),
            address: format!("{} 123", name),
            phone: None,
            latitude: -25.2965,
            longitude: -57.6479,
            has_delivery: false,
            opening_time: None,
            closing_time: None,
            days_of_week: String::new(),
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    fn lookup() -> PartLookup {
        PartLookup::new(
            vec![part(1, "Pastillas de Freno", Some(10)), part(2, "Filtro de Aceite", None)],
            vec![category(10, "Frenos")],
            vec![
                (1, vehicle(6, "Toyota", "Corolla", 2015)),
                (1, vehicle(5, "Toyota", "Corolla", 2010)),
                (1, vehicle(7, "Ford", "Focus", 2012)),
            ],
        )
    }

    #[test]
    fn part_representation_embeds_category_and_sorted_compatibility() {
        let lookup = lookup();
        let repr = lookup.represent(lookup.part(1).unwrap());
        assert_eq!(repr.categoria.as_ref().unwrap().nombre, "Frenos");
        let years: Vec<(String, i32)> = repr
            .compatibilidad
            .iter()
            .map(|v| (v.marca.clone(), v.anio))
            .collect();
        assert_eq!(
            years,
            vec![
                ("Ford".to_string(), 2012),
                ("Toyota".to_string(), 2010),
                ("Toyota".to_string(), 2015)
            ]
        );

        let bare = lookup.represent(lookup.part(2).unwrap());
        assert!(bare.categoria.is_none());
        assert!(bare.compatibilidad.is_empty());
    }

    #[test]
    fn part_json_uses_api_keys() {
        let lookup = lookup();
        let json = serde_json::to_value(lookup.represent(lookup.part(1).unwrap())).unwrap();
        assert_eq!(json["categoria"], serde_json::json!({"id": 10, "nombre": "Frenos"}));
        assert_eq!(json["compatibilidad"][0]["marca"], "Ford");
        assert!(json.get("imagen_url").is_some());
    }

    #[test]
    fn inventory_lists_only_rows_of_the_part_with_branch_summary() {
        let lookup = lookup();
        let branches: HashMap<i32, branch::Model> = [branch(1, 9, "Asunción"), branch(2, 9, "San Lorenzo")]
            .into_iter()
            .map(|b| (b.id, b))
            .collect();
        let rows = vec![stock(4, 2, 1), stock(3, 1, 1), stock(5, 1, 2)];

        let repr = part_with_inventory(lookup.part(1).unwrap(), &lookup, &rows, &branches);
        let ids: Vec<i32> = repr.inventario_sucursales.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 4]);
        assert_eq!(repr.inventario_sucursales[0].sucursal.tienda_id, 9);
        assert_eq!(repr.inventario_sucursales[0].precio.to_string(), "150000.00");

        let json = serde_json::to_value(&repr).unwrap();
        assert_eq!(json["nombre"], "Pastillas de Freno");
        assert_eq!(json["inventario_sucursales"][1]["sucursal"]["nombre"], "San Lorenzo");
    }
}
