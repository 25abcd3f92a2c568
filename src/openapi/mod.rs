use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Repuestos Locator API",
        version = "1.0.0",
        description = r#"
# Repuestos Locator

Locate automotive spare parts across stores, their branches and independent workshops.

## Features

- **Catalog**: categories, vehicles and global parts with vehicle compatibility
- **Inventory**: price and stock of each part per branch, with low-stock flags
- **Locations**: stores with opening hours and location, branches and workshops
- **Search**: part filters by name, category, brand, model and year

## Error Handling

Errors use one JSON shape with an appropriate HTTP status code:

```json
{
  "error": "Conflict",
  "message": "Vehiculo already exists",
  "fields": ["marca", "modelo", "anio"],
  "request_id": "req-abc123xyz",
  "timestamp": "2025-03-02T10:30:00Z"
}
```

Uniqueness conflicts answer 409. Malformed bodies and numeric filters answer 400.
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "tiendas", description = "Stores with their branches and inventory"),
        (name = "sucursales", description = "Branches of a store"),
        (name = "categorias", description = "Part categories"),
        (name = "vehiculos", description = "Vehicles parts can fit"),
        (name = "repuestos", description = "Part search and global parts"),
        (name = "repuestos-sucursales", description = "Per-branch price and stock"),
        (name = "profesionales", description = "Independent workshops")
    ),
    paths(
        // Stores
        crate::handlers::stores::list_stores,
        crate::handlers::stores::get_store,
        crate::handlers::stores::create_store,
        crate::handlers::stores::replace_store,
        crate::handlers::stores::update_store,
        crate::handlers::stores::delete_store,

        // Branches
        crate::handlers::branches::list_branches,
        crate::handlers::branches::get_branch,
        crate::handlers::branches::create_branch,
        crate::handlers::branches::replace_branch,
        crate::handlers::branches::update_branch,
        crate::handlers::branches::delete_branch,

        // Categories
        crate::handlers::categories::list_categories,
        crate::handlers::categories::get_category,
        crate::handlers::categories::create_category,
        crate::handlers::categories::replace_category,
        crate::handlers::categories::update_category,
        crate::handlers::categories::delete_category,

        // Vehicles
        crate::handlers::vehicles::list_vehicles,
        crate::handlers::vehicles::get_vehicle,
        crate::handlers::vehicles::create_vehicle,
        crate::handlers::vehicles::replace_vehicle,
        crate::handlers::vehicles::update_vehicle,
        crate::handlers::vehicles::delete_vehicle,

        // Parts
        crate::handlers::parts::search_parts,
        crate::handlers::parts::list_global_parts,
        crate::handlers::parts::get_part,
        crate::handlers::parts::create_part,
        crate::handlers::parts::replace_part,
        crate::handlers::parts::update_part,
        crate::handlers::parts::delete_part,

        // Stock
        crate::handlers::stock::list_stock,
        crate::handlers::stock::get_stock,
        crate::handlers::stock::create_stock,
        crate::handlers::stock::replace_stock,
        crate::handlers::stock::update_stock,
        crate::handlers::stock::delete_stock,

        // Professionals
        crate::handlers::professionals::list_professionals,
        crate::handlers::professionals::get_professional,
        crate::handlers::professionals::create_professional,
        crate::handlers::professionals::replace_professional,
        crate::handlers::professionals::update_professional,
        crate::handlers::professionals::delete_professional,
    ),
    components(
        schemas(
            // Locations
            crate::dto::TiendaRequest,
            crate::dto::TiendaPatch,
            crate::dto::TiendaResponse,
            crate::dto::SucursalRequest,
            crate::dto::SucursalPatch,
            crate::dto::SucursalResponse,
            crate::dto::ProfesionalRequest,
            crate::dto::ProfesionalPatch,
            crate::dto::ProfesionalResponse,

            // Catalog
            crate::dto::CategoriaRequest,
            crate::dto::CategoriaPatch,
            crate::dto::CategoriaRef,
            crate::dto::CategoriaResponse,
            crate::dto::VehiculoRequest,
            crate::dto::VehiculoPatch,
            crate::dto::VehiculoResponse,
            crate::dto::RepuestoRequest,
            crate::dto::RepuestoPatch,
            crate::dto::RepuestoResponse,
            crate::dto::RepuestoConInventarioResponse,
            crate::dto::SucursalRef,
            crate::dto::InventarioSucursalResponse,
            crate::dto::InventarioResponse,
            crate::dto::RepuestoSucursalRequest,
            crate::dto::RepuestoSucursalPatch,
            crate::dto::RepuestoSucursalResponse,

            // Shared value types
            crate::geo::GeoJsonPoint,
            crate::hours::DayCode,
            crate::entities::professional::ServiceType,

            // Error types
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_resource() {
        let openapi = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&openapi).unwrap();
        assert!(json.contains("Repuestos Locator API"));
        for path in [
            "/api/tiendas/",
            "/api/sucursales/{id}/",
            "/api/categorias/",
            "/api/vehiculos/{id}/",
            "/api/repuestos/",
            "/api/repuestos-globales/{id}/",
            "/api/repuestos-sucursales/",
            "/api/profesionales/{id}/",
        ] {
            assert!(json.contains(path), "missing {path}");
        }
    }
}
