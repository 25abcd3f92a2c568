mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{id_of, names, TestApp, ALL_DAYS};

#[tokio::test]
async fn store_tree_nests_branches_stock_and_parts() {
    let app = TestApp::new().await;
    let catalog = app.seed_catalog().await;

    let (status, store) = app
        .get_json(&format!("/api/tiendas/{}/", catalog.tienda))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(store["nombre"], "Repuestos Central");
    assert_eq!(store["dias_semana"], json!(ALL_DAYS));
    assert_eq!(store["ubicacion"]["type"], "Point");
    assert_eq!(
        names(&store["sucursales"], "nombre"),
        vec!["Sucursal Asunción", "Sucursal San Lorenzo"]
    );

    let asuncion = &store["sucursales"][0];
    assert_eq!(asuncion["tienda_id"], catalog.tienda);
    let inventory = asuncion["inventario"].as_array().unwrap();
    assert_eq!(inventory.len(), 2);
    for row in inventory {
        let part = &row["repuesto_global"];
        assert!(part["categoria"]["nombre"].is_string());
        assert!(!part["compatibilidad"].as_array().unwrap().is_empty());
        // Tree stops at the part: no reverse edge back to branches.
        assert!(part.get("inventario_sucursales").is_none());
    }

    let san_lorenzo = &store["sucursales"][1];
    assert_eq!(san_lorenzo["inventario"][0]["repuesto_global"]["id"], catalog.disco);
}

#[tokio::test]
async fn branch_tree_only_holds_its_own_rows() {
    let app = TestApp::new().await;
    let catalog = app.seed_catalog().await;
    let other_store = app.create_store("Repuestos del Sur").await;
    let other_branch = app.create_branch(other_store, "Sucursal Luque").await;
    app.create_stock(other_branch, catalog.filtro, 3).await;

    let (_, store) = app
        .get_json(&format!("/api/tiendas/{}/", other_store))
        .await;
    assert_eq!(names(&store["sucursales"], "nombre"), vec!["Sucursal Luque"]);
    assert_eq!(store["sucursales"][0]["inventario"].as_array().unwrap().len(), 1);

    let (_, branches) = app.get_json("/api/sucursales/").await;
    assert_eq!(branches.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn deleting_a_store_cascades_to_branches_and_stock() {
    let app = TestApp::new().await;
    let catalog = app.seed_catalog().await;

    let response = app
        .request(Method::DELETE, &format!("/api/tiendas/{}/", catalog.tienda), None)
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let (status, _) = app
        .get_json(&format!("/api/tiendas/{}/", catalog.tienda))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    for branch in [catalog.asuncion, catalog.san_lorenzo] {
        let (status, _) = app.get_json(&format!("/api/sucursales/{}/", branch)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
    let (_, stock) = app.get_json("/api/repuestos-sucursales/").await;
    assert_eq!(stock.as_array().unwrap().len(), 0);

    // Parts themselves survive, now without inventory.
    let (status, part) = app
        .get_json(&format!("/api/repuestos-globales/{}/", catalog.pastillas))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(part["inventario_sucursales"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn deleting_a_branch_removes_its_stock_only() {
    let app = TestApp::new().await;
    let catalog = app.seed_catalog().await;

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/sucursales/{}/", catalog.asuncion),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let (_, stock) = app.get_json("/api/repuestos-sucursales/").await;
    let rows = stock.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["sucursal_id"], catalog.san_lorenzo);
}

#[tokio::test]
async fn store_names_are_unique() {
    let app = TestApp::new().await;
    app.create_store("Repuestos Central").await;

    let (status, body) = app
        .json(
            Method::POST,
            "/api/tiendas/",
            Some(json!({ "nombre": "Repuestos Central" })),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["fields"], json!(["nombre"]));
}

#[tokio::test]
async fn store_patch_keeps_absent_fields_and_clears_nulls() {
    let app = TestApp::new().await;
    let id = app.create_store("Repuestos Central").await;

    let (status, store) = app
        .json(
            Method::PATCH,
            &format!("/api/tiendas/{}/", id),
            Some(json!({ "telefono": "0981 123 456", "email": null })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(store["nombre"], "Repuestos Central");
    assert_eq!(store["telefono"], "0981 123 456");
    assert!(store["email"].is_null());
    assert_eq!(store["hora_apertura"], "00:00:00");
}

#[tokio::test]
async fn store_payloads_are_validated() {
    let app = TestApp::new().await;
    let id = app.create_store("Repuestos Central").await;

    let (status, _) = app
        .json(
            Method::POST,
            "/api/tiendas/",
            Some(json!({ "nombre": "Sin Email", "email": "no-es-un-email" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .json(
            Method::PATCH,
            &format!("/api/tiendas/{}/", id),
            Some(json!({ "ubicacion": { "type": "Point", "coordinates": [-57.6, -95.0] } })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .json(
            Method::PATCH,
            &format!("/api/tiendas/{}/", id),
            Some(json!({ "dias_semana": ["LUNES"] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"], "INVALID_JSON");
}

#[tokio::test]
async fn branch_requires_an_existing_store() {
    let app = TestApp::new().await;

    let (status, body) = app
        .json(
            Method::POST,
            "/api/sucursales/",
            Some(json!({
                "tienda_id": 999,
                "nombre": "Huérfana",
                "direccion": "Sin calle",
                "ubicacion": { "type": "Point", "coordinates": [-57.5, -25.3] },
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("tienda_id"));
}

#[tokio::test]
async fn professionals_crud_and_featured_ordering() {
    let app = TestApp::new().await;

    let regular = app
        .create(
            "/api/profesionales/",
            json!({
                "nombre_taller": "Alfa Taller",
                "direccion": "Av. España 100",
                "tipos_servicio": ["PINTURA", "MECANICA"],
                "ubicacion": { "type": "Point", "coordinates": [-57.6, -25.3] },
            }),
        )
        .await;
    assert_eq!(regular["tipos_servicio"], json!(["MECANICA", "PINTURA"]));
    assert_eq!(regular["destacado"], false);

    let featured = app
        .create(
            "/api/profesionales/",
            json!({
                "nombre_taller": "Zeta Mecánica",
                "direccion": "Ruta 1 km 20",
                "destacado": true,
                "ubicacion": { "type": "Point", "coordinates": [-57.4, -25.4] },
            }),
        )
        .await;

    let (_, list) = app.get_json("/api/profesionales/").await;
    assert_eq!(
        names(&list, "nombre_taller"),
        vec!["Zeta Mecánica", "Alfa Taller"]
    );

    let (status, patched) = app
        .json(
            Method::PATCH,
            &format!("/api/profesionales/{}/", id_of(&regular)),
            Some(json!({ "jefe_mecanico": "Don Ramón", "tipos_servicio": ["ELECTRICIDAD"] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["jefe_mecanico"], "Don Ramón");
    assert_eq!(patched["tipos_servicio"], json!(["ELECTRICIDAD"]));
    assert_eq!(patched["direccion"], "Av. España 100");

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/profesionales/{}/", id_of(&featured)),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let (status, _) = app
        .get_json(&format!("/api/profesionales/{}/", id_of(&featured)))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
