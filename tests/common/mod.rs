#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use sea_orm::ConnectionTrait;
use serde_json::{json, Value};
use tower::ServiceExt;

use repuestos_locator::{
    app_router,
    config::AppConfig,
    db::{self, DbConfig},
    AppState,
};

/// Every weekday, in the API's wire form.
pub const ALL_DAYS: [&str; 7] = ["LUN", "MAR", "MIE", "JUE", "VIE", "SAB", "DOM"];

/// Helper harness for spinning up the full application backed by an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Construct a new test application with a fresh, migrated database.
    pub async fn new() -> Self {
        let cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );

        // One connection: every in-memory SQLite connection is its own database.
        let pool = db::establish_connection_with_config(&DbConfig {
            url: cfg.database_url.clone(),
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        })
        .await
        .expect("failed to create test database");

        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool), cfg);
        let router = app_router(state.clone());

        Self { router, state }
    }

    /// Send a request against the router.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.raw(request).await
    }

    /// Send a prebuilt request against the router.
    pub async fn raw(&self, request: Request<Body>) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Request whose response body is parsed as JSON (`Null` when empty).
    pub async fn json(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
            }
            None => Body::empty(),
        };
        self.send(builder.body(body).expect("failed to build request"))
            .await
    }

    /// Prebuilt request whose response body is parsed as JSON.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.raw(request).await;
        let status = response.status();
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read response body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("parse response body")
        };
        (status, value)
    }

    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        self.json(Method::GET, uri, None).await
    }

    pub async fn get_html(&self, uri: &str) -> (StatusCode, String) {
        let response = self.request(Method::GET, uri, None).await;
        let status = response.status();
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read response body");
        (status, String::from_utf8(bytes.to_vec()).expect("utf-8 body"))
    }

    /// POST that must answer 201; returns the created representation.
    pub async fn create(&self, uri: &str, payload: Value) -> Value {
        let (status, body) = self.json(Method::POST, uri, Some(payload)).await;
        assert_eq!(status, StatusCode::CREATED, "POST {uri} failed: {body}");
        body
    }

    pub async fn create_category(&self, nombre: &str) -> i32 {
        id_of(&self.create("/api/categorias/", json!({ "nombre": nombre })).await)
    }

    pub async fn create_vehicle(&self, marca: &str, modelo: &str, anio: i32) -> i32 {
        id_of(
            &self
                .create(
                    "/api/vehiculos/",
                    json!({ "marca": marca, "modelo": modelo, "anio": anio }),
                )
                .await,
        )
    }

    pub async fn create_store(&self, nombre: &str) -> i32 {
        id_of(
            &self
                .create(
                    "/api/tiendas/",
                    json!({
                        "nombre": nombre,
                        "email": "contacto@example.com",
                        "tiene_delivery": true,
                        "ubicacion": { "type": "Point", "coordinates": [-57.6479, -25.2965] },
                        "hora_apertura": "00:00:00",
                        "hora_cierre": "23:59:59",
                        "dias_semana": ALL_DAYS,
                    }),
                )
                .await,
        )
    }

    pub async fn create_branch(&self, tienda_id: i32, nombre: &str) -> i32 {
        id_of(
            &self
                .create(
                    "/api/sucursales/",
                    json!({
                        "tienda_id": tienda_id,
                        "nombre": nombre,
                        "direccion": format!("{nombre} 123"),
                        "ubicacion": { "type": "Point", "coordinates": [-57.5, -25.34] },
                    }),
                )
                .await,
        )
    }

    pub async fn create_part(
        &self,
        nombre: &str,
        categoria_id: Option<i32>,
        compatibilidad_ids: &[i32],
    ) -> i32 {
        id_of(
            &self
                .create(
                    "/api/repuestos-globales/",
                    json!({
                        "nombre": nombre,
                        "descripcion": format!("{nombre} de prueba"),
                        "categoria_id": categoria_id,
                        "compatibilidad_ids": compatibilidad_ids,
                    }),
                )
                .await,
        )
    }

    pub async fn create_stock(&self, sucursal_id: i32, repuesto_global_id: i32, stock: i32) -> i32 {
        id_of(
            &self
                .create(
                    "/api/repuestos-sucursales/",
                    json!({
                        "sucursal_id": sucursal_id,
                        "repuesto_global_id": repuesto_global_id,
                        "precio": "150000",
                        "stock": stock,
                        "stock_minimo": 2,
                    }),
                )
                .await,
        )
    }

    /// Inserts `count` bare parts named "Repuesto 00001".. straight through SQL.
    pub async fn bulk_insert_parts(&self, count: u32) {
        let sql = format!(
            "WITH RECURSIVE seq(n) AS (SELECT 1 UNION ALL SELECT n + 1 FROM seq WHERE n < {count}) \
             INSERT INTO parts (name, name_folded, active, created_at, updated_at) \
             SELECT printf('Repuesto %05d', n), printf('repuesto %05d', n), 1, \
             '2025-01-01T00:00:00+00:00', '2025-01-01T00:00:00+00:00' FROM seq"
        );
        self.state
            .db
            .execute_unprepared(&sql)
            .await
            .expect("bulk insert of parts failed");
    }

    /// Demo catalogue: only "Disco de Freno" fits the 2015 Corolla.
    pub async fn seed_catalog(&self) -> Catalog {
        let frenos = self.create_category("Frenos").await;
        let motor = self.create_category("Motor").await;

        let corolla_2010 = self.create_vehicle("Toyota", "Corolla", 2010).await;
        let corolla_2015 = self.create_vehicle("Toyota", "Corolla", 2015).await;
        let focus_2012 = self.create_vehicle("Ford", "Focus", 2012).await;

        let pastillas = self
            .create_part("Pastillas de Freno Delanteras", Some(frenos), &[corolla_2010, focus_2012])
            .await;
        let disco = self
            .create_part("Disco de Freno", Some(frenos), &[corolla_2015])
            .await;
        let filtro = self
            .create_part("Filtro de Aceite", Some(motor), &[corolla_2010, focus_2012])
            .await;

        let tienda = self.create_store("Repuestos Central").await;
        let asuncion = self.create_branch(tienda, "Sucursal Asunción").await;
        let san_lorenzo = self.create_branch(tienda, "Sucursal San Lorenzo").await;

        self.create_stock(asuncion, pastillas, 10).await;
        self.create_stock(asuncion, filtro, 25).await;
        self.create_stock(san_lorenzo, disco, 1).await;

        Catalog {
            frenos,
            motor,
            corolla_2010,
            corolla_2015,
            focus_2012,
            pastillas,
            disco,
            filtro,
            tienda,
            asuncion,
            san_lorenzo,
        }
    }
}

/// Ids created by [`TestApp::seed_catalog`].
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    pub frenos: i32,
    pub motor: i32,
    pub corolla_2010: i32,
    pub corolla_2015: i32,
    pub focus_2012: i32,
    pub pastillas: i32,
    pub disco: i32,
    pub filtro: i32,
    pub tienda: i32,
    pub asuncion: i32,
    pub san_lorenzo: i32,
}

pub fn id_of(body: &Value) -> i32 {
    body["id"].as_i64().expect("response carries an id") as i32
}

/// Names of every item in a JSON array response.
pub fn names(body: &Value, field: &str) -> Vec<String> {
    body.as_array()
        .expect("array response")
        .iter()
        .map(|item| item[field].as_str().unwrap_or_default().to_string())
        .collect()
}
