//! Repuestos Locator
//!
//! Locates automotive spare parts across stores, their branches and
//! independent workshops. Exposes a JSON REST API and server-rendered map
//! pages over the same catalog.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod dto;
pub mod entities;
pub mod errors;
pub mod geo;
pub mod handlers;
pub mod hours;
pub mod middleware_helpers;
pub mod migrator;
pub mod openapi;
pub mod queries;
pub mod repositories;
pub mod services;
pub mod tracing;

use axum::{http::HeaderValue, response::Json, routing::get, Router};
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

impl AppState {
    /// Wires every service over one shared connection pool.
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        let services = handlers::AppServices::new(db.clone());
        Self {
            db,
            config,
            services,
        }
    }

    pub fn catalog_service(&self) -> Arc<services::catalog::CatalogService> {
        self.services.catalog.clone()
    }

    pub fn location_service(&self) -> Arc<services::locations::LocationService> {
        self.services.locations.clone()
    }

    pub fn locator_service(&self) -> Arc<services::locator::LocatorService> {
        self.services.locator.clone()
    }
}

/// REST resources, map pages, health checks and API docs
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(api_status))
        .merge(handlers::health::health_routes())
        .merge(handlers::pages::page_routes())
        .merge(handlers::stores::store_routes())
        .merge(handlers::branches::branch_routes())
        .merge(handlers::categories::category_routes())
        .merge(handlers::vehicles::vehicle_routes())
        .merge(handlers::parts::part_routes())
        .merge(handlers::stock::stock_routes())
        .merge(handlers::professionals::professional_routes())
}

/// Builds the CORS layer from config. Without explicit origins and outside
/// the permissive environments, no cross-origin request is allowed.
pub fn cors_layer(cfg: &config::AppConfig) -> CorsLayer {
    let configured_origins: Option<Vec<HeaderValue>> = cfg
        .cors_allowed_origins
        .as_ref()
        .map(|raw| {
            raw.split(',')
                .filter_map(|origin| {
                    let trimmed = origin.trim();
                    if trimmed.is_empty() {
                        None
                    } else {
                        HeaderValue::from_str(trimmed).ok()
                    }
                })
                .collect::<Vec<_>>()
        })
        .filter(|origins| !origins.is_empty());

    if let Some(origins) = configured_origins {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    } else if cfg.should_allow_permissive_cors() {
        ::tracing::info!(
            environment = %cfg.environment,
            "Using permissive CORS because explicit origins were not configured"
        );
        CorsLayer::permissive()
    } else {
        ::tracing::warn!("No CORS origins configured; cross-origin requests are rejected");
        CorsLayer::new()
    }
}

/// Full application: routes, Swagger UI and the HTTP middleware stack.
pub fn app_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    let timeout = state.config.request_timeout();

    Router::<AppState>::new()
        .merge(api_routes())
        .merge(openapi::swagger_ui())
        // HTTP tracing layer for consistent request/response telemetry
        .layer(tracing::configure_http_tracing())
        // Apply compression and timeouts
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(timeout))
        // Apply CORS
        .layer(cors)
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        ))
        .with_state(state)
}

async fn api_status() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "repuestos-locator",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

pub mod prelude {
    pub use crate::db::*;
    pub use crate::dto::*;
    pub use crate::errors::*;
    pub use crate::geo::{FeatureCollection, GeoPoint};
    pub use crate::hours::{OpenStatus, OpeningHours, WeekdaySet};
    pub use crate::services::{catalog::CatalogService, locations::LocationService, locator::LocatorService};
}
