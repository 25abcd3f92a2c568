pub mod branches;
pub mod categories;
pub mod common;
pub mod health;
pub mod pages;
pub mod parts;
pub mod professionals;
pub mod stock;
pub mod stores;
pub mod vehicles;

use crate::db::DbPool;
use crate::services::{catalog::CatalogService, locations::LocationService, locator::LocatorService};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub catalog: Arc<CatalogService>,
    pub locations: Arc<LocationService>,
    pub locator: Arc<LocatorService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        let catalog = CatalogService::new(db_pool.clone());
        let locations = LocationService::new(db_pool.clone(), catalog.clone());
        let locator = LocatorService::new(db_pool);

        Self {
            catalog: Arc::new(catalog),
            locations: Arc::new(locations),
            locator: Arc::new(locator),
        }
    }
}
