use crate::errors::ServiceError;
use async_trait::async_trait;
use sea_orm::DatabaseConnection;

pub mod part_filter;

pub use part_filter::{PartClause, PartFilter, PartFilterParams, SearchPartsQuery};

/// A read-only query executed against the pool.
#[async_trait]
pub trait Query: Send + Sync {
    type Result: Send + Sync;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError>;
}
