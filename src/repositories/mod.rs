use crate::errors::ServiceError;
use crate::queries::part_filter::like_contains;
use sea_orm::sea_query::{Expr, LikeExpr, SimpleExpr};
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, IdenStatic, PrimaryKeyTrait,
};
use std::future::Future;
use std::sync::Arc;

pub mod branch_repository;
pub mod category_repository;
pub mod part_repository;
pub mod professional_repository;
pub mod stock_repository;
pub mod store_repository;
pub mod vehicle_repository;

pub use branch_repository::BranchRepository;
pub use category_repository::CategoryRepository;
pub use part_repository::PartRepository;
pub use professional_repository::ProfessionalRepository;
pub use stock_repository::StockRepository;
pub use store_repository::StoreRepository;
pub use vehicle_repository::VehicleRepository;

/// Repository trait for common database operations
pub trait Repository {
    fn get_db(&self) -> &DatabaseConnection;
}

#[derive(Debug, Clone)]
pub struct BaseRepository {
    db: Arc<DatabaseConnection>,
}

impl BaseRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl Repository for BaseRepository {
    fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Fails with a validation error when the referenced row is missing.
/// `field` is the API name of the referencing field.
pub(crate) async fn ensure_exists<E, C>(db: &C, id: i32, field: &str) -> Result<(), ServiceError>
where
    E: EntityTrait,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = i32>,
    C: ConnectionTrait,
{
    match E::find_by_id(id).one(db).await? {
        Some(_) => Ok(()),
        None => Err(ServiceError::ValidationError(format!(
            "{}: no row with id {}",
            field, id
        ))),
    }
}

/// Case-insensitive substring match on a `*_folded` shadow column.
pub(crate) fn name_contains<E, C>(entity: E, folded_column: C, term: &str) -> SimpleExpr
where
    E: IdenStatic,
    C: IdenStatic,
{
    Expr::col((entity, folded_column)).like(LikeExpr::new(like_contains(term)).escape('\\'))
}

/// Most ids bound into a single `IN (...)` list.
pub const ID_CHUNK_SIZE: usize = 1000;

/// Runs `load` once per chunk of at most [`ID_CHUNK_SIZE`] ids and
/// concatenates the rows in chunk order.
pub(crate) async fn load_chunked<T, F, Fut>(ids: &[i32], mut load: F) -> Result<Vec<T>, DbErr>
where
    F: FnMut(Vec<i32>) -> Fut,
    Fut: Future<Output = Result<Vec<T>, DbErr>>,
{
    let mut rows = Vec::new();
    for chunk in ids.chunks(ID_CHUNK_SIZE) {
        rows.extend(load(chunk.to_vec()).await?);
    }
    Ok(rows)
}

