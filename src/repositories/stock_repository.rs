use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use std::sync::Arc;

use crate::dto::{RepuestoSucursalPatch, RepuestoSucursalRequest};
use crate::entities::stock::{self, ActiveModel as StockActiveModel, Column, Entity as Stock};
use crate::entities::{branch, part};
use crate::errors::ServiceError;
use crate::repositories::{ensure_exists, load_chunked, Repository};

use super::BaseRepository;

const ENTITY: &str = "RepuestoSucursal";
const PAIR_FIELDS: &[&str] = &["sucursal_id", "repuesto_global_id"];

/// Repository for per-branch stock and price rows
#[derive(Debug, Clone)]
pub struct StockRepository {
    base: BaseRepository,
}

impl StockRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> Result<Vec<stock::Model>, ServiceError> {
        Ok(Stock::find()
            .order_by_asc(Column::Id)
            .all(self.get_db())
            .await?)
    }

    pub async fn get(&self, id: i32) -> Result<stock::Model, ServiceError> {
        Stock::find_by_id(id)
            .one(self.get_db())
            .await?
            .ok_or_else(|| ServiceError::not_found(ENTITY, id))
    }

    /// Stock rows held by any of the given branches
    pub async fn find_by_branch_ids(
        &self,
        branch_ids: Vec<i32>,
    ) -> Result<Vec<stock::Model>, ServiceError> {
        let db = self.get_db();
        let mut rows = load_chunked(&branch_ids, |chunk| {
            Stock::find().filter(Column::BranchId.is_in(chunk)).all(db)
        })
        .await?;
        rows.sort_by_key(|row| row.id);
        Ok(rows)
    }

    /// Stock rows carrying any of the given parts
    pub async fn find_by_part_ids(
        &self,
        part_ids: Vec<i32>,
    ) -> Result<Vec<stock::Model>, ServiceError> {
        let db = self.get_db();
        let mut rows = load_chunked(&part_ids, |chunk| {
            Stock::find().filter(Column::PartId.is_in(chunk)).all(db)
        })
        .await?;
        rows.sort_by_key(|row| row.id);
        Ok(rows)
    }

    async fn ensure_pair_free(
        &self,
        branch_id: i32,
        part_id: i32,
        except: Option<i32>,
    ) -> Result<(), ServiceError> {
        let mut query = Stock::find()
            .filter(Column::BranchId.eq(branch_id))
            .filter(Column::PartId.eq(part_id));
        if let Some(id) = except {
            query = query.filter(Column::Id.ne(id));
        }
        match query.limit(1).one(self.get_db()).await? {
            Some(_) => Err(ServiceError::duplicate(ENTITY, PAIR_FIELDS)),
            None => Ok(()),
        }
    }

    pub async fn create(&self, req: RepuestoSucursalRequest) -> Result<stock::Model, ServiceError> {
        ensure_exists::<branch::Entity, _>(self.get_db(), req.sucursal_id, "sucursal_id").await?;
        ensure_exists::<part::Entity, _>(self.get_db(), req.repuesto_global_id, "repuesto_global_id")
            .await?;
        self.ensure_pair_free(req.sucursal_id, req.repuesto_global_id, None)
            .await?;

        StockActiveModel {
            branch_id: Set(req.sucursal_id),
            part_id: Set(req.repuesto_global_id),
            price: Set(req.precio),
            stock: Set(req.stock),
            min_stock: Set(req.stock_minimo),
            ..Default::default()
        }
        .insert(self.get_db())
        .await
        .map_err(|e| ServiceError::from_write(e, ENTITY, PAIR_FIELDS))
    }

    pub async fn update(
        &self,
        id: i32,
        patch: RepuestoSucursalPatch,
    ) -> Result<stock::Model, ServiceError> {
        let existing = self.get(id).await?;
        if let Some(branch_id) = patch.sucursal_id {
            ensure_exists::<branch::Entity, _>(self.get_db(), branch_id, "sucursal_id").await?;
        }
        if let Some(part_id) = patch.repuesto_global_id {
            ensure_exists::<part::Entity, _>(self.get_db(), part_id, "repuesto_global_id").await?;
        }
        let branch_id = patch.sucursal_id.unwrap_or(existing.branch_id);
        let part_id = patch.repuesto_global_id.unwrap_or(existing.part_id);
        self.ensure_pair_free(branch_id, part_id, Some(id)).await?;

        let mut active_model: StockActiveModel = existing.into();
        active_model.branch_id = Set(branch_id);
        active_model.part_id = Set(part_id);
        if let Some(price) = patch.precio {
            active_model.price = Set(price);
        }
        if let Some(stock) = patch.stock {
            active_model.stock = Set(stock);
        }
        if let Some(min_stock) = patch.stock_minimo {
            active_model.min_stock = Set(min_stock);
        }
        active_model
            .update(self.get_db())
            .await
            .map_err(|e| ServiceError::from_write(e, ENTITY, PAIR_FIELDS))
    }

    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.get(id).await?;
        Stock::delete_by_id(id).exec(self.get_db()).await?;
        Ok(())
    }
}

impl Repository for StockRepository {
    fn get_db(&self) -> &DatabaseConnection {
        self.base.get_db()
    }
}
