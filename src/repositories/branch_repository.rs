use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use std::sync::Arc;

use crate::dto::{SucursalPatch, SucursalRequest};
use crate::entities::branch::{self, ActiveModel as BranchActiveModel, Column, Entity as Branch};
use crate::entities::{stock, store};
use crate::errors::ServiceError;
use crate::repositories::{ensure_exists, load_chunked, name_contains, Repository};

use super::BaseRepository;

const ENTITY: &str = "Sucursal";

/// Repository for branches
#[derive(Debug, Clone)]
pub struct BranchRepository {
    base: BaseRepository,
}

impl BranchRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All branches, ordered by store then name
    pub async fn find_all(&self) -> Result<Vec<branch::Model>, ServiceError> {
        Ok(Branch::find()
            .order_by_asc(Column::StoreId)
            .order_by_asc(Column::Name)
            .order_by_asc(Column::Id)
            .all(self.get_db())
            .await?)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<branch::Model>, ServiceError> {
        Ok(Branch::find_by_id(id).one(self.get_db()).await?)
    }

    pub async fn get(&self, id: i32) -> Result<branch::Model, ServiceError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(ENTITY, id))
    }

    /// Branches of the given stores, ordered by store then name
    pub async fn find_by_store_ids(
        &self,
        store_ids: Vec<i32>,
    ) -> Result<Vec<branch::Model>, ServiceError> {
        let db = self.get_db();
        let mut branches = load_chunked(&store_ids, |chunk| {
            Branch::find().filter(Column::StoreId.is_in(chunk)).all(db)
        })
        .await?;
        branches.sort_by(|a, b| (a.store_id, &a.name, a.id).cmp(&(b.store_id, &b.name, b.id)));
        Ok(branches)
    }

    pub async fn find_by_ids(&self, ids: Vec<i32>) -> Result<Vec<branch::Model>, ServiceError> {
        let db = self.get_db();
        Ok(load_chunked(&ids, |chunk| {
            Branch::find().filter(Column::Id.is_in(chunk)).all(db)
        })
        .await?)
    }

    pub async fn search_by_name(&self, term: &str) -> Result<Vec<branch::Model>, ServiceError> {
        Ok(Branch::find()
            .filter(name_contains(Branch, Column::NameFolded, term))
            .order_by_asc(Column::StoreId)
            .order_by_asc(Column::Name)
            .order_by_asc(Column::Id)
            .all(self.get_db())
            .await?)
    }

    pub async fn create(&self, req: SucursalRequest) -> Result<branch::Model, ServiceError> {
        ensure_exists::<store::Entity, _>(self.get_db(), req.tienda_id, "tienda_id").await?;

        let mut active_model = <BranchActiveModel as Default>::default();
        apply_patch(&mut active_model, SucursalPatch::from(req));
        active_model
            .insert(self.get_db())
            .await
            .map_err(|e| ServiceError::from_write(e, ENTITY, &["tienda_id"]))
    }

    pub async fn update(
        &self,
        id: i32,
        patch: SucursalPatch,
    ) -> Result<branch::Model, ServiceError> {
        let existing = self.get(id).await?;
        if let Some(store_id) = patch.tienda_id {
            ensure_exists::<store::Entity, _>(self.get_db(), store_id, "tienda_id").await?;
        }

        let mut active_model: BranchActiveModel = existing.into();
        apply_patch(&mut active_model, patch);
        active_model
            .update(self.get_db())
            .await
            .map_err(|e| ServiceError::from_write(e, ENTITY, &["tienda_id"]))
    }

    /// Deletes the branch and its stock rows in one transaction.
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.get(id).await?;

        let txn = self.get_db().begin().await?;
        stock::Entity::delete_many()
            .filter(stock::Column::BranchId.eq(id))
            .exec(&txn)
            .await?;
        Branch::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        Ok(())
    }
}

fn apply_patch(active_model: &mut BranchActiveModel, patch: SucursalPatch) {
    if let Some(store_id) = patch.tienda_id {
        active_model.store_id = Set(store_id);
    }
    if let Some(name) = patch.nombre {
        active_model.name = Set(name);
    }
    if let Some(address) = patch.direccion {
        active_model.address = Set(address);
    }
    if let Some(phone) = patch.telefono {
        active_model.phone = Set(phone);
    }
    if let Some(point) = patch.ubicacion {
        active_model.latitude = Set(point.latitude());
        active_model.longitude = Set(point.longitude());
    }
    if let Some(has_delivery) = patch.tiene_delivery {
        active_model.has_delivery = Set(has_delivery);
    }
    if let Some(opening) = patch.hora_apertura {
        active_model.opening_time = Set(opening);
    }
    if let Some(closing) = patch.hora_cierre {
        active_model.closing_time = Set(closing);
    }
    if let Some(days) = patch.dias_semana {
        active_model.days_of_week = Set(days.to_db_string());
    }
}

impl Repository for BranchRepository {
    fn get_db(&self) -> &DatabaseConnection {
        self.base.get_db()
    }
}
