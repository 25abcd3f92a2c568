use sea_orm::sea_query;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::sync::Arc;

use crate::dto::{TiendaPatch, TiendaRequest};
use crate::entities::store::{self, ActiveModel as StoreActiveModel, Column, Entity as Store};
use crate::entities::{branch, stock};
use crate::errors::ServiceError;
use crate::repositories::{name_contains, Repository};

use super::BaseRepository;

const ENTITY: &str = "Tienda";
const NAME_FIELDS: &[&str] = &["nombre"];

/// Repository for stores
#[derive(Debug, Clone)]
pub struct StoreRepository {
    base: BaseRepository,
}

impl StoreRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All stores, ordered by name
    pub async fn find_all(&self) -> Result<Vec<store::Model>, ServiceError> {
        Ok(Store::find()
            .order_by_asc(Column::Name)
            .order_by_asc(Column::Id)
            .all(self.get_db())
            .await?)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<store::Model>, ServiceError> {
        Ok(Store::find_by_id(id).one(self.get_db()).await?)
    }

    pub async fn get(&self, id: i32) -> Result<store::Model, ServiceError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(ENTITY, id))
    }

    /// Stores whose name contains `term`, case-insensitively
    pub async fn search_by_name(&self, term: &str) -> Result<Vec<store::Model>, ServiceError> {
        Ok(Store::find()
            .filter(name_contains(Store, Column::NameFolded, term))
            .order_by_asc(Column::Name)
            .order_by_asc(Column::Id)
            .all(self.get_db())
            .await?)
    }

    async fn ensure_name_free<C: ConnectionTrait>(
        db: &C,
        name: &str,
        except: Option<i32>,
    ) -> Result<(), ServiceError> {
        let mut query = Store::find().filter(Column::Name.eq(name));
        if let Some(id) = except {
            query = query.filter(Column::Id.ne(id));
        }
        match query.limit(1).one(db).await? {
            Some(_) => Err(ServiceError::duplicate(ENTITY, NAME_FIELDS)),
            None => Ok(()),
        }
    }

    pub async fn create(&self, req: TiendaRequest) -> Result<store::Model, ServiceError> {
        Self::ensure_name_free(self.get_db(), &req.nombre, None).await?;

        let mut active_model = <StoreActiveModel as Default>::default();
        apply_patch(&mut active_model, TiendaPatch::from(req));
        active_model
            .insert(self.get_db())
            .await
            .map_err(|e| ServiceError::from_write(e, ENTITY, NAME_FIELDS))
    }

    pub async fn update(&self, id: i32, patch: TiendaPatch) -> Result<store::Model, ServiceError> {
        let existing = self.get(id).await?;
        if let Some(name) = &patch.nombre {
            Self::ensure_name_free(self.get_db(), name, Some(id)).await?;
        }

        let mut active_model: StoreActiveModel = existing.into();
        apply_patch(&mut active_model, patch);
        active_model
            .update(self.get_db())
            .await
            .map_err(|e| ServiceError::from_write(e, ENTITY, NAME_FIELDS))
    }

    /// Deletes the store, its branches and their stock rows in one transaction.
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.get(id).await?;

        let store_branches = sea_query::Query::select()
            .column(branch::Column::Id)
            .from(branch::Entity)
            .and_where(branch::Column::StoreId.eq(id))
            .to_owned();

        let txn = self.get_db().begin().await?;
        stock::Entity::delete_many()
            .filter(stock::Column::BranchId.in_subquery(store_branches))
            .exec(&txn)
            .await?;
        branch::Entity::delete_many()
            .filter(branch::Column::StoreId.eq(id))
            .exec(&txn)
            .await?;
        Store::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        Ok(())
    }
}

fn apply_patch(active_model: &mut StoreActiveModel, patch: TiendaPatch) {
    if let Some(name) = patch.nombre {
        active_model.name = Set(name);
    }
    if let Some(logo_url) = patch.logo_url {
        active_model.logo_url = Set(logo_url);
    }
    if let Some(email) = patch.email {
        active_model.email = Set(email);
    }
    if let Some(phone) = patch.telefono {
        active_model.phone = Set(phone);
    }
    if let Some(hours) = patch.dias_atencion {
        active_model.hours_description = Set(hours);
    }
    if let Some(has_delivery) = patch.tiene_delivery {
        active_model.has_delivery = Set(has_delivery);
    }
    if let Some(address) = patch.direccion {
        active_model.address = Set(address);
    }
    if let Some(location) = patch.ubicacion {
        active_model.latitude = Set(location.map(|p| p.latitude()));
        active_model.longitude = Set(location.map(|p| p.longitude()));
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

impl Repository for StoreRepository {
    fn get_db(&self) -> &DatabaseConnection {
        self.base.get_db()
    }
}
