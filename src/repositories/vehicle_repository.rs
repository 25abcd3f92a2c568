use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use std::sync::Arc;

use crate::dto::{VehiculoPatch, VehiculoRequest};
use crate::entities::part_vehicle;
use crate::entities::vehicle::{self, ActiveModel as VehicleActiveModel, Column, Entity as Vehicle};
use crate::errors::ServiceError;
use crate::repositories::Repository;

use super::BaseRepository;

const ENTITY: &str = "Vehiculo";
const TUPLE_FIELDS: &[&str] = &["marca", "modelo", "anio"];

/// Repository for vehicles
#[derive(Debug, Clone)]
pub struct VehicleRepository {
    base: BaseRepository,
}

impl VehicleRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All vehicles, ordered by brand, model and year
    pub async fn find_all(&self) -> Result<Vec<vehicle::Model>, ServiceError> {
        Ok(Vehicle::find()
            .order_by_asc(Column::Brand)
            .order_by_asc(Column::Model)
            .order_by_asc(Column::Year)
            .order_by_asc(Column::Id)
            .all(self.get_db())
            .await?)
    }

    pub async fn get(&self, id: i32) -> Result<vehicle::Model, ServiceError> {
        Vehicle::find_by_id(id)
            .one(self.get_db())
            .await?
            .ok_or_else(|| ServiceError::not_found(ENTITY, id))
    }

    async fn ensure_tuple_free(
        &self,
        brand: &str,
        model: &str,
        year: i32,
        except: Option<i32>,
    ) -> Result<(), ServiceError> {
        let mut query = Vehicle::find()
            .filter(Column::Brand.eq(brand))
            .filter(Column::Model.eq(model))
            .filter(Column::Year.eq(year));
        if let Some(id) = except {
            query = query.filter(Column::Id.ne(id));
        }
        match query.limit(1).one(self.get_db()).await? {
            Some(_) => Err(ServiceError::duplicate(ENTITY, TUPLE_FIELDS)),
            None => Ok(()),
        }
    }

    pub async fn create(&self, req: VehiculoRequest) -> Result<vehicle::Model, ServiceError> {
        self.ensure_tuple_free(&req.marca, &req.modelo, req.anio, None)
            .await?;

        VehicleActiveModel {
            brand: Set(req.marca),
            model: Set(req.modelo),
            year: Set(req.anio),
            ..Default::default()
        }
        .insert(self.get_db())
        .await
        .map_err(|e| ServiceError::from_write(e, ENTITY, TUPLE_FIELDS))
    }

    pub async fn update(
        &self,
        id: i32,
        patch: VehiculoPatch,
    ) -> Result<vehicle::Model, ServiceError> {
        let existing = self.get(id).await?;
        let brand = patch.marca.unwrap_or_else(|| existing.brand.clone());
        let model = patch.modelo.unwrap_or_else(|| existing.model.clone());
        let year = patch.anio.unwrap_or(existing.year);
        self.ensure_tuple_free(&brand, &model, year, Some(id)).await?;

        let mut active_model: VehicleActiveModel = existing.into();
        active_model.brand = Set(brand);
        active_model.model = Set(model);
        active_model.year = Set(year);
        active_model
            .update(self.get_db())
            .await
            .map_err(|e| ServiceError::from_write(e, ENTITY, TUPLE_FIELDS))
    }

    /// Deletes the vehicle and its compatibility links in one transaction.
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.get(id).await?;

        let txn = self.get_db().begin().await?;
        part_vehicle::Entity::delete_many()
            .filter(part_vehicle::Column::VehicleId.eq(id))
            .exec(&txn)
            .await?;
        Vehicle::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        Ok(())
    }
}

impl Repository for VehicleRepository {
    fn get_db(&self) -> &DatabaseConnection {
        self.base.get_db()
    }
}
