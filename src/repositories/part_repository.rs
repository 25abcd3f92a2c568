use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QuerySelect, Set, TransactionTrait,
};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::dto::{RepuestoPatch, RepuestoRequest};
use crate::entities::part::{self, ActiveModel as PartActiveModel, Column, Entity as Part};
use crate::entities::{category, part_vehicle, stock, vehicle};
use crate::errors::ServiceError;
use crate::repositories::{ensure_exists, load_chunked, Repository, ID_CHUNK_SIZE};

use super::BaseRepository;

const ENTITY: &str = "RepuestoGlobal";

/// Repository for global parts and their vehicle compatibility
#[derive(Debug, Clone)]
pub struct PartRepository {
    base: BaseRepository,
}

impl PartRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<part::Model>, ServiceError> {
        Ok(Part::find_by_id(id).one(self.get_db()).await?)
    }

    pub async fn get(&self, id: i32) -> Result<part::Model, ServiceError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(ENTITY, id))
    }

    pub async fn find_by_ids(&self, ids: Vec<i32>) -> Result<Vec<part::Model>, ServiceError> {
        let db = self.get_db();
        let mut parts = load_chunked(&ids, |chunk| {
            Part::find().filter(Column::Id.is_in(chunk)).all(db)
        })
        .await?;
        parts.sort_by(|a, b| (&a.name, a.id).cmp(&(&b.name, b.id)));
        Ok(parts)
    }

    /// `(part_id, vehicle)` pairs for every compatibility link of the given parts
    pub async fn compat_links(
        &self,
        part_ids: Vec<i32>,
    ) -> Result<Vec<(i32, vehicle::Model)>, ServiceError> {
        let db = self.get_db();
        let rows = load_chunked(&part_ids, |chunk| {
            part_vehicle::Entity::find()
                .filter(part_vehicle::Column::PartId.is_in(chunk))
                .find_also_related(vehicle::Entity)
                .all(db)
        })
        .await?;
        Ok(rows
            .into_iter()
            .filter_map(|(link, vehicle)| vehicle.map(|v| (link.part_id, v)))
            .collect())
    }

    /// Creates the part and its compatibility links in one transaction.
    pub async fn create(&self, req: RepuestoRequest) -> Result<part::Model, ServiceError> {
        if let Some(category_id) = req.categoria_id {
            ensure_exists::<category::Entity, _>(self.get_db(), category_id, "categoria_id")
                .await?;
        }
        let vehicle_ids = self.checked_vehicle_ids(&req.compatibilidad_ids).await?;

        let txn = self.get_db().begin().await?;
        let created = PartActiveModel {
            name: Set(req.nombre),
            description: Set(req.descripcion),
            category_id: Set(req.categoria_id),
            image_url: Set(req.imagen_url),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| ServiceError::from_write(e, ENTITY, &["categoria_id"]))?;
        replace_links(&txn, created.id, &vehicle_ids).await?;
        txn.commit().await?;

        Ok(created)
    }

    /// Applies the patch; a present `compatibilidad_ids` replaces the whole set.
    pub async fn update(&self, id: i32, patch: RepuestoPatch) -> Result<part::Model, ServiceError> {
        let existing = self.get(id).await?;
        if let Some(Some(category_id)) = patch.categoria_id {
            ensure_exists::<category::Entity, _>(self.get_db(), category_id, "categoria_id")
                .await?;
        }
        let vehicle_ids = match &patch.compatibilidad_ids {
            Some(ids) => Some(self.checked_vehicle_ids(ids).await?),
            None => None,
        };

        let mut active_model: PartActiveModel = existing.into();
        if let Some(name) = patch.nombre {
            active_model.name = Set(name);
        }
        if let Some(description) = patch.descripcion {
            active_model.description = Set(description);
        }
        if let Some(category_id) = patch.categoria_id {
            active_model.category_id = Set(category_id);
        }
        if let Some(image_url) = patch.imagen_url {
            active_model.image_url = Set(image_url);
        }

        let txn = self.get_db().begin().await?;
        let updated = active_model
            .update(&txn)
            .await
            .map_err(|e| ServiceError::from_write(e, ENTITY, &["categoria_id"]))?;
        if let Some(ids) = vehicle_ids {
            replace_links(&txn, id, &ids).await?;
        }
        txn.commit().await?;

        Ok(updated)
    }

    /// Deletes the part, its stock rows and its compatibility links in one
    /// transaction.
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.get(id).await?;

        let txn = self.get_db().begin().await?;
        stock::Entity::delete_many()
            .filter(stock::Column::PartId.eq(id))
            .exec(&txn)
            .await?;
        part_vehicle::Entity::delete_many()
            .filter(part_vehicle::Column::PartId.eq(id))
            .exec(&txn)
            .await?;
        Part::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        Ok(())
    }

    /// Deduplicates the ids and checks that every vehicle exists.
    async fn checked_vehicle_ids(&self, ids: &[i32]) -> Result<Vec<i32>, ServiceError> {
        let wanted: BTreeSet<i32> = ids.iter().copied().collect();
        let wanted_ids: Vec<i32> = wanted.iter().copied().collect();
        let db = self.get_db();
        let found: BTreeSet<i32> = load_chunked(&wanted_ids, |chunk| {
            vehicle::Entity::find()
                .select_only()
                .column(vehicle::Column::Id)
                .filter(vehicle::Column::Id.is_in(chunk))
                .into_tuple::<i32>()
                .all(db)
        })
        .await?
        .into_iter()
        .collect();
        let missing: Vec<String> = wanted.difference(&found).map(i32::to_string).collect();
        if !missing.is_empty() {
            return Err(ServiceError::ValidationError(format!(
                "compatibilidad_ids: unknown vehicle ids {}",
                missing.join(", ")
            )));
        }
        Ok(wanted_ids)
    }
}

async fn replace_links<C: ConnectionTrait>(
    db: &C,
    part_id: i32,
    vehicle_ids: &[i32],
) -> Result<(), ServiceError> {
    part_vehicle::Entity::delete_many()
        .filter(part_vehicle::Column::PartId.eq(part_id))
        .exec(db)
        .await?;
    for chunk in vehicle_ids.chunks(ID_CHUNK_SIZE) {
        let links = chunk.iter().map(|vehicle_id| part_vehicle::ActiveModel {
            part_id: Set(part_id),
            vehicle_id: Set(*vehicle_id),
        });
        part_vehicle::Entity::insert_many(links)
            .exec_without_returning(db)
            .await?;
    }
    Ok(())
}

impl Repository for PartRepository {
    fn get_db(&self) -> &DatabaseConnection {
        self.base.get_db()
    }
}
