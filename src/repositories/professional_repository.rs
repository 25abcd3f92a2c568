use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use std::sync::Arc;

use crate::dto::{ProfesionalPatch, ProfesionalRequest};
use crate::entities::professional::{
    self, ActiveModel as ProfessionalActiveModel, Column, Entity as Professional, ServiceType,
};
use crate::errors::ServiceError;
use crate::repositories::{name_contains, Repository};

use super::BaseRepository;

const ENTITY: &str = "Profesional";

/// Repository for independent workshops
#[derive(Debug, Clone)]
pub struct ProfessionalRepository {
    base: BaseRepository,
}

impl ProfessionalRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All professionals, featured first, then by workshop name
    pub async fn find_all(&self) -> Result<Vec<professional::Model>, ServiceError> {
        Ok(Professional::find()
            .order_by_desc(Column::IsFeatured)
            .order_by_asc(Column::WorkshopName)
            .order_by_asc(Column::Id)
            .all(self.get_db())
            .await?)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<professional::Model>, ServiceError> {
        Ok(Professional::find_by_id(id).one(self.get_db()).await?)
    }

    pub async fn get(&self, id: i32) -> Result<professional::Model, ServiceError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(ENTITY, id))
    }

    pub async fn search_by_name(
        &self,
        term: &str,
    ) -> Result<Vec<professional::Model>, ServiceError> {
        Ok(Professional::find()
            .filter(name_contains(Professional, Column::WorkshopNameFolded, term))
            .order_by_desc(Column::IsFeatured)
            .order_by_asc(Column::WorkshopName)
            .order_by_asc(Column::Id)
            .all(self.get_db())
            .await?)
    }

    pub async fn create(
        &self,
        req: ProfesionalRequest,
    ) -> Result<professional::Model, ServiceError> {
        let mut active_model = <ProfessionalActiveModel as Default>::default();
        apply_patch(&mut active_model, ProfesionalPatch::from(req));
        Ok(active_model.insert(self.get_db()).await?)
    }

    pub async fn update(
        &self,
        id: i32,
        patch: ProfesionalPatch,
    ) -> Result<professional::Model, ServiceError> {
        let existing = self.get(id).await?;
        let mut active_model: ProfessionalActiveModel = existing.into();
        apply_patch(&mut active_model, patch);
        Ok(active_model.update(self.get_db()).await?)
    }

    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.get(id).await?;
        Professional::delete_by_id(id).exec(self.get_db()).await?;
        Ok(())
    }
}

fn apply_patch(active_model: &mut ProfessionalActiveModel, patch: ProfesionalPatch) {
    if let Some(name) = patch.nombre_taller {
        active_model.workshop_name = Set(name);
    }
    if let Some(mechanic) = patch.jefe_mecanico {
        active_model.head_mechanic_name = Set(mechanic);
    }
    if let Some(address) = patch.direccion {
        active_model.address = Set(address);
    }
    if let Some(phone) = patch.telefono_contacto {
        active_model.contact_phone = Set(phone);
    }
    if let Some(types) = patch.tipos_servicio {
        active_model.service_types = Set(ServiceType::join(&types));
    }
    if let Some(featured) = patch.destacado {
        active_model.is_featured = Set(featured);
    }
    if let Some(point) = patch.ubicacion {
        active_model.latitude = Set(point.latitude());
        active_model.longitude = Set(point.longitude());
    }
    if let Some(logo_url) = patch.logo_url {
        active_model.logo_url = Set(logo_url);
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

impl Repository for ProfessionalRepository {
    fn get_db(&self) -> &DatabaseConnection {
        self.base.get_db()
    }
}
