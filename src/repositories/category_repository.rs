use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::sync::Arc;

use crate::dto::{CategoriaPatch, CategoriaRequest};
use crate::entities::category::{
    self, ActiveModel as CategoryActiveModel, Column, Entity as Category,
};
use crate::entities::part;
use crate::errors::ServiceError;
use crate::repositories::{load_chunked, Repository};

use super::BaseRepository;

const ENTITY: &str = "Categoria";
const NAME_FIELDS: &[&str] = &["nombre"];

/// Repository for part categories
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    base: BaseRepository,
}

impl CategoryRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> Result<Vec<category::Model>, ServiceError> {
        Ok(Category::find()
            .order_by_asc(Column::Name)
            .order_by_asc(Column::Id)
            .all(self.get_db())
            .await?)
    }

    pub async fn find_by_ids(&self, ids: Vec<i32>) -> Result<Vec<category::Model>, ServiceError> {
        let db = self.get_db();
        Ok(load_chunked(&ids, |chunk| {
            Category::find().filter(Column::Id.is_in(chunk)).all(db)
        })
        .await?)
    }

    pub async fn get(&self, id: i32) -> Result<category::Model, ServiceError> {
        Category::find_by_id(id)
            .one(self.get_db())
            .await?
            .ok_or_else(|| ServiceError::not_found(ENTITY, id))
    }

    async fn ensure_name_free<C: ConnectionTrait>(
        db: &C,
        name: &str,
        except: Option<i32>,
    ) -> Result<(), ServiceError> {
        let mut query = Category::find().filter(Column::Name.eq(name));
        if let Some(id) = except {
            query = query.filter(Column::Id.ne(id));
        }
        match query.limit(1).one(db).await? {
            Some(_) => Err(ServiceError::duplicate(ENTITY, NAME_FIELDS)),
            None => Ok(()),
        }
    }

    pub async fn create(&self, req: CategoriaRequest) -> Result<category::Model, ServiceError> {
        Self::ensure_name_free(self.get_db(), &req.nombre, None).await?;

        let mut active_model = <CategoryActiveModel as Default>::default();
        apply_patch(&mut active_model, CategoriaPatch::from(req));
        active_model
            .insert(self.get_db())
            .await
            .map_err(|e| ServiceError::from_write(e, ENTITY, NAME_FIELDS))
    }

    pub async fn update(
        &self,
        id: i32,
        patch: CategoriaPatch,
    ) -> Result<category::Model, ServiceError> {
        let existing = self.get(id).await?;
        if let Some(name) = &patch.nombre {
            Self::ensure_name_free(self.get_db(), name, Some(id)).await?;
        }

        let mut active_model: CategoryActiveModel = existing.into();
        apply_patch(&mut active_model, patch);
        active_model
            .update(self.get_db())
            .await
            .map_err(|e| ServiceError::from_write(e, ENTITY, NAME_FIELDS))
    }

    /// Deletes the category; its parts become uncategorised.
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.get(id).await?;

        let txn = self.get_db().begin().await?;
        part::Entity::update_many()
            .col_expr(part::Column::CategoryId, Expr::value(Option::<i32>::None))
            .filter(part::Column::CategoryId.eq(id))
            .exec(&txn)
            .await?;
        Category::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        Ok(())
    }
}

fn apply_patch(active_model: &mut CategoryActiveModel, patch: CategoriaPatch) {
    if let Some(name) = patch.nombre {
        active_model.name = Set(name);
    }
    if let Some(description) = patch.descripcion {
        active_model.description = Set(description);
    }
}

impl Repository for CategoryRepository {
    fn get_db(&self) -> &DatabaseConnection {
        self.base.get_db()
    }
}
