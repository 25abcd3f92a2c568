use crate::{
    db::DbPool,
    dto::{
        branch_tree, store_tree, PartLookup, ProfesionalPatch, ProfesionalRequest, ProfesionalResponse,
        SucursalPatch, SucursalRequest, SucursalResponse, TiendaPatch, TiendaRequest,
        TiendaResponse,
    },
    entities::{branch, stock, store},
    errors::ServiceError,
    repositories::{BranchRepository, ProfessionalRepository, StockRepository, StoreRepository},
    services::catalog::CatalogService,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Stores with their branch trees, and independent professionals
#[derive(Clone)]
pub struct LocationService {
    stores: StoreRepository,
    branches: BranchRepository,
    stock: StockRepository,
    professionals: ProfessionalRepository,
    catalog: CatalogService,
}

impl LocationService {
    pub fn new(db_pool: Arc<DbPool>, catalog: CatalogService) -> Self {
        Self {
            stores: StoreRepository::new(db_pool.clone()),
            branches: BranchRepository::new(db_pool.clone()),
            stock: StockRepository::new(db_pool.clone()),
            professionals: ProfessionalRepository::new(db_pool),
            catalog,
        }
    }

    /// Trees for the given stores: one query for branches, one for stock
    /// rows, then the part lookup.
    async fn store_trees(
        &self,
        stores: Vec<store::Model>,
    ) -> Result<Vec<TiendaResponse>, ServiceError> {
        let branches = self
            .branches
            .find_by_store_ids(stores.iter().map(|s| s.id).collect())
            .await?;
        let (rows, lookup) = self.inventory_of(&branches).await?;
        debug!(
            stores = stores.len(),
            branches = branches.len(),
            rows = rows.len(),
            "store trees loaded"
        );
        Ok(stores
            .iter()
            .map(|s| store_tree(s, &branches, &rows, &lookup))
            .collect())
    }

    async fn branch_trees(
        &self,
        branches: Vec<branch::Model>,
    ) -> Result<Vec<SucursalResponse>, ServiceError> {
        let (rows, lookup) = self.inventory_of(&branches).await?;
        Ok(branches
            .iter()
            .map(|b| branch_tree(b, &rows, &lookup))
            .collect())
    }

    async fn inventory_of(
        &self,
        branches: &[branch::Model],
    ) -> Result<(Vec<stock::Model>, PartLookup), ServiceError> {
        let rows = self
            .stock
            .find_by_branch_ids(branches.iter().map(|b| b.id).collect())
            .await?;
        let part_ids: BTreeSet<i32> = rows.iter().map(|r| r.part_id).collect();
        let lookup = self
            .catalog
            .part_lookup(part_ids.into_iter().collect())
            .await?;
        Ok((rows, lookup))
    }

    // -- stores -------------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn list_stores(&self) -> Result<Vec<TiendaResponse>, ServiceError> {
        let stores = self.stores.find_all().await?;
        self.store_trees(stores).await
    }

    #[instrument(skip(self))]
    pub async fn get_store(&self, id: i32) -> Result<TiendaResponse, ServiceError> {
        let store = self.stores.get(id).await?;
        let mut trees = self.store_trees(vec![store]).await?;
        trees.pop().ok_or_else(|| ServiceError::not_found("Tienda", id))
    }

    #[instrument(skip(self))]
    pub async fn create_store(&self, req: TiendaRequest) -> Result<TiendaResponse, ServiceError> {
        let created = self.stores.create(req).await?;
        info!(store_id = created.id, name = %created.name, "Store created");
        self.get_store(created.id).await
    }

    #[instrument(skip(self))]
    pub async fn update_store(
        &self,
        id: i32,
        patch: TiendaPatch,
    ) -> Result<TiendaResponse, ServiceError> {
        self.stores.update(id, patch).await?;
        info!(store_id = id, "Store updated");
        self.get_store(id).await
    }

    #[instrument(skip(self))]
    pub async fn delete_store(&self, id: i32) -> Result<(), ServiceError> {
        self.stores.delete(id).await?;
        info!(store_id = id, "Store deleted with its branches and stock");
        Ok(())
    }

    // -- branches -----------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn list_branches(&self) -> Result<Vec<SucursalResponse>, ServiceError> {
        let branches = self.branches.find_all().await?;
        self.branch_trees(branches).await
    }

    #[instrument(skip(self))]
    pub async fn get_branch(&self, id: i32) -> Result<SucursalResponse, ServiceError> {
        let branch = self.branches.get(id).await?;
        let mut trees = self.branch_trees(vec![branch]).await?;
        trees.pop().ok_or_else(|| ServiceError::not_found("Sucursal", id))
    }

    #[instrument(skip(self))]
    pub async fn create_branch(
        &self,
        req: SucursalRequest,
    ) -> Result<SucursalResponse, ServiceError> {
        let created = self.branches.create(req).await?;
        info!(branch_id = created.id, store_id = created.store_id, "Branch created");
        self.get_branch(created.id).await
    }

    #[instrument(skip(self))]
    pub async fn update_branch(
        &self,
        id: i32,
        patch: SucursalPatch,
    ) -> Result<SucursalResponse, ServiceError> {
        self.branches.update(id, patch).await?;
        info!(branch_id = id, "Branch updated");
        self.get_branch(id).await
    }

    #[instrument(skip(self))]
    pub async fn delete_branch(&self, id: i32) -> Result<(), ServiceError> {
        self.branches.delete(id).await?;
        info!(branch_id = id, "Branch deleted with its stock");
        Ok(())
    }

    // -- professionals ------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn list_professionals(&self) -> Result<Vec<ProfesionalResponse>, ServiceError> {
        let professionals = self.professionals.find_all().await?;
        Ok(professionals
            .into_iter()
            .map(ProfesionalResponse::from)
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn get_professional(&self, id: i32) -> Result<ProfesionalResponse, ServiceError> {
        Ok(self.professionals.get(id).await?.into())
    }

    #[instrument(skip(self))]
    pub async fn create_professional(
        &self,
        req: ProfesionalRequest,
    ) -> Result<ProfesionalResponse, ServiceError> {
        let created = self.professionals.create(req).await?;
        info!(professional_id = created.id, "Professional created");
        Ok(created.into())
    }

    #[instrument(skip(self))]
    pub async fn update_professional(
        &self,
        id: i32,
        patch: ProfesionalPatch,
    ) -> Result<ProfesionalResponse, ServiceError> {
        let updated = self.professionals.update(id, patch).await?;
        info!(professional_id = id, "Professional updated");
        Ok(updated.into())
    }

    #[instrument(skip(self))]
    pub async fn delete_professional(&self, id: i32) -> Result<(), ServiceError> {
        self.professionals.delete(id).await?;
        info!(professional_id = id, "Professional deleted");
        Ok(())
    }
}
