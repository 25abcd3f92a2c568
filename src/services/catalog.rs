use crate::{
    db::DbPool,
    dto::{
        part_with_inventory, CategoriaPatch, CategoriaRequest, CategoriaResponse, PartLookup,
        RepuestoConInventarioResponse, RepuestoPatch, RepuestoRequest, RepuestoResponse,
        RepuestoSucursalPatch, RepuestoSucursalRequest, RepuestoSucursalResponse, VehiculoPatch,
        VehiculoRequest, VehiculoResponse,
    },
    entities::{branch, part},
    errors::ServiceError,
    queries::{PartFilter, Query, SearchPartsQuery},
    repositories::{
        BranchRepository, CategoryRepository, PartRepository, StockRepository, VehicleRepository,
    },
};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Categories, vehicles, global parts and per-branch stock
#[derive(Clone)]
pub struct CatalogService {
    db_pool: Arc<DbPool>,
    categories: CategoryRepository,
    vehicles: VehicleRepository,
    parts: PartRepository,
    stock: StockRepository,
    branches: BranchRepository,
}

impl CatalogService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            categories: CategoryRepository::new(db_pool.clone()),
            vehicles: VehicleRepository::new(db_pool.clone()),
            parts: PartRepository::new(db_pool.clone()),
            stock: StockRepository::new(db_pool.clone()),
            branches: BranchRepository::new(db_pool.clone()),
            db_pool,
        }
    }

    /// Loads the given parts with their categories and compatible vehicles,
    /// one query per table.
    pub async fn part_lookup(&self, part_ids: Vec<i32>) -> Result<PartLookup, ServiceError> {
        let parts = self.parts.find_by_ids(part_ids).await?;
        self.lookup_for(parts).await
    }

    async fn lookup_for(&self, parts: Vec<part::Model>) -> Result<PartLookup, ServiceError> {
        let category_ids: BTreeSet<i32> = parts.iter().filter_map(|p| p.category_id).collect();
        let part_ids: Vec<i32> = parts.iter().map(|p| p.id).collect();
        let categories = self
            .categories
            .find_by_ids(category_ids.into_iter().collect())
            .await?;
        let links = self.parts.compat_links(part_ids).await?;
        Ok(PartLookup::new(parts, categories, links))
    }

    // -- categories ---------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<CategoriaResponse>, ServiceError> {
        let categories = self.categories.find_all().await?;
        Ok(categories.into_iter().map(CategoriaResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get_category(&self, id: i32) -> Result<CategoriaResponse, ServiceError> {
        Ok(self.categories.get(id).await?.into())
    }

    #[instrument(skip(self))]
    pub async fn create_category(
        &self,
        req: CategoriaRequest,
    ) -> Result<CategoriaResponse, ServiceError> {
        let created = self.categories.create(req).await?;
        info!(category_id = created.id, "Category created");
        Ok(created.into())
    }

    #[instrument(skip(self))]
    pub async fn update_category(
        &self,
        id: i32,
        patch: CategoriaPatch,
    ) -> Result<CategoriaResponse, ServiceError> {
        let updated = self.categories.update(id, patch).await?;
        info!(category_id = id, "Category updated");
        Ok(updated.into())
    }

    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: i32) -> Result<(), ServiceError> {
        self.categories.delete(id).await?;
        info!(category_id = id, "Category deleted");
        Ok(())
    }

    // -- vehicles -----------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn list_vehicles(&self) -> Result<Vec<VehiculoResponse>, ServiceError> {
        let vehicles = self.vehicles.find_all().await?;
        Ok(vehicles.iter().map(VehiculoResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get_vehicle(&self, id: i32) -> Result<VehiculoResponse, ServiceError> {
        Ok(VehiculoResponse::from(&self.vehicles.get(id).await?))
    }

    #[instrument(skip(self))]
    pub async fn create_vehicle(
        &self,
        req: VehiculoRequest,
    ) -> Result<VehiculoResponse, ServiceError> {
        let created = self.vehicles.create(req).await?;
        info!(vehicle_id = created.id, "Vehicle created");
        Ok(VehiculoResponse::from(&created))
    }

    #[instrument(skip(self))]
    pub async fn update_vehicle(
        &self,
        id: i32,
        patch: VehiculoPatch,
    ) -> Result<VehiculoResponse, ServiceError> {
        let updated = self.vehicles.update(id, patch).await?;
        info!(vehicle_id = id, "Vehicle updated");
        Ok(VehiculoResponse::from(&updated))
    }

    #[instrument(skip(self))]
    pub async fn delete_vehicle(&self, id: i32) -> Result<(), ServiceError> {
        self.vehicles.delete(id).await?;
        info!(vehicle_id = id, "Vehicle deleted");
        Ok(())
    }

    // -- parts --------------------------------------------------------------

    /// Flat part representations matching the filter
    #[instrument(skip(self))]
    pub async fn search_parts(
        &self,
        filter: PartFilter,
    ) -> Result<Vec<RepuestoResponse>, ServiceError> {
        let parts = SearchPartsQuery::new(filter)
            .execute(self.db_pool.as_ref())
            .await?;
        let order: Vec<i32> = parts.iter().map(|p| p.id).collect();
        let lookup = self.lookup_for(parts).await?;
        Ok(order
            .into_iter()
            .filter_map(|id| lookup.part(id).map(|p| lookup.represent(p)))
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn get_part(&self, id: i32) -> Result<RepuestoConInventarioResponse, ServiceError> {
        let part = self.parts.get(id).await?;
        let mut found = self.with_inventory(vec![part]).await?;
        found.pop().ok_or_else(|| ServiceError::not_found("RepuestoGlobal", id))
    }

    async fn with_inventory(
        &self,
        parts: Vec<part::Model>,
    ) -> Result<Vec<RepuestoConInventarioResponse>, ServiceError> {
        let rows = self
            .stock
            .find_by_part_ids(parts.iter().map(|p| p.id).collect())
            .await?;
        let branch_ids: BTreeSet<i32> = rows.iter().map(|r| r.branch_id).collect();
        let branches: HashMap<i32, branch::Model> = self
            .branches
            .find_by_ids(branch_ids.into_iter().collect())
            .await?
            .into_iter()
            .map(|b| (b.id, b))
            .collect();

        let order: Vec<part::Model> = parts.clone();
        let lookup = self.lookup_for(parts).await?;
        debug!(parts = order.len(), rows = rows.len(), "inventory loaded");
        Ok(order
            .iter()
            .map(|part| part_with_inventory(part, &lookup, &rows, &branches))
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn create_part(
        &self,
        req: RepuestoRequest,
    ) -> Result<RepuestoConInventarioResponse, ServiceError> {
        let created = self.parts.create(req).await?;
        info!(part_id = created.id, "Part created");
        self.get_part(created.id).await
    }

    #[instrument(skip(self))]
    pub async fn update_part(
        &self,
        id: i32,
        patch: RepuestoPatch,
    ) -> Result<RepuestoConInventarioResponse, ServiceError> {
        self.parts.update(id, patch).await?;
        info!(part_id = id, "Part updated");
        self.get_part(id).await
    }

    #[instrument(skip(self))]
    pub async fn delete_part(&self, id: i32) -> Result<(), ServiceError> {
        self.parts.delete(id).await?;
        info!(part_id = id, "Part deleted");
        Ok(())
    }

    // -- stock rows ---------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn list_stock(&self) -> Result<Vec<RepuestoSucursalResponse>, ServiceError> {
        let rows = self.stock.find_all().await?;
        Ok(rows.into_iter().map(RepuestoSucursalResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get_stock(&self, id: i32) -> Result<RepuestoSucursalResponse, ServiceError> {
        Ok(self.stock.get(id).await?.into())
    }

    #[instrument(skip(self))]
    pub async fn create_stock(
        &self,
        req: RepuestoSucursalRequest,
    ) -> Result<RepuestoSucursalResponse, ServiceError> {
        let created = self.stock.create(req).await?;
        info!(
            stock_id = created.id,
            branch_id = created.branch_id,
            part_id = created.part_id,
            "Stock row created"
        );
        Ok(created.into())
    }

    #[instrument(skip(self))]
    pub async fn update_stock(
        &self,
        id: i32,
        patch: RepuestoSucursalPatch,
    ) -> Result<RepuestoSucursalResponse, ServiceError> {
        let updated = self.stock.update(id, patch).await?;
        info!(stock_id = id, "Stock row updated");
        Ok(updated.into())
    }

    #[instrument(skip(self))]
    pub async fn delete_stock(&self, id: i32) -> Result<(), ServiceError> {
        self.stock.delete(id).await?;
        info!(stock_id = id, "Stock row deleted");
        Ok(())
    }
}
