//! Map projections: every located store, branch and professional as one
//! feature collection, evaluated against the local clock.

use crate::{
    db::DbPool,
    errors::ServiceError,
    geo::{FeatureCollection, FeatureKind, Locatable},
    hours::OpenStatus,
    repositories::{BranchRepository, ProfessionalRepository, StoreRepository},
};
use chrono::NaiveDateTime;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Restricts map features by their current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenFilter {
    Any,
    Open,
    Closed,
}

impl OpenFilter {
    /// `true`/`1` keeps open features, `false`/`0` closed ones, blank keeps all.
    pub fn parse(raw: Option<&str>) -> Result<Self, ServiceError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(OpenFilter::Any),
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(OpenFilter::Open),
                "false" | "0" => Ok(OpenFilter::Closed),
                _ => Err(ServiceError::InvalidInput(format!(
                    "abierto must be true or false, got '{}'",
                    value
                ))),
            },
        }
    }

    fn apply(self, collection: &mut FeatureCollection) {
        match self {
            OpenFilter::Any => {}
            OpenFilter::Open => collection.retain_open(),
            OpenFilter::Closed => collection.retain_closed(),
        }
    }
}

/// One entity rendered on its detail page
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedDetail {
    pub kind: FeatureKind,
    pub name: String,
    pub address: Option<String>,
    pub status: OpenStatus,
    pub features: FeatureCollection,
}

impl LocatedDetail {
    fn of<L: Locatable>(item: &L, now: NaiveDateTime) -> Self {
        let mut features = FeatureCollection::default();
        features.extend_from(std::slice::from_ref(item), now);
        Self {
            kind: L::KIND,
            name: item.display_name().to_string(),
            address: item.address().map(str::to_string),
            status: item.opening_hours().status_at(now),
            features,
        }
    }
}

#[derive(Clone)]
pub struct LocatorService {
    stores: StoreRepository,
    branches: BranchRepository,
    professionals: ProfessionalRepository,
}

impl LocatorService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            stores: StoreRepository::new(db_pool.clone()),
            branches: BranchRepository::new(db_pool.clone()),
            professionals: ProfessionalRepository::new(db_pool),
        }
    }

    /// Stores, then branches, then professionals, each in default order.
    /// A blank `query` matches everything.
    #[instrument(skip(self))]
    pub async fn map_features(
        &self,
        query: Option<&str>,
        open: OpenFilter,
        now: NaiveDateTime,
    ) -> Result<FeatureCollection, ServiceError> {
        let term = query.map(str::trim).filter(|q| !q.is_empty());
        let (stores, branches, professionals) = match term {
            Some(term) => (
                self.stores.search_by_name(term).await?,
                self.branches.search_by_name(term).await?,
                self.professionals.search_by_name(term).await?,
            ),
            None => (
                self.stores.find_all().await?,
                self.branches.find_all().await?,
                self.professionals.find_all().await?,
            ),
        };

        let mut collection = FeatureCollection::default();
        collection
            .extend_from(&stores, now)
            .extend_from(&branches, now)
            .extend_from(&professionals, now);
        open.apply(&mut collection);

        debug!(features = collection.len(), "map features projected");
        Ok(collection)
    }

    #[instrument(skip(self))]
    pub async fn store_detail(
        &self,
        id: i32,
        now: NaiveDateTime,
    ) -> Result<LocatedDetail, ServiceError> {
        Ok(LocatedDetail::of(&self.stores.get(id).await?, now))
    }

    #[instrument(skip(self))]
    pub async fn branch_detail(
        &self,
        id: i32,
        now: NaiveDateTime,
    ) -> Result<LocatedDetail, ServiceError> {
        Ok(LocatedDetail::of(&self.branches.get(id).await?, now))
    }

    #[instrument(skip(self))]
    pub async fn professional_detail(
        &self,
        id: i32,
        now: NaiveDateTime,
    ) -> Result<LocatedDetail, ServiceError> {
        Ok(LocatedDetail::of(&self.professionals.get(id).await?, now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn open_filter_parsing() {
        assert_eq!(OpenFilter::parse(None).unwrap(), OpenFilter::Any);
        assert_eq!(OpenFilter::parse(Some(" ")).unwrap(), OpenFilter::Any);
        assert_eq!(OpenFilter::parse(Some("TRUE")).unwrap(), OpenFilter::Open);
        assert_eq!(OpenFilter::parse(Some("0")).unwrap(), OpenFilter::Closed);
        assert_matches!(
            OpenFilter::parse(Some("quizas")),
            Err(ServiceError::InvalidInput(_))
        );
    }
}
