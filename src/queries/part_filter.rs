//! Part search: optional filter parameters folded into a single query.
//!
//! Every supplied parameter becomes one [`PartClause`]; the clauses are
//! AND-ed. Brand, model and year are matched against the same compatible
//! vehicle row, so `marca=Toyota&anio=2015` means "fits a 2015 Toyota".
//! A part that fits a 2010 Toyota and a 2015 Ford does not match it. This is
//! stricter than joining the compatibility table once per parameter, where
//! each parameter may be satisfied by a different vehicle.
//! The vehicle join can yield one row per matching vehicle, so results are
//! reduced to distinct parts afterwards, keeping the first occurrence.
//!
//! Text comparisons run against the `*_folded` shadow columns, which hold
//! [`fold_text`] of the original value.

use super::Query;
use crate::entities::{fold_text, part, part_vehicle, vehicle};
use crate::errors::ServiceError;
use async_trait::async_trait;
use sea_orm::sea_query::{Expr, LikeExpr};
use sea_orm::{
    Condition, DatabaseConnection, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Select,
};
use serde::Deserialize;
use std::collections::HashSet;
use tracing::{debug, instrument};
use utoipa::IntoParams;

const LIKE_ESCAPE: char = '\\';

/// Raw query-string parameters, validated by [`PartFilter::try_from`].
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PartFilterParams {
    /// Case-insensitive substring of the part name or description
    pub search: Option<String>,
    /// Compatible vehicle brand, case-insensitive exact match
    pub marca: Option<String>,
    /// Compatible vehicle model, case-insensitive exact match
    pub modelo: Option<String>,
    /// Compatible vehicle year
    pub anio: Option<String>,
    /// Category id
    pub categoria_id: Option<String>,
}

/// Validated part filter. `None` fields do not constrain the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartFilter {
    pub search: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub category_id: Option<i32>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_int(name: &str, value: Option<String>) -> Result<Option<i32>, ServiceError> {
    non_blank(value)
        .map(|raw| {
            raw.parse::<i32>().map_err(|_| {
                ServiceError::InvalidInput(format!("{} must be an integer, got '{}'", name, raw))
            })
        })
        .transpose()
}

impl TryFrom<PartFilterParams> for PartFilter {
    type Error = ServiceError;

    fn try_from(params: PartFilterParams) -> Result<Self, Self::Error> {
        Ok(Self {
            year: parse_int("anio", params.anio)?,
            category_id: parse_int("categoria_id", params.categoria_id)?,
            search: non_blank(params.search),
            brand: non_blank(params.marca),
            model: non_blank(params.modelo),
        })
    }
}

impl PartFilter {
    /// Clauses in a fixed order: text, brand, model, year, category.
    pub fn clauses(&self) -> Vec<PartClause> {
        let mut clauses = Vec::new();
        if let Some(term) = &self.search {
            clauses.push(PartClause::Text(term.clone()));
        }
        if let Some(brand) = &self.brand {
            clauses.push(PartClause::Brand(brand.clone()));
        }
        if let Some(model) = &self.model {
            clauses.push(PartClause::Model(model.clone()));
        }
        if let Some(year) = self.year {
            clauses.push(PartClause::Year(year));
        }
        if let Some(category_id) = self.category_id {
            clauses.push(PartClause::Category(category_id));
        }
        clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses().is_empty()
    }
}

/// One predicate over parts (and, for vehicle clauses, the joined vehicle).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartClause {
    Text(String),
    Brand(String),
    Model(String),
    Year(i32),
    Category(i32),
}

impl PartClause {
    pub fn uses_vehicle(&self) -> bool {
        matches!(
            self,
            PartClause::Brand(_) | PartClause::Model(_) | PartClause::Year(_)
        )
    }

    pub fn condition(&self) -> Condition {
        match self {
            PartClause::Text(term) => {
                let pattern = like_contains(term);
                Condition::any()
                    .add(
                        Expr::col((part::Entity, part::Column::NameFolded))
                            .like(LikeExpr::new(pattern.clone()).escape(LIKE_ESCAPE)),
                    )
                    .add(
                        Expr::col((part::Entity, part::Column::DescriptionFolded))
                            .like(LikeExpr::new(pattern).escape(LIKE_ESCAPE)),
                    )
            }
            PartClause::Brand(brand) => Condition::all().add(
                Expr::col((vehicle::Entity, vehicle::Column::BrandFolded)).eq(fold_text(brand)),
            ),
            PartClause::Model(model) => Condition::all().add(
                Expr::col((vehicle::Entity, vehicle::Column::ModelFolded)).eq(fold_text(model)),
            ),
            PartClause::Year(year) => {
                Condition::all().add(Expr::col((vehicle::Entity, vehicle::Column::Year)).eq(*year))
            }
            PartClause::Category(id) => Condition::all()
                .add(Expr::col((part::Entity, part::Column::CategoryId)).eq(*id)),
        }
    }
}

/// `%term%`, case-folded, with LIKE wildcards escaped so they match literally.
pub fn like_contains(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in fold_text(term).chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

pub fn fold_clauses(clauses: &[PartClause]) -> Condition {
    clauses
        .iter()
        .fold(Condition::all(), |acc, clause| acc.add(clause.condition()))
}

/// Select over parts in default order (name, then id) with the clauses applied.
pub fn select_parts(clauses: &[PartClause]) -> Select<part::Entity> {
    let mut select = part::Entity::find();
    if clauses.iter().any(PartClause::uses_vehicle) {
        select = select
            .join(JoinType::InnerJoin, part::Relation::PartVehicle.def())
            .join(JoinType::InnerJoin, part_vehicle::Relation::Vehicle.def());
    }
    select
        .filter(fold_clauses(clauses))
        .order_by_asc(part::Column::Name)
        .order_by_asc(part::Column::Id)
}

/// Drops repeated parts, keeping the first occurrence and the incoming order.
pub fn dedup_by_id(rows: Vec<part::Model>) -> Vec<part::Model> {
    let mut seen = HashSet::with_capacity(rows.len());
    rows.into_iter().filter(|row| seen.insert(row.id)).collect()
}

#[derive(Debug, Clone)]
pub struct SearchPartsQuery {
    pub filter: PartFilter,
}

impl SearchPartsQuery {
    pub fn new(filter: PartFilter) -> Self {
        Self { filter }
    }
}

#[async_trait]
impl Query for SearchPartsQuery {
    type Result = Vec<part::Model>;

    #[instrument(skip(self, db_pool), fields(filter = ?self.filter))]
    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        let clauses = self.filter.clauses();
        let rows = select_parts(&clauses).all(db_pool).await?;
        let fetched = rows.len();
        let parts = dedup_by_id(rows);
        debug!(fetched, distinct = parts.len(), "part search evaluated");
        Ok(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Utc;
    use sea_orm::{DbBackend, QueryTrait};

    fn sql(clauses: &[PartClause]) -> String {
        select_parts(clauses).build(DbBackend::Sqlite).to_string()
    }

    fn params(pairs: &[(&str, &str)]) -> PartFilterParams {
        let mut p = PartFilterParams::default();
        for (k, v) in pairs {
            let v = Some(v.to_string());
            match *k {
                "search" => p.search = v,
                "marca" => p.marca = v,
                "modelo" => p.modelo = v,
                "anio" => p.anio = v,
                "categoria_id" => p.categoria_id = v,
                _ => unreachable!(),
            }
        }
        p
    }

    fn part(id: i32, name: &str) -> part::Model {
        part::Model {
            id,
            name: name.to_string(),
            name_folded: fold_text(name),
            description: None,
            description_folded: None,
            category_id: None,
            image_url: None,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn empty_strings_are_absent() {
        let filter =
            PartFilter::try_from(params(&[("search", ""), ("marca", "  "), ("anio", "")])).unwrap();
        assert!(filter.is_empty());
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        assert_matches!(
            PartFilter::try_from(params(&[("anio", "dos mil")])),
            Err(ServiceError::InvalidInput(msg)) if msg.contains("anio")
        );
        assert_matches!(
            PartFilter::try_from(params(&[("categoria_id", "x")])),
            Err(ServiceError::InvalidInput(msg)) if msg.contains("categoria_id")
        );
    }

    #[test]
    fn clauses_follow_fixed_order() {
        let filter = PartFilter::try_from(params(&[
            ("categoria_id", "3"),
            ("anio", "2015"),
            ("marca", "Toyota"),
            ("search", "freno"),
        ]))
        .unwrap();
        assert_eq!(
            filter.clauses(),
            vec![
                PartClause::Text("freno".into()),
                PartClause::Brand("Toyota".into()),
                PartClause::Year(2015),
                PartClause::Category(3),
            ]
        );
    }

    #[test]
    fn no_clauses_means_plain_ordered_select() {
        let sql = sql(&[]);
        assert!(!sql.contains("WHERE"));
        assert!(!sql.contains("JOIN"));
        assert!(sql.contains(r#"ORDER BY "parts"."name" ASC, "parts"."id" ASC"#));
    }

    #[test]
    fn vehicle_clauses_share_one_join() {
        let sql = sql(&[
            PartClause::Brand("Toyota".into()),
            PartClause::Model("Corolla".into()),
            PartClause::Year(2015),
        ]);
        assert_eq!(sql.matches("INNER JOIN").count(), 2);
        assert_eq!(sql.matches(r#"INNER JOIN "vehicles""#).count(), 1);
        assert!(sql.contains(r#""vehicles"."brand_folded" = 'toyota'"#));
        assert!(sql.contains(r#""vehicles"."model_folded" = 'corolla'"#));
        assert!(sql.contains(r#""vehicles"."year" = 2015"#));
    }

    #[test]
    fn text_clause_searches_name_or_description() {
        let sql = sql(&[PartClause::Text("Freno".into())]);
        assert!(!sql.contains("JOIN"));
        assert!(sql.contains(r#""parts"."name_folded" LIKE"#));
        assert!(sql.contains(r#""parts"."description_folded" LIKE"#));
        assert!(!sql.contains("LOWER("));
        assert!(sql.contains(" OR "));
        assert!(sql.contains("ESCAPE"));
    }

    #[test]
    fn category_clause_is_exact() {
        let sql = sql(&[PartClause::Category(7)]);
        assert!(sql.contains(r#""parts"."category_id" = 7"#));
    }

    #[test]
    fn like_wildcards_match_literally() {
        assert_eq!(like_contains("Freno"), "%freno%");
        assert_eq!(like_contains("DISTRIBUCIÓN"), "%distribución%");
        assert_eq!(like_contains("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_contains("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn dedup_keeps_first_occurrence_in_order() {
        let rows = vec![part(2, "b"), part(1, "a"), part(2, "b"), part(3, "c"), part(1, "a")];
        let ids: Vec<i32> = dedup_by_id(rows).into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }
}
