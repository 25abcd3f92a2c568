//! sea-orm entities for the catalog and location tables.

/// Case folding used for every searchable text column.
///
/// SQLite's `LOWER()` only folds ASCII, so names are folded here and stored
/// next to the original value; queries compare against the stored copy.
pub fn fold_text(raw: &str) -> String {
    raw.to_lowercase()
}

/// Folds a source column value into its shadow column value.
pub(crate) trait FoldCase {
    type Folded;

    fn fold_case(&self) -> Self::Folded;
}

impl FoldCase for String {
    type Folded = String;

    fn fold_case(&self) -> String {
        fold_text(self)
    }
}

impl FoldCase for Option<String> {
    type Folded = Option<String>;

    fn fold_case(&self) -> Option<String> {
        self.as_deref().map(fold_text)
    }
}

/// Stamps `created_at`/`updated_at`, defaults `active` on insert and keeps
/// each `source => folded` column pair in sync.
macro_rules! impl_bookkeeping_behavior {
    ($($source:ident => $folded:ident),* $(,)?) => {
        #[async_trait::async_trait]
        impl ActiveModelBehavior for ActiveModel {
            async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
            where
                C: ConnectionTrait,
            {
                let mut active_model = self;
                let now = chrono::Utc::now();

                if insert {
                    if let sea_orm::ActiveValue::NotSet = active_model.active {
                        active_model.active = sea_orm::ActiveValue::Set(true);
                    }
                    active_model.created_at = sea_orm::ActiveValue::Set(now);
                }
                active_model.updated_at = sea_orm::ActiveValue::Set(now);

                $(
                    if let sea_orm::ActiveValue::Set(value) = &active_model.$source {
                        let folded = crate::entities::FoldCase::fold_case(value);
                        active_model.$folded = sea_orm::ActiveValue::Set(folded);
                    }
                )*

                Ok(active_model)
            }
        }
    };
}

pub(crate) use impl_bookkeeping_behavior;

pub mod branch;
pub mod category;
pub mod part;
pub mod part_vehicle;
pub mod professional;
pub mod stock;
pub mod store;
pub mod vehicle;
