use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_stores_and_branches::Migration),
            Box::new(m20250101_000002_create_catalog_tables::Migration),
            Box::new(m20250101_000003_create_branch_stock_table::Migration),
            Box::new(m20250101_000004_create_professionals_table::Migration),
        ]
    }
}

// Bookkeeping columns shared by every catalog table.
fn bookkeeping_columns(table: &mut TableCreateStatement) -> &mut TableCreateStatement {
    table
        .col(
            ColumnDef::new(Alias::new("active"))
                .boolean()
                .not_null()
                .default(true),
        )
        .col(
            ColumnDef::new(Alias::new("created_at"))
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(Alias::new("updated_at"))
                .timestamp_with_time_zone()
                .not_null(),
        )
}

// Opening hours shared by stores, branches and professionals.
fn schedule_columns(table: &mut TableCreateStatement) -> &mut TableCreateStatement {
    table
        .col(ColumnDef::new(Alias::new("opening_time")).time().null())
        .col(ColumnDef::new(Alias::new("closing_time")).time().null())
        .col(
            ColumnDef::new(Alias::new("days_of_week"))
                .string_len(64)
                .not_null()
                .default(""),
        )
}

mod m20250101_000001_create_stores_and_branches {
    use super::{bookkeeping_columns, schedule_columns};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000001_create_stores_and_branches"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let mut stores = Table::create();
            stores
                .table(Stores::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(Stores::Id)
                        .integer()
                        .not_null()
                        .auto_increment()
                        .primary_key(),
                )
                .col(
                    ColumnDef::new(Stores::Name)
                        .string_len(100)
                        .not_null()
                        .unique_key(),
                )
                .col(ColumnDef::new(Stores::NameFolded).string_len(100).not_null())
                .col(ColumnDef::new(Stores::LogoUrl).string_len(500).null())
                .col(ColumnDef::new(Stores::Email).string_len(254).null())
                .col(ColumnDef::new(Stores::Phone).string_len(20).null())
                .col(ColumnDef::new(Stores::HoursDescription).string_len(100).null())
                .col(
                    ColumnDef::new(Stores::HasDelivery)
                        .boolean()
                        .not_null()
                        .default(false),
                )
                .col(ColumnDef::new(Stores::Address).string_len(255).null())
                .col(ColumnDef::new(Stores::Latitude).double().null())
                .col(ColumnDef::new(Stores::Longitude).double().null());
            schedule_columns(&mut stores);
            bookkeeping_columns(&mut stores);
            manager.create_table(stores.to_owned()).await?;

            let mut branches = Table::create();
            branches
                .table(Branches::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(Branches::Id)
                        .integer()
                        .not_null()
                        .auto_increment()
                        .primary_key(),
                )
                .col(ColumnDef::new(Branches::StoreId).integer().not_null())
                .col(ColumnDef::new(Branches::Name).string_len(100).not_null())
                .col(ColumnDef::new(Branches::NameFolded).string_len(100).not_null())
                .col(ColumnDef::new(Branches::Address).string_len(255).not_null())
                .col(ColumnDef::new(Branches::Phone).string_len(20).null())
                .col(ColumnDef::new(Branches::Latitude).double().not_null())
                .col(ColumnDef::new(Branches::Longitude).double().not_null())
                .col(
                    ColumnDef::new(Branches::HasDelivery)
                        .boolean()
                        .not_null()
                        .default(false),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_branches_store_id")
                        .from(Branches::Table, Branches::StoreId)
                        .to(Stores::Table, Stores::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                );
            schedule_columns(&mut branches);
            bookkeeping_columns(&mut branches);
            manager.create_table(branches.to_owned()).await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_branches_store_id")
                        .table(Branches::Table)
                        .col(Branches::StoreId)
                        .if_not_exists()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Branches::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Stores::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Stores {
        Table,
        Id,
        Name,
        NameFolded,
        LogoUrl,
        Email,
        Phone,
        HoursDescription,
        HasDelivery,
        Address,
        Latitude,
        Longitude,
    }

    #[derive(DeriveIden)]
    pub enum Branches {
        Table,
        Id,
        StoreId,
        Name,
        NameFolded,
        Address,
        Phone,
        Latitude,
        Longitude,
        HasDelivery,
    }
}

mod m20250101_000002_create_catalog_tables {
    use super::bookkeeping_columns;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000002_create_catalog_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let mut categories = Table::create();
            categories
                .table(Categories::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(Categories::Id)
                        .integer()
                        .not_null()
                        .auto_increment()
                        .primary_key(),
                )
                .col(
                    ColumnDef::new(Categories::Name)
                        .string_len(100)
                        .not_null()
                        .unique_key(),
                )
                .col(ColumnDef::new(Categories::Description).text().null());
            bookkeeping_columns(&mut categories);
            manager.create_table(categories.to_owned()).await?;

            let mut vehicles = Table::create();
            vehicles
                .table(Vehicles::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(Vehicles::Id)
                        .integer()
                        .not_null()
                        .auto_increment()
                        .primary_key(),
                )
                .col(ColumnDef::new(Vehicles::Brand).string_len(50).not_null())
                .col(ColumnDef::new(Vehicles::Model).string_len(50).not_null())
                .col(ColumnDef::new(Vehicles::BrandFolded).string_len(50).not_null())
                .col(ColumnDef::new(Vehicles::ModelFolded).string_len(50).not_null())
                .col(ColumnDef::new(Vehicles::Year).integer().not_null());
            bookkeeping_columns(&mut vehicles);
            manager.create_table(vehicles.to_owned()).await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_vehicles_brand_model_year")
                        .table(Vehicles::Table)
                        .col(Vehicles::Brand)
                        .col(Vehicles::Model)
                        .col(Vehicles::Year)
                        .unique()
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;

            let mut parts = Table::create();
            parts
                .table(Parts::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(Parts::Id)
                        .integer()
                        .not_null()
                        .auto_increment()
                        .primary_key(),
                )
                .col(ColumnDef::new(Parts::Name).string_len(200).not_null())
                .col(ColumnDef::new(Parts::NameFolded).string_len(200).not_null())
                .col(ColumnDef::new(Parts::Description).text().null())
                .col(ColumnDef::new(Parts::DescriptionFolded).text().null())
                .col(ColumnDef::new(Parts::CategoryId).integer().null())
                .col(ColumnDef::new(Parts::ImageUrl).string_len(500).null())
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_parts_category_id")
                        .from(Parts::Table, Parts::CategoryId)
                        .to(Categories::Table, Categories::Id)
                        .on_delete(ForeignKeyAction::SetNull),
                );
            bookkeeping_columns(&mut parts);
            manager.create_table(parts.to_owned()).await?;

            manager
                .create_table(
                    Table::create()
                        .table(PartVehicles::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(PartVehicles::PartId).integer().not_null())
                        .col(ColumnDef::new(PartVehicles::VehicleId).integer().not_null())
                        .primary_key(
                            Index::create()
                                .col(PartVehicles::PartId)
                                .col(PartVehicles::VehicleId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_part_vehicles_part_id")
                                .from(PartVehicles::Table, PartVehicles::PartId)
                                .to(Parts::Table, Parts::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_part_vehicles_vehicle_id")
                                .from(PartVehicles::Table, PartVehicles::VehicleId)
                                .to(Vehicles::Table, Vehicles::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_part_vehicles_vehicle_id")
                        .table(PartVehicles::Table)
                        .col(PartVehicles::VehicleId)
                        .if_not_exists()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PartVehicles::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Parts::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Vehicles::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Categories::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Categories {
        Table,
        Id,
        Name,
        Description,
    }

    #[derive(DeriveIden)]
    pub enum Vehicles {
        Table,
        Id,
        Brand,
        Model,
        BrandFolded,
        ModelFolded,
        Year,
    }

    #[derive(DeriveIden)]
    pub enum Parts {
        Table,
        Id,
        Name,
        NameFolded,
        Description,
        DescriptionFolded,
        CategoryId,
        ImageUrl,
    }

    #[derive(DeriveIden)]
    pub enum PartVehicles {
        Table,
        PartId,
        VehicleId,
    }
}

mod m20250101_000003_create_branch_stock_table {
    use super::bookkeeping_columns;
    use super::m20250101_000001_create_stores_and_branches::Branches;
    use super::m20250101_000002_create_catalog_tables::Parts;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000003_create_branch_stock_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let mut stock = Table::create();
            stock
                .table(BranchStock::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(BranchStock::Id)
                        .integer()
                        .not_null()
                        .auto_increment()
                        .primary_key(),
                )
                .col(ColumnDef::new(BranchStock::BranchId).integer().not_null())
                .col(ColumnDef::new(BranchStock::PartId).integer().not_null())
                .col(ColumnDef::new(BranchStock::Price).decimal_len(10, 2).not_null())
                .col(
                    ColumnDef::new(BranchStock::Stock)
                        .integer()
                        .not_null()
                        .default(0),
                )
                .col(
                    ColumnDef::new(BranchStock::MinStock)
                        .integer()
                        .not_null()
                        .default(0),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_branch_stock_branch_id")
                        .from(BranchStock::Table, BranchStock::BranchId)
                        .to(Branches::Table, Branches::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_branch_stock_part_id")
                        .from(BranchStock::Table, BranchStock::PartId)
                        .to(Parts::Table, Parts::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                );
            bookkeeping_columns(&mut stock);
            manager.create_table(stock.to_owned()).await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_branch_stock_branch_part")
                        .table(BranchStock::Table)
                        .col(BranchStock::BranchId)
                        .col(BranchStock::PartId)
                        .unique()
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_branch_stock_part_id")
                        .table(BranchStock::Table)
                        .col(BranchStock::PartId)
                        .if_not_exists()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(BranchStock::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum BranchStock {
        Table,
        Id,
        BranchId,
        PartId,
        Price,
        Stock,
        MinStock,
    }
}

mod m20250101_000004_create_professionals_table {
    use super::{bookkeeping_columns, schedule_columns};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000004_create_professionals_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let mut professionals = Table::create();
            professionals
                .table(Professionals::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(Professionals::Id)
                        .integer()
                        .not_null()
                        .auto_increment()
                        .primary_key(),
                )
                .col(
                    ColumnDef::new(Professionals::WorkshopName)
                        .string_len(255)
                        .not_null(),
                )
                .col(
                    ColumnDef::new(Professionals::WorkshopNameFolded)
                        .string_len(255)
                        .not_null(),
                )
                .col(
                    ColumnDef::new(Professionals::HeadMechanicName)
                        .string_len(255)
                        .null(),
                )
                .col(ColumnDef::new(Professionals::Address).string_len(255).not_null())
                .col(ColumnDef::new(Professionals::ContactPhone).string_len(20).null())
                .col(
                    ColumnDef::new(Professionals::ServiceTypes)
                        .string_len(100)
                        .not_null()
                        .default(""),
                )
                .col(
                    ColumnDef::new(Professionals::IsFeatured)
                        .boolean()
                        .not_null()
                        .default(false),
                )
                .col(ColumnDef::new(Professionals::Latitude).double().not_null())
                .col(ColumnDef::new(Professionals::Longitude).double().not_null())
                .col(ColumnDef::new(Professionals::LogoUrl).string_len(500).null());
            schedule_columns(&mut professionals);
            bookkeeping_columns(&mut professionals);
            manager.create_table(professionals.to_owned()).await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Professionals::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Professionals {
        Table,
        Id,
        WorkshopName,
        WorkshopNameFolded,
        HeadMechanicName,
        Address,
        ContactPhone,
        ServiceTypes,
        IsFeatured,
        Latitude,
        Longitude,
        LogoUrl,
    }
}
