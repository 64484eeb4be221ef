use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_catalog_tables::Migration),
            Box::new(m20240101_000002_create_purchase_request_tables::Migration),
            Box::new(m20240101_000003_create_lots_table::Migration),
            Box::new(m20240101_000004_create_lot_movements_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_catalog_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_catalog_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Suppliers::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Suppliers::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Suppliers::Name).string().not_null())
                        .col(ColumnDef::new(Suppliers::Document).string().not_null())
                        .col(ColumnDef::new(Suppliers::Email).string().null())
                        .col(ColumnDef::new(Suppliers::Phone).string().null())
                        .col(ColumnDef::new(Suppliers::Street).string().null())
                        .col(ColumnDef::new(Suppliers::City).string().null())
                        .col(ColumnDef::new(Suppliers::State).string().null())
                        .col(ColumnDef::new(Suppliers::PostalCode).string().null())
                        .col(
                            ColumnDef::new(Suppliers::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Suppliers::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Suppliers::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(MaterialTypes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MaterialTypes::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(MaterialTypes::Name).string().not_null())
                        .col(
                            ColumnDef::new(MaterialTypes::Code)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(MaterialTypes::BaseClassification)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(MaterialTypes::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(MaterialTypes::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaterialTypes::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(RatingConfigurations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(RatingConfigurations::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RatingConfigurations::SupplierId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RatingConfigurations::MaterialTypeId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RatingConfigurations::LightStars)
                                .small_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RatingConfigurations::MediumStars)
                                .small_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RatingConfigurations::HeavyStars)
                                .small_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RatingConfigurations::UpdatedBy)
                                .uuid()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(RatingConfigurations::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RatingConfigurations::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            // One rating table per (supplier, material) pair
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_rating_configurations_supplier_material")
                        .table(RatingConfigurations::Table)
                        .col(RatingConfigurations::SupplierId)
                        .col(RatingConfigurations::MaterialTypeId)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PriceConfigurations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PriceConfigurations::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PriceConfigurations::MaterialTypeId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PriceConfigurations::Classification)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PriceConfigurations::PricePerKg)
                                .decimal_len(19, 4)
                                .not_null(),
                        )
                        .col(ColumnDef::new(PriceConfigurations::UpdatedBy).uuid().null())
                        .col(
                            ColumnDef::new(PriceConfigurations::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PriceConfigurations::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            // One price per (material, classification) pair
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_price_configurations_material_classification")
                        .table(PriceConfigurations::Table)
                        .col(PriceConfigurations::MaterialTypeId)
                        .col(PriceConfigurations::Classification)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PriceConfigurations::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(RatingConfigurations::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(MaterialTypes::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Suppliers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Suppliers {
        Table,
        Id,
        Name,
        Document,
        Email,
        Phone,
        Street,
        City,
        State,
        PostalCode,
        Active,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum MaterialTypes {
        Table,
        Id,
        Name,
        Code,
        BaseClassification,
        Active,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum RatingConfigurations {
        Table,
        Id,
        SupplierId,
        MaterialTypeId,
        LightStars,
        MediumStars,
        HeavyStars,
        UpdatedBy,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum PriceConfigurations {
        Table,
        Id,
        MaterialTypeId,
        Classification,
        PricePerKg,
        UpdatedBy,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000002_create_purchase_request_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_purchase_request_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PurchaseRequests::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PurchaseRequests::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseRequests::RequestNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(PurchaseRequests::RequesterId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseRequests::SupplierId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PurchaseRequests::Notes).string().null())
                        .col(
                            ColumnDef::new(PurchaseRequests::PickupRequested)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(PurchaseRequests::Status).string().not_null())
                        .col(
                            ColumnDef::new(PurchaseRequests::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseRequests::ConfirmedAt)
                                .timestamp()
                                .null(),
                        )
                        .col(ColumnDef::new(PurchaseRequests::ApprovedBy).uuid().null())
                        .col(
                            ColumnDef::new(PurchaseRequests::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_purchase_requests_supplier_id")
                        .table(PurchaseRequests::Table)
                        .col(PurchaseRequests::SupplierId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_purchase_requests_status")
                        .table(PurchaseRequests::Table)
                        .col(PurchaseRequests::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(RequestItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(RequestItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(RequestItems::RequestId).uuid().not_null())
                        .col(
                            ColumnDef::new(RequestItems::MaterialTypeId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RequestItems::WeightKg)
                                .decimal_len(19, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RequestItems::SuggestedClassification)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(RequestItems::Classification)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RequestItems::Stars)
                                .small_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RequestItems::UnitPrice)
                                .decimal_len(19, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RequestItems::TotalValue)
                                .decimal_len(19, 4)
                                .not_null(),
                        )
                        .col(ColumnDef::new(RequestItems::LotId).uuid().null())
                        .col(
                            ColumnDef::new(RequestItems::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_request_items_request_id")
                                .from(RequestItems::Table, RequestItems::RequestId)
                                .to(PurchaseRequests::Table, PurchaseRequests::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_request_items_request_id")
                        .table(RequestItems::Table)
                        .col(RequestItems::RequestId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_request_items_lot_id")
                        .table(RequestItems::Table)
                        .col(RequestItems::LotId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(RequestItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(PurchaseRequests::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum PurchaseRequests {
        Table,
        Id,
        RequestNumber,
        RequesterId,
        SupplierId,
        Notes,
        PickupRequested,
        Status,
        CreatedAt,
        ConfirmedAt,
        ApprovedBy,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum RequestItems {
        Table,
        Id,
        RequestId,
        MaterialTypeId,
        WeightKg,
        SuggestedClassification,
        Classification,
        Stars,
        UnitPrice,
        TotalValue,
        LotId,
        CreatedAt,
    }
}

mod m20240101_000003_create_lots_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_lots_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Lots::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Lots::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Lots::LotNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Lots::RequestId).uuid().not_null())
                        .col(ColumnDef::new(Lots::SupplierId).uuid().not_null())
                        .col(ColumnDef::new(Lots::MaterialTypeId).uuid().not_null())
                        .col(ColumnDef::new(Lots::Classification).string().not_null())
                        .col(
                            ColumnDef::new(Lots::TotalWeightKg)
                                .decimal_len(19, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Lots::TotalValue)
                                .decimal_len(19, 4)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Lots::ItemCount).integer().not_null())
                        .col(ColumnDef::new(Lots::Status).string().not_null())
                        .col(ColumnDef::new(Lots::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Lots::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            // At most one lot per request, enforced at the storage layer.
            // The receive transition relies on this to stay idempotent under
            // concurrent calls.
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_lots_request_id")
                        .table(Lots::Table)
                        .col(Lots::RequestId)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_lots_supplier_id")
                        .table(Lots::Table)
                        .col(Lots::SupplierId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Lots::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Lots {
        Table,
        Id,
        LotNumber,
        RequestId,
        SupplierId,
        MaterialTypeId,
        Classification,
        TotalWeightKg,
        TotalValue,
        ItemCount,
        Status,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000004_create_lot_movements_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_lot_movements_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(LotMovements::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(LotMovements::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(LotMovements::LotId).uuid().not_null())
                        .col(
                            ColumnDef::new(LotMovements::MovementType)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(LotMovements::OriginLocation)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(LotMovements::DestinationLocation)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(LotMovements::WeightKg)
                                .decimal_len(19, 4)
                                .not_null(),
                        )
                        .col(ColumnDef::new(LotMovements::PerformedBy).uuid().not_null())
                        .col(ColumnDef::new(LotMovements::Notes).string().null())
                        .col(
                            ColumnDef::new(LotMovements::BeforeSnapshot)
                                .json_binary()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(LotMovements::AfterSnapshot)
                                .json_binary()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(LotMovements::AuditTrail)
                                .json_binary()
                                .not_null(),
                        )
                        .col(ColumnDef::new(LotMovements::MovedAt).timestamp().not_null())
                        .col(
                            ColumnDef::new(LotMovements::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_lot_movements_lot_id")
                                .from(LotMovements::Table, LotMovements::LotId)
                                .to(Lots::Table, Lots::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_lot_movements_lot_id")
                        .table(LotMovements::Table)
                        .col(LotMovements::LotId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_lot_movements_lot_moved_at")
                        .table(LotMovements::Table)
                        .col(LotMovements::LotId)
                        .col(LotMovements::MovedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(LotMovements::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum LotMovements {
        Table,
        Id,
        LotId,
        MovementType,
        OriginLocation,
        DestinationLocation,
        WeightKg,
        PerformedBy,
        Notes,
        BeforeSnapshot,
        AfterSnapshot,
        AuditTrail,
        MovedAt,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Lots {
        Table,
        Id,
    }
}
