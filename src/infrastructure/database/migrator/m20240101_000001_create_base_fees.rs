//! Create base_fees table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BaseFees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BaseFees::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BaseFees::City).string().not_null())
                    .col(ColumnDef::new(BaseFees::VehicleType).string().not_null())
                    .col(ColumnDef::new(BaseFees::Fee).double().not_null())
                    .col(
                        ColumnDef::new(BaseFees::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BaseFees::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_base_fees_city_vehicle_type")
                    .table(BaseFees::Table)
                    .col(BaseFees::City)
                    .col(BaseFees::VehicleType)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BaseFees::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum BaseFees {
    Table,
    Id,
    City,
    VehicleType,
    Fee,
    CreatedAt,
    UpdatedAt,
}
