//! Create extra_fees table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ExtraFees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExtraFees::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ExtraFees::ConditionType)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ExtraFees::VehicleType).string().not_null())
                    .col(ColumnDef::new(ExtraFees::MinValue).double())
                    .col(ColumnDef::new(ExtraFees::MaxValue).double())
                    .col(ColumnDef::new(ExtraFees::WeatherPhenomenon).string())
                    .col(
                        ColumnDef::new(ExtraFees::IsForbidden)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ExtraFees::Fee)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(ExtraFees::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExtraFees::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // The fee engine always filters by both columns
        manager
            .create_index(
                Index::create()
                    .name("idx_extra_fees_condition_vehicle")
                    .table(ExtraFees::Table)
                    .col(ExtraFees::ConditionType)
                    .col(ExtraFees::VehicleType)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ExtraFees::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ExtraFees {
    Table,
    Id,
    ConditionType,
    VehicleType,
    MinValue,
    MaxValue,
    WeatherPhenomenon,
    IsForbidden,
    Fee,
    CreatedAt,
    UpdatedAt,
}
