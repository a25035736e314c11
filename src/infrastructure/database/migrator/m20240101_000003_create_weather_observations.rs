//! Create weather_observations table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WeatherObservations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WeatherObservations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WeatherObservations::StationName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WeatherObservations::WmoCode)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(WeatherObservations::AirTemperature).double())
                    .col(ColumnDef::new(WeatherObservations::WindSpeed).double())
                    .col(ColumnDef::new(WeatherObservations::Phenomenon).string())
                    .col(
                        ColumnDef::new(WeatherObservations::ObservedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_weather_observations_wmo_time")
                    .table(WeatherObservations::Table)
                    .col(WeatherObservations::WmoCode)
                    .col(WeatherObservations::ObservedAt)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_weather_observations_station")
                    .table(WeatherObservations::Table)
                    .col(WeatherObservations::StationName)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WeatherObservations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum WeatherObservations {
    Table,
    Id,
    StationName,
    WmoCode,
    AirTemperature,
    WindSpeed,
    Phenomenon,
    ObservedAt,
}
