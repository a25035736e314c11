//! Insert the default base fees and weather extra fees

use rust_decimal::prelude::ToPrimitive;
use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_base_fees::BaseFees;
use super::m20240101_000002_create_extra_fees::ExtraFees;
use crate::infrastructure::seed;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let now = chrono::Utc::now();

        let mut base_fees = Query::insert()
            .into_table(BaseFees::Table)
            .columns([
                BaseFees::City,
                BaseFees::VehicleType,
                BaseFees::Fee,
                BaseFees::CreatedAt,
                BaseFees::UpdatedAt,
            ])
            .to_owned();
        for (city, vehicle_type, fee) in seed::base_fee_rows() {
            base_fees.values_panic([
                city.into(),
                vehicle_type.into(),
                fee.to_f64().unwrap_or_default().into(),
                now.into(),
                now.into(),
            ]);
        }
        manager.exec_stmt(base_fees).await?;

        let mut extra_fees = Query::insert()
            .into_table(ExtraFees::Table)
            .columns([
                ExtraFees::ConditionType,
                ExtraFees::VehicleType,
                ExtraFees::MinValue,
                ExtraFees::MaxValue,
                ExtraFees::WeatherPhenomenon,
                ExtraFees::IsForbidden,
                ExtraFees::Fee,
                ExtraFees::CreatedAt,
                ExtraFees::UpdatedAt,
            ])
            .to_owned();
        for rule in seed::extra_fee_rows() {
            extra_fees.values_panic([
                rule.condition_type.as_str().into(),
                rule.vehicle_type.into(),
                rule.min().and_then(|v| v.to_f64()).into(),
                rule.max().and_then(|v| v.to_f64()).into(),
                rule.phenomenon.map(str::to_string).into(),
                rule.is_forbidden.into(),
                rule.fee().to_f64().unwrap_or_default().into(),
                now.into(),
                now.into(),
            ]);
        }
        manager.exec_stmt(extra_fees).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(Query::delete().from_table(ExtraFees::Table).to_owned())
            .await?;
        manager
            .exec_stmt(Query::delete().from_table(BaseFees::Table).to_owned())
            .await
    }
}
