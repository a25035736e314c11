//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_base_fees;
mod m20240101_000002_create_extra_fees;
mod m20240101_000003_create_weather_observations;
mod m20240101_000004_seed_default_fee_rules;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_base_fees::Migration),
            Box::new(m20240101_000002_create_extra_fees::Migration),
            Box::new(m20240101_000003_create_weather_observations::Migration),
            Box::new(m20240101_000004_seed_default_fee_rules::Migration),
        ]
    }
}
