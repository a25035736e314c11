//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::base_fee::BaseFeeRepository;
use crate::domain::extra_fee::ExtraFeeRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::weather::WeatherObservationRepository;

use super::base_fee_repository::SeaOrmBaseFeeRepository;
use super::extra_fee_repository::SeaOrmExtraFeeRepository;
use super::weather_repository::SeaOrmWeatherRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let fee = repos.base_fees().find_by_city_and_vehicle("Tartu", "Bike").await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    base_fees: SeaOrmBaseFeeRepository,
    extra_fees: SeaOrmExtraFeeRepository,
    weather: SeaOrmWeatherRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base_fees: SeaOrmBaseFeeRepository::new(db.clone()),
            extra_fees: SeaOrmExtraFeeRepository::new(db.clone()),
            weather: SeaOrmWeatherRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn base_fees(&self) -> &dyn BaseFeeRepository {
        &self.base_fees
    }

    fn extra_fees(&self) -> &dyn ExtraFeeRepository {
        &self.extra_fees
    }

    fn weather(&self) -> &dyn WeatherObservationRepository {
        &self.weather
    }
}
