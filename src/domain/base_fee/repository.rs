//! Base fee repository interface

use async_trait::async_trait;

use super::model::BaseFee;
use crate::domain::DomainResult;

#[async_trait]
pub trait BaseFeeRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<BaseFee>>;

    /// Exact (city, vehicle type) lookup used by the fee engine
    async fn find_by_city_and_vehicle(
        &self,
        city: &str,
        vehicle_type: &str,
    ) -> DomainResult<Option<BaseFee>>;

    async fn find_all(&self) -> DomainResult<Vec<BaseFee>>;

    /// Insert a new record; fails with `Conflict` if the pair is taken
    async fn save(&self, fee: BaseFee) -> DomainResult<BaseFee>;

    /// Insert every record or none of them
    async fn save_all(&self, fees: Vec<BaseFee>) -> DomainResult<Vec<BaseFee>>;

    /// Replace city, vehicle type and fee of an existing record
    async fn update(&self, fee: BaseFee) -> DomainResult<BaseFee>;

    async fn delete(&self, id: i32) -> DomainResult<()>;
}
