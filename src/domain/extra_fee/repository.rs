//! Extra fee repository interface

use async_trait::async_trait;

use super::model::{ConditionType, ExtraFee};
use crate::domain::DomainResult;

#[async_trait]
pub trait ExtraFeeRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<ExtraFee>>;

    /// Rules of one condition type for one vehicle type, ascending by id.
    /// The fee engine evaluates them in exactly this order.
    async fn find_by_condition(
        &self,
        condition_type: ConditionType,
        vehicle_type: &str,
    ) -> DomainResult<Vec<ExtraFee>>;

    async fn find_all(&self) -> DomainResult<Vec<ExtraFee>>;

    async fn save(&self, fee: ExtraFee) -> DomainResult<ExtraFee>;

    /// Insert every rule or none of them
    async fn save_all(&self, fees: Vec<ExtraFee>) -> DomainResult<Vec<ExtraFee>>;

    async fn update(&self, fee: ExtraFee) -> DomainResult<ExtraFee>;

    async fn delete(&self, id: i32) -> DomainResult<()>;
}
