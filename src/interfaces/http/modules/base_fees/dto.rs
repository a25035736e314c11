//! Base fee DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{BaseFee, DomainResult};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BaseFeeResponse {
    pub id: i32,
    pub city: String,
    pub vehicle_type: String,
    pub fee: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BaseFee> for BaseFeeResponse {
    fn from(f: BaseFee) -> Self {
        Self {
            id: f.id,
            city: f.city,
            vehicle_type: f.vehicle_type,
            fee: f.fee,
            created_at: f.created_at,
            updated_at: f.updated_at,
        }
    }
}

/// Body of create and update; an update replaces all three fields
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct BaseFeeRequest {
    #[validate(length(min = 1, max = 100, message = "city is required"))]
    pub city: String,
    #[validate(length(min = 1, max = 50, message = "vehicle_type is required"))]
    pub vehicle_type: String,
    /// Non-negative amount in euros
    pub fee: Decimal,
}

impl BaseFeeRequest {
    pub fn into_domain(self) -> DomainResult<BaseFee> {
        BaseFee::new(self.city, self.vehicle_type, self.fee)
    }
}

/// JSON array of base fees, stored all or nothing
#[derive(Debug, Deserialize, Validate)]
#[serde(transparent)]
pub struct BaseFeeBatchRequest {
    #[validate(length(min = 1, message = "batch must not be empty"), nested)]
    pub items: Vec<BaseFeeRequest>,
}
