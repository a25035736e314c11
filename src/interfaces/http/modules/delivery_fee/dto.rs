//! Delivery fee DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{DeliveryFeeResult, FeeBreakdown};

/// Fee calculation input
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DeliveryFeeRequestDto {
    /// City of delivery, e.g. `Tallinn`
    #[validate(length(min = 1, max = 100, message = "city is required"))]
    pub city: String,
    /// `Car`, `Scooter` or `Bike`
    #[validate(length(min = 1, max = 50, message = "vehicle_type is required"))]
    pub vehicle_type: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FeeBreakdownDto {
    pub base_fee: Decimal,
    pub air_temperature_fee: Decimal,
    pub wind_speed_fee: Decimal,
    pub phenomenon_fee: Decimal,
}

impl From<FeeBreakdown> for FeeBreakdownDto {
    fn from(b: FeeBreakdown) -> Self {
        Self {
            base_fee: b.base_fee,
            air_temperature_fee: b.air_temperature_fee,
            wind_speed_fee: b.wind_speed_fee,
            phenomenon_fee: b.phenomenon_fee,
        }
    }
}

/// Calculated delivery fee
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeliveryFeeResponse {
    /// e.g. `Total delivery fee: 4.00`
    pub message: String,
    pub total_fee: Decimal,
    pub breakdown: FeeBreakdownDto,
}

impl From<DeliveryFeeResult> for DeliveryFeeResponse {
    fn from(r: DeliveryFeeResult) -> Self {
        Self {
            message: r.message,
            total_fee: r.total_fee,
            breakdown: r.breakdown.into(),
        }
    }
}
