//! Delivery fee request and result types

use rust_decimal::{Decimal, RoundingStrategy};

use crate::shared::errors::{DomainError, DomainResult};

/// Validated input of a fee calculation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryFeeRequest {
    city: String,
    vehicle_type: String,
}

impl DeliveryFeeRequest {
    pub fn new(city: impl Into<String>, vehicle_type: impl Into<String>) -> DomainResult<Self> {
        let city = city.into().trim().to_string();
        let vehicle_type = vehicle_type.into().trim().to_string();

        if city.is_empty() {
            return Err(DomainError::InvalidRequest(
                "city must not be empty".to_string(),
            ));
        }
        if vehicle_type.is_empty() {
            return Err(DomainError::InvalidRequest(
                "vehicle_type must not be empty".to_string(),
            ));
        }

        Ok(Self { city, vehicle_type })
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn vehicle_type(&self) -> &str {
        &self.vehicle_type
    }
}

/// Components of a calculated fee
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeeBreakdown {
    pub base_fee: Decimal,
    pub air_temperature_fee: Decimal,
    pub wind_speed_fee: Decimal,
    pub phenomenon_fee: Decimal,
}

impl FeeBreakdown {
    pub fn base(base_fee: Decimal) -> Self {
        Self {
            base_fee,
            ..Default::default()
        }
    }

    pub fn extra_total(&self) -> Decimal {
        self.air_temperature_fee + self.wind_speed_fee + self.phenomenon_fee
    }

    pub fn total(&self) -> Decimal {
        self.base_fee + self.extra_total()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryFeeResult {
    pub message: String,
    pub total_fee: Decimal,
    pub breakdown: FeeBreakdown,
}

impl DeliveryFeeResult {
    pub fn from_breakdown(breakdown: FeeBreakdown) -> Self {
        let total_fee = breakdown.total();
        let rounded = total_fee.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        Self {
            message: format!("Total delivery fee: {:.2}", rounded),
            total_fee,
            breakdown,
        }
    }
}
