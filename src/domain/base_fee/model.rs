//! Base fee domain entity

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::shared::errors::{DomainError, DomainResult};

/// Flat delivery charge for one (city, vehicle type) pair
#[derive(Debug, Clone, PartialEq)]
pub struct BaseFee {
    pub id: i32,
    pub city: String,
    pub vehicle_type: String,
    pub fee: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BaseFee {
    /// Build a not-yet-persisted base fee (`id == 0`).
    pub fn new(
        city: impl Into<String>,
        vehicle_type: impl Into<String>,
        fee: Decimal,
    ) -> DomainResult<Self> {
        let city = city.into().trim().to_string();
        let vehicle_type = vehicle_type.into().trim().to_string();

        if city.is_empty() || vehicle_type.is_empty() {
            return Err(DomainError::Validation(
                "city and vehicle_type must not be empty".to_string(),
            ));
        }
        if fee < Decimal::ZERO {
            return Err(DomainError::Validation(format!(
                "base fee must not be negative, got {}",
                fee
            )));
        }

        let now = Utc::now();
        Ok(Self {
            id: 0,
            city,
            vehicle_type,
            fee,
            created_at: now,
            updated_at: now,
        })
    }

    /// Whether this record prices the given pair
    pub fn is_for(&self, city: &str, vehicle_type: &str) -> bool {
        self.city == city && self.vehicle_type == vehicle_type
    }
}
