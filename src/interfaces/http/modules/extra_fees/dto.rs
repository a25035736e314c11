//! Extra fee DTOs
//!
//! Rules travel in their flat form; the domain rebuilds the typed
//! condition and rejects shapes it cannot represent.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{ConditionType, DomainResult, ExtraFee, FeeCondition};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ExtraFeeResponse {
    pub id: i32,
    /// `AIR_TEMPERATURE`, `WIND_SPEED` or `WEATHER_PHENOMENON`
    pub condition_type: String,
    pub vehicle_type: String,
    pub fee: Decimal,
    pub min_value: Option<Decimal>,
    pub max_value: Option<Decimal>,
    pub weather_phenomenon: Option<String>,
    pub is_forbidden: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ExtraFee> for ExtraFeeResponse {
    fn from(f: ExtraFee) -> Self {
        Self {
            id: f.id,
            condition_type: f.condition_type().to_string(),
            vehicle_type: f.vehicle_type,
            fee: f.fee,
            min_value: f.condition.min_value(),
            max_value: f.condition.max_value(),
            weather_phenomenon: f.condition.phenomenon().map(str::to_string),
            is_forbidden: f.condition.is_forbidden(),
            created_at: f.created_at,
            updated_at: f.updated_at,
        }
    }
}

/// Body of create and update; an update replaces every field
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct ExtraFeeRequest {
    #[validate(length(min = 1, message = "condition_type is required"))]
    pub condition_type: String,
    #[validate(length(min = 1, max = 50, message = "vehicle_type is required"))]
    pub vehicle_type: String,
    pub fee: Decimal,
    /// Exclusive lower bound; absent means unbounded
    pub min_value: Option<Decimal>,
    /// Exclusive upper bound; absent means unbounded
    pub max_value: Option<Decimal>,
    #[validate(length(max = 100))]
    pub weather_phenomenon: Option<String>,
    /// Only valid for `WEATHER_PHENOMENON` rules
    #[serde(default)]
    pub is_forbidden: bool,
}

impl ExtraFeeRequest {
    pub fn into_domain(self) -> DomainResult<ExtraFee> {
        let condition_type: ConditionType = self.condition_type.parse()?;
        let condition = FeeCondition::from_columns(
            condition_type,
            self.min_value,
            self.max_value,
            self.weather_phenomenon,
            self.is_forbidden,
        )?;
        ExtraFee::new(self.vehicle_type, self.fee, condition)
    }
}

/// JSON array of extra fees, stored all or nothing
#[derive(Debug, Deserialize, Validate)]
#[serde(transparent)]
pub struct ExtraFeeBatchRequest {
    #[validate(length(min = 1, message = "batch must not be empty"), nested)]
    pub items: Vec<ExtraFeeRequest>,
}
