//! Weather observation DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::application::ImportSummary;
use crate::domain::WeatherObservation;

pub const DEFAULT_LIMIT: u64 = 50;
pub const MAX_LIMIT: u64 = 500;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WeatherObservationResponse {
    pub id: i32,
    pub station_name: String,
    pub wmo_code: i32,
    pub air_temperature: Option<Decimal>,
    pub wind_speed: Option<Decimal>,
    pub phenomenon: Option<String>,
    pub observed_at: DateTime<Utc>,
}

impl From<WeatherObservation> for WeatherObservationResponse {
    fn from(o: WeatherObservation) -> Self {
        Self {
            id: o.id,
            station_name: o.station_name,
            wmo_code: o.wmo_code,
            air_temperature: o.air_temperature,
            wind_speed: o.wind_speed,
            phenomenon: o.phenomenon,
            observed_at: o.observed_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecentParams {
    /// Number of observations, newest first (1–500). Default: 50
    pub limit: Option<u64>,
}

impl RecentParams {
    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LatestParams {
    /// City contained in the station name, e.g. `Tartu`
    pub city: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ImportSummaryResponse {
    pub received: usize,
    pub accepted: usize,
    pub stored: usize,
    pub duplicates: usize,
    pub invalid: usize,
}

impl From<ImportSummary> for ImportSummaryResponse {
    fn from(s: ImportSummary) -> Self {
        Self {
            received: s.received,
            accepted: s.accepted,
            stored: s.stored,
            duplicates: s.duplicates,
            invalid: s.invalid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_is_clamped() {
        assert_eq!(RecentParams { limit: None }.limit(), DEFAULT_LIMIT);
        assert_eq!(RecentParams { limit: Some(0) }.limit(), 1);
        assert_eq!(RecentParams { limit: Some(10_000) }.limit(), MAX_LIMIT);
        assert_eq!(RecentParams { limit: Some(7) }.limit(), 7);
    }
}
