//! Weather observation domain entities

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// One stored measurement of a weather station
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherObservation {
    pub id: i32,
    pub station_name: String,
    pub wmo_code: i32,
    pub air_temperature: Option<Decimal>,
    pub wind_speed: Option<Decimal>,
    pub phenomenon: Option<String>,
    pub observed_at: DateTime<Utc>,
}

impl WeatherObservation {
    pub fn new(
        station_name: impl Into<String>,
        wmo_code: i32,
        observed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: 0,
            station_name: station_name.into(),
            wmo_code,
            air_temperature: None,
            wind_speed: None,
            phenomenon: None,
            observed_at,
        }
    }

    pub fn with_air_temperature(mut self, value: Decimal) -> Self {
        self.air_temperature = Some(value);
        self
    }

    pub fn with_wind_speed(mut self, value: Decimal) -> Self {
        self.wind_speed = Some(value);
        self
    }

    pub fn with_phenomenon(mut self, value: impl Into<String>) -> Self {
        self.phenomenon = Some(value.into());
        self
    }

    /// Station names embed the city ("Tallinn-Harku", "Pärnu").
    pub fn is_for_city(&self, city: &str) -> bool {
        let city = city.trim().to_lowercase();
        !city.is_empty() && self.station_name.to_lowercase().contains(&city)
    }
}

/// Station record as read from the observation feed, before validation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationReading {
    pub name: String,
    /// `None` when the feed left it blank or it was not an integer
    pub wmo_code: Option<i32>,
    pub air_temperature: Option<Decimal>,
    pub wind_speed: Option<Decimal>,
    pub phenomenon: Option<String>,
}

impl StationReading {
    /// Convert into a storable observation; readings without a WMO code
    /// cannot be keyed and yield `None`.
    pub fn into_observation(self, observed_at: DateTime<Utc>) -> Option<WeatherObservation> {
        let wmo_code = self.wmo_code?;
        Some(WeatherObservation {
            id: 0,
            station_name: self.name,
            wmo_code,
            air_temperature: self.air_temperature,
            wind_speed: self.wind_speed,
            phenomenon: self.phenomenon,
            observed_at,
        })
    }
}

/// One fetch of the observation feed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedSnapshot {
    /// Measurement time announced by the feed, if any
    pub timestamp: Option<DateTime<Utc>>,
    pub stations: Vec<StationReading>,
}
