//! Weather observation repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::WeatherObservation;
use crate::domain::DomainResult;

#[async_trait]
pub trait WeatherObservationRepository: Send + Sync {
    /// Newest observation whose station name contains `city`
    /// (case-insensitive).
    async fn find_latest_for_city(&self, city: &str) -> DomainResult<Option<WeatherObservation>>;

    /// Whether an observation with this (WMO code, time) key is stored
    async fn exists(&self, wmo_code: i32, observed_at: DateTime<Utc>) -> DomainResult<bool>;

    async fn save(&self, observation: WeatherObservation) -> DomainResult<WeatherObservation>;

    /// Most recent observations first
    async fn find_recent(&self, limit: u64) -> DomainResult<Vec<WeatherObservation>>;
}
