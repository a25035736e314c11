//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider` — unified access to all per-aggregate repositories
//! - `DomainResult` — standard result type for domain operations

use super::base_fee::BaseFeeRepository;
use super::extra_fee::ExtraFeeRepository;
use super::weather::WeatherObservationRepository;

pub use crate::shared::errors::DomainResult;

// ── RepositoryProvider ──────────────────────────────────────────

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn price(repos: &dyn RepositoryProvider) {
///     let base = repos.base_fees().find_by_city_and_vehicle("Tallinn", "Car").await?;
///     let weather = repos.weather().find_latest_for_city("Tallinn").await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn base_fees(&self) -> &dyn BaseFeeRepository;
    fn extra_fees(&self) -> &dyn ExtraFeeRepository;
    fn weather(&self) -> &dyn WeatherObservationRepository;
}
