//! In-memory repository implementation

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::{
    BaseFee, BaseFeeRepository, ConditionType, DomainError, DomainResult, ExtraFee,
    ExtraFeeRepository, RepositoryProvider, WeatherObservation, WeatherObservationRepository,
};
use crate::infrastructure::seed;

fn lock(mutex: &Mutex<()>) -> MutexGuard<'_, ()> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn sorted_by_id<T, F: Fn(&T) -> i32>(mut items: Vec<T>, id: F) -> Vec<T> {
    items.sort_by_key(|item| id(item));
    items
}

// ── Base fees ──────────────────────────────────────────────────

pub struct InMemoryBaseFeeRepository {
    fees: DashMap<i32, BaseFee>,
    counter: AtomicI32,
    // Serializes uniqueness check + insert
    write_lock: Mutex<()>,
}

impl InMemoryBaseFeeRepository {
    pub fn new() -> Self {
        Self {
            fees: DashMap::new(),
            counter: AtomicI32::new(1),
            write_lock: Mutex::new(()),
        }
    }

    fn pair_taken(&self, city: &str, vehicle_type: &str, except_id: i32) -> bool {
        self.fees
            .iter()
            .any(|e| e.id != except_id && e.is_for(city, vehicle_type))
    }

    fn conflict(fee: &BaseFee) -> DomainError {
        DomainError::Conflict(format!(
            "base fee for city '{}' and vehicle type '{}'",
            fee.city, fee.vehicle_type
        ))
    }

    fn insert(&self, mut fee: BaseFee) -> BaseFee {
        fee.id = self.counter.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        fee.created_at = now;
        fee.updated_at = now;
        self.fees.insert(fee.id, fee.clone());
        fee
    }
}

impl Default for InMemoryBaseFeeRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseFeeRepository for InMemoryBaseFeeRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<BaseFee>> {
        Ok(self.fees.get(&id).map(|f| f.clone()))
    }

    async fn find_by_city_and_vehicle(
        &self,
        city: &str,
        vehicle_type: &str,
    ) -> DomainResult<Option<BaseFee>> {
        Ok(self
            .fees
            .iter()
            .find(|e| e.is_for(city, vehicle_type))
            .map(|e| e.value().clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<BaseFee>> {
        let all = self.fees.iter().map(|e| e.value().clone()).collect();
        Ok(sorted_by_id(all, |f: &BaseFee| f.id))
    }

    async fn save(&self, fee: BaseFee) -> DomainResult<BaseFee> {
        let _guard = lock(&self.write_lock);
        if self.pair_taken(&fee.city, &fee.vehicle_type, 0) {
            return Err(Self::conflict(&fee));
        }
        Ok(self.insert(fee))
    }

    async fn save_all(&self, fees: Vec<BaseFee>) -> DomainResult<Vec<BaseFee>> {
        let _guard = lock(&self.write_lock);
        for (i, fee) in fees.iter().enumerate() {
            let repeated = fees[..i]
                .iter()
                .any(|other| other.is_for(&fee.city, &fee.vehicle_type));
            if repeated || self.pair_taken(&fee.city, &fee.vehicle_type, 0) {
                return Err(Self::conflict(fee));
            }
        }
        Ok(fees.into_iter().map(|fee| self.insert(fee)).collect())
    }

    async fn update(&self, mut fee: BaseFee) -> DomainResult<BaseFee> {
        let _guard = lock(&self.write_lock);
        let created_at = self
            .fees
            .get(&fee.id)
            .map(|existing| existing.created_at)
            .ok_or_else(|| DomainError::not_found("BaseFee", fee.id))?;
        if self.pair_taken(&fee.city, &fee.vehicle_type, fee.id) {
            return Err(Self::conflict(&fee));
        }
        fee.created_at = created_at;
        fee.updated_at = Utc::now();
        self.fees.insert(fee.id, fee.clone());
        Ok(fee)
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        self.fees
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("BaseFee", id))?;
        Ok(())
    }
}

// ── Extra fees ─────────────────────────────────────────────────

pub struct InMemoryExtraFeeRepository {
    fees: DashMap<i32, ExtraFee>,
    counter: AtomicI32,
}

impl InMemoryExtraFeeRepository {
    pub fn new() -> Self {
        Self {
            fees: DashMap::new(),
            counter: AtomicI32::new(1),
        }
    }

    fn insert(&self, mut fee: ExtraFee) -> ExtraFee {
        fee.id = self.counter.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        fee.created_at = now;
        fee.updated_at = now;
        self.fees.insert(fee.id, fee.clone());
        fee
    }
}

impl Default for InMemoryExtraFeeRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExtraFeeRepository for InMemoryExtraFeeRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<ExtraFee>> {
        Ok(self.fees.get(&id).map(|f| f.clone()))
    }

    async fn find_by_condition(
        &self,
        condition_type: ConditionType,
        vehicle_type: &str,
    ) -> DomainResult<Vec<ExtraFee>> {
        let matching = self
            .fees
            .iter()
            .filter(|e| e.condition_type() == condition_type && e.vehicle_type == vehicle_type)
            .map(|e| e.value().clone())
            .collect();
        Ok(sorted_by_id(matching, |f: &ExtraFee| f.id))
    }

    async fn find_all(&self) -> DomainResult<Vec<ExtraFee>> {
        let all = self.fees.iter().map(|e| e.value().clone()).collect();
        Ok(sorted_by_id(all, |f: &ExtraFee| f.id))
    }

    async fn save(&self, fee: ExtraFee) -> DomainResult<ExtraFee> {
        Ok(self.insert(fee))
    }

    async fn save_all(&self, fees: Vec<ExtraFee>) -> DomainResult<Vec<ExtraFee>> {
        // Rules are validated on construction; nothing here can fail halfway
        Ok(fees.into_iter().map(|fee| self.insert(fee)).collect())
    }

    async fn update(&self, mut fee: ExtraFee) -> DomainResult<ExtraFee> {
        let mut entry = self
            .fees
            .get_mut(&fee.id)
            .ok_or_else(|| DomainError::not_found("ExtraFee", fee.id))?;
        fee.created_at = entry.created_at;
        fee.updated_at = Utc::now();
        *entry = fee.clone();
        Ok(fee)
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        self.fees
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("ExtraFee", id))?;
        Ok(())
    }
}

// ── Weather observations ───────────────────────────────────────

pub struct InMemoryWeatherRepository {
    observations: DashMap<(i32, DateTime<Utc>), WeatherObservation>,
    counter: AtomicI32,
}

impl InMemoryWeatherRepository {
    pub fn new() -> Self {
        Self {
            observations: DashMap::new(),
            counter: AtomicI32::new(1),
        }
    }
}

impl Default for InMemoryWeatherRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WeatherObservationRepository for InMemoryWeatherRepository {
    async fn find_latest_for_city(&self, city: &str) -> DomainResult<Option<WeatherObservation>> {
        Ok(self
            .observations
            .iter()
            .filter(|e| e.is_for_city(city))
            .max_by_key(|e| (e.observed_at, e.id))
            .map(|e| e.value().clone()))
    }

    async fn exists(&self, wmo_code: i32, observed_at: DateTime<Utc>) -> DomainResult<bool> {
        Ok(self.observations.contains_key(&(wmo_code, observed_at)))
    }

    async fn save(&self, mut observation: WeatherObservation) -> DomainResult<WeatherObservation> {
        let key = (observation.wmo_code, observation.observed_at);
        match self.observations.entry(key) {
            Entry::Occupied(_) => Err(DomainError::Conflict(format!(
                "weather observation for WMO code {} at {}",
                observation.wmo_code, observation.observed_at
            ))),
            Entry::Vacant(slot) => {
                observation.id = self.counter.fetch_add(1, Ordering::SeqCst);
                slot.insert(observation.clone());
                Ok(observation)
            }
        }
    }

    async fn find_recent(&self, limit: u64) -> DomainResult<Vec<WeatherObservation>> {
        let mut all: Vec<WeatherObservation> =
            self.observations.iter().map(|e| e.value().clone()).collect();
        all.sort_by(|a, b| (b.observed_at, b.id).cmp(&(a.observed_at, a.id)));
        all.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(all)
    }
}

// ── Provider ───────────────────────────────────────────────────

/// In-memory repositories for development and testing
pub struct InMemoryRepositoryProvider {
    base_fees: InMemoryBaseFeeRepository,
    extra_fees: InMemoryExtraFeeRepository,
    weather: InMemoryWeatherRepository,
}

impl InMemoryRepositoryProvider {
    /// Empty stores
    pub fn new() -> Self {
        Self {
            base_fees: InMemoryBaseFeeRepository::new(),
            extra_fees: InMemoryExtraFeeRepository::new(),
            weather: InMemoryWeatherRepository::new(),
        }
    }

    /// Stores pre-filled with the default fee rules
    pub async fn seeded() -> DomainResult<Self> {
        let provider = Self::new();
        provider
            .base_fees
            .save_all(seed::default_base_fees()?)
            .await?;
        provider
            .extra_fees
            .save_all(seed::default_extra_fees()?)
            .await?;
        Ok(provider)
    }
}

impl Default for InMemoryRepositoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
    fn base_fees(&self) -> &dyn BaseFeeRepository {
        &self.base_fees
    }

    fn extra_fees(&self) -> &dyn ExtraFeeRepository {
        &self.extra_fees
    }

    fn weather(&self) -> &dyn WeatherObservationRepository {
        &self.weather
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FeeCondition, ValueRange};
    use chrono::Duration;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn duplicate_base_fee_pair_conflicts() {
        let repo = InMemoryBaseFeeRepository::new();
        repo.save(BaseFee::new("Tallinn", "Car", dec!(4)).unwrap())
            .await
            .unwrap();
        let err = repo
            .save(BaseFee::new("Tallinn", "Car", dec!(5)).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_weather_saves_keep_exactly_one() {
        let repo = std::sync::Arc::new(InMemoryWeatherRepository::new());
        let at = Utc::now();

        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.save(
                        WeatherObservation::new("Pärnu", 41803, at)
                            .with_air_temperature(rust_decimal::Decimal::from(i)),
                    )
                    .await
                })
            })
            .collect();

        let mut stored = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => stored += 1,
                Err(e) => assert!(matches!(e, DomainError::Conflict(_))),
            }
        }
        assert_eq!(stored, 1);
        assert_eq!(repo.find_recent(10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn batch_with_conflict_inserts_nothing() {
        let repo = InMemoryBaseFeeRepository::new();
        let batch = vec![
            BaseFee::new("Tartu", "Car", dec!(3.5)).unwrap(),
            BaseFee::new("Tartu", "Bike", dec!(2.5)).unwrap(),
            BaseFee::new("Tartu", "Car", dec!(9)).unwrap(),
        ];
        assert!(repo.save_all(batch).await.is_err());
        assert!(repo.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_and_delete_missing_ids_are_not_found() {
        let repo = InMemoryBaseFeeRepository::new();
        let mut fee = BaseFee::new("Pärnu", "Car", dec!(3)).unwrap();
        fee.id = 42;
        assert!(matches!(
            repo.update(fee).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
        assert!(matches!(
            repo.delete(42).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn update_keeps_own_pair_and_creation_time() {
        let repo = InMemoryBaseFeeRepository::new();
        let saved = repo
            .save(BaseFee::new("Tallinn", "Bike", dec!(3)).unwrap())
            .await
            .unwrap();
        let mut changed = saved.clone();
        changed.fee = dec!(3.25);
        let updated = repo.update(changed).await.unwrap();
        assert_eq!(updated.fee, dec!(3.25));
        assert_eq!(updated.created_at, saved.created_at);
    }

    #[tokio::test]
    async fn extra_fees_come_back_in_insertion_order() {
        let repo = InMemoryExtraFeeRepository::new();
        for (min, max, fee) in [(dec!(-10), dec!(0), dec!(0.5)), (dec!(-20), dec!(-5), dec!(1))] {
            let range = ValueRange::new(Some(min), Some(max)).unwrap();
            repo.save(ExtraFee::new("Scooter", fee, FeeCondition::AirTemperature(range)).unwrap())
                .await
                .unwrap();
        }
        let rules = repo
            .find_by_condition(ConditionType::AirTemperature, "Scooter")
            .await
            .unwrap();
        assert_eq!(rules.len(), 2);
        assert!(rules[0].id < rules[1].id);
        assert_eq!(rules[0].fee, dec!(0.5));
        assert!(repo
            .find_by_condition(ConditionType::WindSpeed, "Scooter")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn latest_observation_is_newest_for_city() {
        let repo = InMemoryWeatherRepository::new();
        let now = Utc::now();
        repo.save(WeatherObservation::new("Tallinn-Harku", 26038, now - Duration::hours(1)))
            .await
            .unwrap();
        repo.save(WeatherObservation::new("Tallinn-Harku", 26038, now).with_phenomenon("Snow"))
            .await
            .unwrap();
        repo.save(WeatherObservation::new("Tartu-Tõravere", 26242, now + Duration::hours(1)))
            .await
            .unwrap();

        let latest = repo.find_latest_for_city("tallinn").await.unwrap().unwrap();
        assert_eq!(latest.observed_at, now);
        assert_eq!(latest.phenomenon.as_deref(), Some("Snow"));
        assert!(repo.exists(26038, now).await.unwrap());
        assert!(!repo.exists(41803, now).await.unwrap());
        assert!(repo.find_latest_for_city("Pärnu").await.unwrap().is_none());

        let recent = repo.find_recent(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].wmo_code, 26242);
    }

    #[tokio::test]
    async fn seeded_provider_has_default_rules() {
        let provider = InMemoryRepositoryProvider::seeded().await.unwrap();
        let fee = provider
            .base_fees()
            .find_by_city_and_vehicle("Tallinn", "Car")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fee.fee, dec!(4));
        assert!(!provider.extra_fees().find_all().await.unwrap().is_empty());
    }
}
