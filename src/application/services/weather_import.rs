//! Weather observation import
//!
//! Pulls a feed snapshot, keeps the configured stations, drops readings
//! that cannot be keyed, and stores observations not seen before. The
//! (WMO code, observation time) key makes repeated imports idempotent.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::application::ports::ObservationFeed;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::shutdown::ShutdownSignal;

/// Importer settings
#[derive(Debug, Clone)]
pub struct WeatherImportConfig {
    /// Station names to keep, compared after trimming
    pub target_stations: Vec<String>,
    pub interval: Duration,
    /// Run one import before the first interval elapses
    pub import_on_startup: bool,
}

impl Default for WeatherImportConfig {
    fn default() -> Self {
        Self {
            target_stations: vec![
                "Tallinn-Harku".to_string(),
                "Tartu-Tõravere".to_string(),
                "Pärnu".to_string(),
            ],
            interval: Duration::from_secs(3600),
            import_on_startup: true,
        }
    }
}

/// Counts of one import run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Stations in the feed
    pub received: usize,
    /// Target stations with a usable WMO code
    pub accepted: usize,
    pub stored: usize,
    /// Already stored under the same (WMO code, time) key
    pub duplicates: usize,
    /// Target stations dropped for a missing or malformed WMO code
    pub invalid: usize,
}

pub struct WeatherImportService {
    repos: Arc<dyn RepositoryProvider>,
    feed: Arc<dyn ObservationFeed>,
    targets: HashSet<String>,
    config: WeatherImportConfig,
}

impl WeatherImportService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        feed: Arc<dyn ObservationFeed>,
        config: WeatherImportConfig,
    ) -> Self {
        let targets = config
            .target_stations
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        Self {
            repos,
            feed,
            targets,
            config,
        }
    }

    pub fn config(&self) -> &WeatherImportConfig {
        &self.config
    }

    pub async fn import_once(&self) -> DomainResult<ImportSummary> {
        let fetched_at = Utc::now();
        let snapshot = self.feed.fetch().await?;
        let observed_at = snapshot.timestamp.unwrap_or(fetched_at);

        let mut summary = ImportSummary {
            received: snapshot.stations.len(),
            ..Default::default()
        };

        for reading in snapshot.stations {
            if !self.targets.contains(reading.name.trim()) {
                continue;
            }

            let name = reading.name.clone();
            let Some(observation) = reading.into_observation(observed_at) else {
                warn!(station = name.as_str(), "Dropping station reading without WMO code");
                summary.invalid += 1;
                continue;
            };
            summary.accepted += 1;

            let weather = self.repos.weather();
            if weather
                .exists(observation.wmo_code, observation.observed_at)
                .await?
            {
                debug!(
                    station = name.as_str(),
                    wmo_code = observation.wmo_code,
                    "Observation already stored"
                );
                summary.duplicates += 1;
                continue;
            }

            let (wmo_code, observed_at) = (observation.wmo_code, observation.observed_at);
            match weather.save(observation).await {
                Ok(_) => summary.stored += 1,
                // Stored by a concurrent import since the check above
                Err(DomainError::Conflict(_)) => {
                    debug!(
                        station = name.as_str(),
                        wmo_code,
                        observed_at = %observed_at,
                        "Observation stored concurrently"
                    );
                    summary.duplicates += 1;
                }
                Err(e) => return Err(e),
            }
        }

        metrics::counter!("weather_observations_stored_total").increment(summary.stored as u64);
        info!(
            received = summary.received,
            accepted = summary.accepted,
            stored = summary.stored,
            duplicates = summary.duplicates,
            invalid = summary.invalid,
            observed_at = %observed_at,
            "Weather import finished"
        );

        Ok(summary)
    }
}

/// Start the periodic weather import background task.
///
/// Runs `import_once` every `config.interval` until shutdown. Failed runs
/// are logged and retried on the next tick.
pub fn start_weather_import_task(
    service: Arc<WeatherImportService>,
    shutdown: ShutdownSignal,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let period = service.config().interval;
        info!(
            interval_secs = period.as_secs(),
            stations = service.targets.len(),
            "🌦 Weather import task started"
        );

        let mut interval = if service.config().import_on_startup {
            tokio::time::interval(period)
        } else {
            tokio::time::interval_at(tokio::time::Instant::now() + period, period)
        };
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = service.import_once().await {
                        metrics::counter!("weather_import_failures_total").increment(1);
                        warn!(error = %e, "Weather import failed");
                    }
                }
                _ = shutdown.wait() => {
                    info!("🌦 Weather import task shutting down");
                    break;
                }
            }
        }

        info!("🌦 Weather import task stopped");
    })
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FeedSnapshot, StationReading, WeatherObservation, WeatherObservationRepository};
    use crate::infrastructure::storage::InMemoryRepositoryProvider;
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone};
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeFeed {
        snapshot: FeedSnapshot,
        calls: AtomicUsize,
    }

    impl FakeFeed {
        fn new(snapshot: FeedSnapshot) -> Self {
            Self {
                snapshot,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ObservationFeed for FakeFeed {
        async fn fetch(&self) -> DomainResult<FeedSnapshot> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.snapshot.clone())
        }
    }

    struct DownFeed;

    #[async_trait]
    impl ObservationFeed for DownFeed {
        async fn fetch(&self) -> DomainResult<FeedSnapshot> {
            Err(DomainError::Upstream("connection refused".into()))
        }
    }

    fn reading(name: &str, wmo_code: Option<i32>) -> StationReading {
        StationReading {
            name: name.to_string(),
            wmo_code,
            air_temperature: Some(dec!(-2.5)),
            wind_speed: Some(dec!(4.1)),
            phenomenon: Some("Light snow shower".to_string()),
        }
    }

    fn feed_time() -> DateTime<Utc> {
        Utc.timestamp_opt(1_710_000_000, 0).unwrap()
    }

    fn snapshot() -> FeedSnapshot {
        FeedSnapshot {
            timestamp: Some(feed_time()),
            stations: vec![
                reading("Tallinn-Harku", Some(26038)),
                reading("Tartu-Tõravere", Some(26242)),
                reading("Pärnu", None),
                reading("Kuressaare", Some(26231)),
            ],
        }
    }

    /// Answers `exists` with false, as if another importer committed the
    /// same observation right after the check.
    struct StaleExistsProvider {
        inner: Arc<InMemoryRepositoryProvider>,
        weather: StaleExistsWeather,
    }

    struct StaleExistsWeather(Arc<InMemoryRepositoryProvider>);

    #[async_trait]
    impl WeatherObservationRepository for StaleExistsWeather {
        async fn find_latest_for_city(
            &self,
            city: &str,
        ) -> DomainResult<Option<WeatherObservation>> {
            self.0.weather().find_latest_for_city(city).await
        }

        async fn exists(&self, _wmo_code: i32, _observed_at: DateTime<Utc>) -> DomainResult<bool> {
            Ok(false)
        }

        async fn save(&self, observation: WeatherObservation) -> DomainResult<WeatherObservation> {
            self.0.weather().save(observation).await
        }

        async fn find_recent(&self, limit: u64) -> DomainResult<Vec<WeatherObservation>> {
            self.0.weather().find_recent(limit).await
        }
    }

    impl RepositoryProvider for StaleExistsProvider {
        fn base_fees(&self) -> &dyn crate::domain::BaseFeeRepository {
            self.inner.base_fees()
        }

        fn extra_fees(&self) -> &dyn crate::domain::ExtraFeeRepository {
            self.inner.extra_fees()
        }

        fn weather(&self) -> &dyn WeatherObservationRepository {
            &self.weather
        }
    }

    fn service(
        repos: Arc<InMemoryRepositoryProvider>,
        feed: Arc<dyn ObservationFeed>,
    ) -> WeatherImportService {
        WeatherImportService::new(repos, feed, WeatherImportConfig::default())
    }

    #[tokio::test]
    async fn import_keeps_only_valid_target_stations() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let svc = service(repos.clone(), Arc::new(FakeFeed::new(snapshot())));

        let summary = svc.import_once().await.unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                received: 4,
                accepted: 2,
                stored: 2,
                duplicates: 0,
                invalid: 1,
            }
        );

        let latest = repos
            .weather()
            .find_latest_for_city("Tallinn")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.observed_at, feed_time());
        assert_eq!(latest.air_temperature, Some(dec!(-2.5)));
        assert!(repos.weather().find_latest_for_city("Kuressaare").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn repeated_import_stores_nothing_new() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let svc = service(repos.clone(), Arc::new(FakeFeed::new(snapshot())));

        svc.import_once().await.unwrap();
        let second = svc.import_once().await.unwrap();
        assert_eq!(second.stored, 0);
        assert_eq!(second.duplicates, 2);
        assert_eq!(repos.weather().find_recent(10).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn conflicting_save_counts_as_duplicate_and_import_continues() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        repos
            .weather()
            .save(WeatherObservation::new("Tallinn-Harku", 26038, feed_time()))
            .await
            .unwrap();

        let stale = Arc::new(StaleExistsProvider {
            inner: repos.clone(),
            weather: StaleExistsWeather(repos.clone()),
        });
        let svc = WeatherImportService::new(
            stale,
            Arc::new(FakeFeed::new(snapshot())),
            WeatherImportConfig::default(),
        );

        let summary = svc.import_once().await.unwrap();
        assert_eq!(summary.stored, 1);
        assert_eq!(summary.duplicates, 1);
        assert!(repos
            .weather()
            .find_latest_for_city("Tartu")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn overlapping_imports_both_succeed() {
        for _ in 0..20 {
            let repos = Arc::new(InMemoryRepositoryProvider::new());
            let feed: Arc<dyn ObservationFeed> = Arc::new(FakeFeed::new(snapshot()));
            let first = Arc::new(service(repos.clone(), feed.clone()));
            let second = Arc::new(service(repos.clone(), feed));

            let (a, b) = tokio::join!(
                tokio::spawn({
                    let svc = first.clone();
                    async move { svc.import_once().await }
                }),
                tokio::spawn({
                    let svc = second.clone();
                    async move { svc.import_once().await }
                }),
            );
            let (a, b) = (a.unwrap().unwrap(), b.unwrap().unwrap());

            assert_eq!(a.stored + b.stored, 2);
            assert_eq!(a.duplicates + b.duplicates, 2);
            assert_eq!(repos.weather().find_recent(10).await.unwrap().len(), 2);
        }
    }

    #[tokio::test]
    async fn missing_feed_timestamp_uses_fetch_time() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let mut snap = snapshot();
        snap.timestamp = None;
        let before = Utc::now();
        let svc = service(repos.clone(), Arc::new(FakeFeed::new(snap)));

        svc.import_once().await.unwrap();
        let latest = repos
            .weather()
            .find_latest_for_city("Tartu")
            .await
            .unwrap()
            .unwrap();
        assert!(latest.observed_at >= before);
    }

    #[tokio::test]
    async fn feed_failure_is_propagated() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let svc = service(repos, Arc::new(DownFeed));
        assert!(matches!(
            svc.import_once().await.unwrap_err(),
            DomainError::Upstream(_)
        ));
    }

    #[tokio::test]
    async fn task_imports_on_startup_and_stops_on_shutdown() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let feed = Arc::new(FakeFeed::new(snapshot()));
        let svc = Arc::new(service(repos, feed.clone()));
        let shutdown = ShutdownSignal::new();

        let handle = start_weather_import_task(svc, shutdown.clone());
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(feed.calls.load(Ordering::SeqCst), 1);

        shutdown.trigger();
        handle.await.unwrap();
    }
}
