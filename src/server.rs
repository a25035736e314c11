//! Reusable delivery fee server runtime.
//!
//! Provides [`ServerHandle`] that encapsulates the full server lifecycle:
//! storage init, migrations, REST API, weather import task, metrics and
//! graceful shutdown.

use std::sync::{Arc, OnceLock};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use tracing::{error, info, warn};

use crate::application::{start_weather_import_task, ImportSummary, WeatherImportService};
use crate::config::AppConfig;
use crate::domain::RepositoryProvider;
use crate::infrastructure::{
    init_database, run_migrations, DatabaseConfig, HttpObservationFeed,
    InMemoryRepositoryProvider, SeaOrmRepositoryProvider,
};
use crate::interfaces::http::modules::health::HealthState;
use crate::interfaces::{create_api_router, AppState};
use crate::shared::errors::InfraError;
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};

// ── Options ────────────────────────────────────────────────────────

/// Options for starting the delivery fee service.
pub struct ServerOptions {
    /// Application configuration.
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
        }
    }
}

/// Repository provider plus the connection behind it, if any.
pub struct Storage {
    pub repos: Arc<dyn RepositoryProvider>,
    pub db: Option<DatabaseConnection>,
}

/// Open the configured store: the seeded in-memory provider, or SQLite
/// with migrations applied when `auto_migrate` is set.
pub async fn open_storage(
    config: &AppConfig,
    auto_migrate: bool,
) -> Result<Storage, Box<dyn std::error::Error>> {
    if config.database.in_memory {
        info!("Using in-memory storage; data is lost on exit");
        let repos = InMemoryRepositoryProvider::seeded().await?;
        return Ok(Storage {
            repos: Arc::new(repos),
            db: None,
        });
    }

    let db_config = DatabaseConfig::from(&config.database);
    let db = init_database(&db_config).await?;
    if auto_migrate {
        run_migrations(&db).await?;
    }

    Ok(Storage {
        repos: Arc::new(SeaOrmRepositoryProvider::new(db.clone())),
        db: Some(db),
    })
}

/// Build the importer for the configured feed.
pub fn build_importer(
    config: &AppConfig,
    repos: Arc<dyn RepositoryProvider>,
) -> Result<WeatherImportService, InfraError> {
    let feed = HttpObservationFeed::new(
        config.weather.api_url.clone(),
        config.weather.request_timeout(),
    )?;
    Ok(WeatherImportService::new(
        repos,
        Arc::new(feed),
        config.weather.import_config(),
    ))
}

/// The global metrics recorder can only be installed once per process;
/// later calls reuse it.
fn prometheus_handle() -> Option<PrometheusHandle> {
    static PROM_HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();

    PROM_HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                info!("📊 Prometheus metrics recorder installed");
                Some(handle)
            }
            Err(e) => {
                warn!(error = %e, "Prometheus recorder unavailable, /metrics disabled");
                None
            }
        })
        .clone()
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running delivery fee service.
///
/// # Examples
///
/// ```rust,no_run
/// use delivery_fee::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     // ... wait for shutdown signal ...
///     handle.shutdown().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    /// Repository provider for data access.
    pub repos: Arc<dyn RepositoryProvider>,
    /// The configuration the server was started with.
    pub config: AppConfig,
    /// Port the REST API is listening on.
    pub port: u16,

    db: Option<DatabaseConnection>,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
    import_task: Option<tokio::task::JoinHandle<()>>,
}

impl ServerHandle {
    /// Start the service with the given options.
    ///
    /// This will:
    /// 1. Install the Prometheus metrics recorder
    /// 2. Open storage (SQLite with migrations, or in-memory)
    /// 3. Start the weather import task (if enabled)
    /// 4. Start the REST API server (with Swagger UI)
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let app_cfg = opts.config;

        info!("Starting delivery fee service...");

        let prometheus = prometheus_handle();

        // ── Storage ────────────────────────────────────────────
        let Storage { repos, db } = open_storage(&app_cfg, opts.auto_migrate).await?;

        // ── Shutdown coordinator ───────────────────────────────
        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let shutdown_signal = shutdown.signal();

        // ── Weather importer ───────────────────────────────────
        let mut state = AppState::new(repos.clone());
        let import_task = if app_cfg.weather.enabled {
            let importer = Arc::new(build_importer(&app_cfg, repos.clone())?);
            state = state.with_importer(importer.clone());
            Some(start_weather_import_task(importer, shutdown_signal.clone()))
        } else {
            info!("Weather import disabled");
            None
        };

        // ── REST API server ────────────────────────────────────
        let health_state = HealthState::new(db.clone(), app_cfg.weather.enabled);
        let api_router = create_api_router(state, health_state, prometheus);

        let api_addr = app_cfg.server.address();
        let listener = tokio::net::TcpListener::bind(&api_addr).await?;
        let port = listener.local_addr()?.port();
        info!("REST API server listening on http://{}", api_addr);
        info!("Swagger UI available at http://{}/docs/", api_addr);

        let api_shutdown = shutdown_signal.clone();
        let api_server = axum::serve(listener, api_router).with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("🛑 REST API server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        info!("🚀 Delivery fee service started.");

        Ok(Self {
            repos,
            config: app_cfg,
            port,
            db,
            shutdown,
            api_task,
            import_task,
        })
    }

    /// Get a cloneable shutdown signal.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    /// Trigger graceful shutdown (non-blocking).
    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for shutdown, then for the server tasks (bounded by
    /// `server.shutdown_timeout`), and close the database last.
    pub async fn wait(self) {
        let Self {
            db,
            shutdown,
            api_task,
            import_task,
            ..
        } = self;

        let completed = shutdown
            .shutdown_with_cleanup(async move {
                match api_task.await {
                    Ok(()) => info!("REST API server stopped"),
                    Err(e) => error!("REST API server task panicked: {}", e),
                }
                if let Some(task) = import_task {
                    if let Err(e) = task.await {
                        error!("Weather import task panicked: {}", e);
                    }
                }
            })
            .await;
        if !completed {
            warn!("Server tasks did not stop in time");
        }

        if let Some(db) = db {
            if let Err(e) = db.close().await {
                warn!("Error closing database connection: {}", e);
            } else {
                info!("✅ Database connection closed");
            }
        }

        info!("👋 Delivery fee service shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("🛑 Shutting down delivery fee service...");
        self.trigger_shutdown();
        self.wait().await;
    }

    /// Check if the API server is still running.
    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

/// Run a single weather import against the configured storage and exit.
pub async fn run_import_once(opts: ServerOptions) -> Result<ImportSummary, Box<dyn std::error::Error>> {
    let Storage { repos, db } = open_storage(&opts.config, opts.auto_migrate).await?;
    let importer = build_importer(&opts.config, repos)?;
    let summary = importer.import_once().await;

    if let Some(db) = db {
        if let Err(e) = db.close().await {
            warn!("Error closing database connection: {}", e);
        }
    }

    Ok(summary?)
}

/// Initialize tracing (logging) from the application config.
///
/// Call this once at process startup (before [`ServerHandle::start`]).
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_memory_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 0;
        config.database.in_memory = true;
        config.weather.enabled = false;
        config
    }

    #[tokio::test]
    async fn in_memory_storage_is_seeded() {
        let storage = open_storage(&in_memory_config(), true).await.unwrap();
        assert!(storage.db.is_none());
        let fee = storage
            .repos
            .base_fees()
            .find_by_city_and_vehicle("Tallinn", "Car")
            .await
            .unwrap();
        assert!(fee.is_some());
    }

    #[tokio::test]
    async fn server_starts_and_shuts_down() {
        let handle = ServerHandle::start(ServerOptions {
            config: in_memory_config(),
            auto_migrate: true,
        })
        .await
        .unwrap();
        assert_ne!(handle.port, 0);
        assert!(handle.is_running());

        tokio::time::timeout(std::time::Duration::from_secs(5), handle.shutdown())
            .await
            .unwrap();
    }
}
