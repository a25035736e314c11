//! Delivery fee service CLI server
//!
//! ```sh
//! # Run with default config (~/.config/delivery-fee/config.toml)
//! delivery-fee-service
//!
//! # Custom config path and port
//! delivery-fee-service --config /etc/delivery-fee/config.toml --port 9090
//!
//! # Validate config without starting
//! delivery-fee-service --check
//!
//! # Fetch and store the current weather observations once, then exit
//! delivery-fee-service --import-once
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use delivery_fee::config::{AppConfig, CONFIG_ENV};
use delivery_fee::server::{init_tracing, run_import_once, ServerHandle, ServerOptions};

/// Food delivery fee calculator with weather-based surcharges.
#[derive(Parser, Debug)]
#[command(
    name = "delivery-fee-service",
    version,
    about = "Delivery fee REST service with periodic weather import",
    long_about = "Calculates courier delivery fees from regional base fees and the latest \
                  weather station observations.\n\n\
                  Default config: ~/.config/delivery-fee/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Keep all data in memory instead of the configured database.
    #[arg(long)]
    in_memory: bool,

    /// Run one weather import and exit.
    #[arg(long, conflicts_with = "check")]
    import_once: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.unwrap_or_else(delivery_fee::default_config_path);

    let loaded = AppConfig::load(&config_path);
    if cli.check {
        // Report instead of falling back to defaults
        let mut config = loaded?;
        apply_overrides(&mut config, cli.port, cli.log_level.clone(), cli.in_memory);
        config.validate()?;
        println!("✅ Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   API address : {}", config.server.address());
        if config.database.in_memory {
            println!("   Database    : in-memory");
        } else {
            println!("   Database    : {}", config.database.connection_url());
        }
        println!("   Log level   : {}", config.logging.level);
        println!(
            "   Weather     : {} every {}s ({} stations)",
            if config.weather.enabled { "enabled" } else { "disabled" },
            config.weather.import_interval_secs,
            config.weather.target_stations.len()
        );
        return Ok(());
    }

    let mut config = match loaded {
        Ok(mut cfg) => {
            apply_overrides(&mut cfg, None, cli.log_level.clone(), false);
            // Init tracing first so subsequent logs are formatted properly
            init_tracing(&cfg);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            let mut cfg = AppConfig::default();
            apply_overrides(&mut cfg, None, cli.log_level.clone(), false);
            init_tracing(&cfg);
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
            cfg
        }
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(port) = cli.port {
        info!("CLI override: port = {}", port);
    }
    if cli.in_memory {
        info!("CLI override: in-memory storage");
    }
    apply_overrides(&mut config, cli.port, None, cli.in_memory);

    let opts = ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    };

    // ── One-shot import ────────────────────────────────────────
    if cli.import_once {
        let summary = run_import_once(opts).await?;
        println!(
            "Imported weather observations: received={} accepted={} stored={} duplicates={} invalid={}",
            summary.received, summary.accepted, summary.stored, summary.duplicates, summary.invalid
        );
        return Ok(());
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(opts).await?;

    // Install OS signal handlers (SIGTERM, SIGINT)
    handle.install_signal_handler();

    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    handle.wait().await;

    Ok(())
}

fn apply_overrides(
    config: &mut AppConfig,
    port: Option<u16>,
    log_level: Option<String>,
    in_memory: bool,
) {
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(level) = log_level {
        config.logging.level = level;
    }
    if in_memory {
        config.database.in_memory = true;
    }
}
