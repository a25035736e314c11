//! # Delivery Fee Service
//!
//! Calculates food courier delivery fees from a regional base fee and
//! extra fees driven by the latest weather observation of the city.
//!
//! ## Architecture
//!
//! - **domain**: fee rules, weather observations, repository traits
//! - **application**: the fee engine and the weather importer
//! - **infrastructure**: SeaORM/SQLite and in-memory stores, the weather feed client
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: runtime bootstrap shared by the CLI

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{
    init_database, run_migrations, DatabaseConfig, InMemoryRepositoryProvider,
    SeaOrmRepositoryProvider,
};

// Re-export API router
pub use interfaces::{create_api_router, AppState};
