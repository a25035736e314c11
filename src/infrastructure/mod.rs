//! Infrastructure layer - external concerns

pub mod database;
pub mod seed;
pub mod storage;
pub mod weather;

pub use database::repositories::SeaOrmRepositoryProvider;
pub use database::{init_database, run_migrations, DatabaseConfig};
pub use storage::InMemoryRepositoryProvider;
pub use weather::HttpObservationFeed;
