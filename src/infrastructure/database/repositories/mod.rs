//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod base_fee_repository;
pub mod extra_fee_repository;
pub mod repository_provider;
pub mod weather_repository;

pub use repository_provider::SeaOrmRepositoryProvider;

use log::debug;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use sea_orm::{DbErr, SqlErr};

use crate::domain::{DomainError, DomainResult};
use crate::shared::errors::InfraError;

// ── Conversion helpers ──────────────────────────────────────────

fn db_err(e: DbErr) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            debug!("Unique constraint violated: {}", detail);
            DomainError::Conflict("record already exists".to_string())
        }
        _ => InfraError::Database(e).into(),
    }
}

/// Unique index violations become `duplicate`; other errors go through
/// [`db_err`].
fn conflict_or(e: DbErr, duplicate: DomainError) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            debug!("Unique constraint violated: {}", detail);
            duplicate
        }
        _ => db_err(e),
    }
}

/// Amounts and measurements are stored as doubles; values are rounded
/// back to the shortest decimal that produced them.
fn decimal_from_db(value: f64, column: &str) -> DomainResult<Decimal> {
    Decimal::from_f64(value)
        .map(|d| d.normalize())
        .ok_or_else(|| DomainError::Storage(format!("{} holds non-finite value {}", column, value)))
}

fn optional_decimal_from_db(value: Option<f64>, column: &str) -> DomainResult<Option<Decimal>> {
    value.map(|v| decimal_from_db(v, column)).transpose()
}

fn decimal_to_db(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}
