//! Extra fee aggregate
//!
//! Weather-dependent surcharge rules and their matching semantics.

pub mod model;
pub mod repository;

pub use model::{phenomenon_matches, ConditionType, ExtraFee, FeeCondition, ValueRange};
pub use repository::ExtraFeeRepository;
