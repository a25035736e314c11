//! Delivery fee calculation types

pub mod model;

pub use model::{DeliveryFeeRequest, DeliveryFeeResult, FeeBreakdown};
