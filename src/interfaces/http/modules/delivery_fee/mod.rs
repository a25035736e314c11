//! Delivery fee calculation endpoint

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
