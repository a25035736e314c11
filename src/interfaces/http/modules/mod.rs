pub mod base_fees;
pub mod delivery_fee;
pub mod extra_fees;
pub mod health;
pub mod metrics;
pub mod weather;
