//! Base fee aggregate

pub mod model;
pub mod repository;

pub use model::BaseFee;
pub use repository::BaseFeeRepository;
