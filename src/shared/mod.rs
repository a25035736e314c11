pub mod errors;
pub mod shutdown;

pub use errors::{DomainError, DomainResult, InfraError};
pub use shutdown::{ShutdownCoordinator, ShutdownSignal};
