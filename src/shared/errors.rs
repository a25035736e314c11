use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("No base fee found for city: {city} and vehicle type: {vehicle_type}")]
    BaseFeeNotFound { city: String, vehicle_type: String },

    #[error("Usage of selected vehicle type is forbidden: {reason}")]
    VehicleForbidden { vehicle_type: String, reason: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Failed to calculate delivery fee")]
    CalculationFailure(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Weather feed error: {0}")]
    Upstream(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        DomainError::NotFound {
            entity,
            field: "id",
            value: id.to_string(),
        }
    }

    /// Whether a caller could succeed by choosing another vehicle type
    /// rather than another city.
    pub fn is_vehicle_forbidden(&self) -> bool {
        matches!(self, DomainError::VehicleForbidden { .. })
    }
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::DeError),
}

impl From<InfraError> for DomainError {
    fn from(e: InfraError) -> Self {
        match e {
            InfraError::Database(_) => DomainError::Storage(e.to_string()),
            InfraError::Http(_) | InfraError::Xml(_) => DomainError::Upstream(e.to_string()),
        }
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
