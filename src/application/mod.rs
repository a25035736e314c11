pub mod ports;
pub mod services;

// Re-export key types for convenience
pub use ports::ObservationFeed;
pub use services::{
    start_weather_import_task, DeliveryFeeService, ImportSummary, WeatherImportConfig,
    WeatherImportService,
};
