//! Application services

mod delivery_fee;
mod weather_import;

pub use delivery_fee::DeliveryFeeService;
pub use weather_import::{
    start_weather_import_task, ImportSummary, WeatherImportConfig, WeatherImportService,
};
