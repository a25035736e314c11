//! Shared state of the REST handlers

use std::sync::Arc;

use crate::application::{DeliveryFeeService, WeatherImportService};
use crate::domain::RepositoryProvider;

#[derive(Clone)]
pub struct AppState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub fee_service: Arc<DeliveryFeeService>,
    /// `None` when the weather importer is disabled
    pub importer: Option<Arc<WeatherImportService>>,
}

impl AppState {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        let fee_service = Arc::new(DeliveryFeeService::new(Arc::clone(&repos)));
        Self {
            repos,
            fee_service,
            importer: None,
        }
    }

    pub fn with_importer(mut self, importer: Arc<WeatherImportService>) -> Self {
        self.importer = Some(importer);
        self
    }
}
