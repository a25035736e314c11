//! API Router with Swagger UI

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::common::ApiResponse;
use super::modules::{base_fees, delivery_fee, extra_fees, health, metrics, weather};
use super::AppState;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Delivery fee
        delivery_fee::calculate_delivery_fee,
        // Base fees
        base_fees::list_base_fees,
        base_fees::get_base_fee,
        base_fees::create_base_fee,
        base_fees::create_base_fees,
        base_fees::update_base_fee,
        base_fees::delete_base_fee,
        // Extra fees
        extra_fees::list_extra_fees,
        extra_fees::get_extra_fee,
        extra_fees::create_extra_fee,
        extra_fees::create_extra_fees,
        extra_fees::update_extra_fee,
        extra_fees::delete_extra_fee,
        // Weather
        weather::list_weather_observations,
        weather::latest_weather_observation,
        weather::import_weather_observations,
    ),
    components(
        schemas(
            ApiResponse<String>,
            health::HealthResponse,
            health::ComponentHealth,
            delivery_fee::DeliveryFeeRequestDto,
            delivery_fee::DeliveryFeeResponse,
            delivery_fee::FeeBreakdownDto,
            base_fees::BaseFeeRequest,
            base_fees::BaseFeeResponse,
            extra_fees::ExtraFeeRequest,
            extra_fees::ExtraFeeResponse,
            weather::WeatherObservationResponse,
            weather::ImportSummaryResponse,
        )
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Delivery Fee", description = "Delivery fee calculation from base fees and current weather"),
        (name = "Base Fees", description = "Base fee per city and vehicle type"),
        (name = "Extra Fees", description = "Weather-dependent extra fee and prohibition rules"),
        (name = "Weather", description = "Imported weather station observations"),
    ),
    info(
        title = "Delivery Fee Service API",
        version = "1.0.0",
        description = "REST API for calculating food delivery fees from regional base fees and weather conditions",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes.
///
/// `/metrics` is only mounted when a Prometheus recorder is installed.
pub fn create_api_router(
    state: AppState,
    health_state: health::HealthState,
    prometheus: Option<PrometheusHandle>,
) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let fee_routes = Router::new()
        .route("/", post(delivery_fee::calculate_delivery_fee))
        .with_state(state.clone());

    let base_fee_routes = Router::new()
        .route(
            "/",
            get(base_fees::list_base_fees).post(base_fees::create_base_fee),
        )
        .route("/batch", post(base_fees::create_base_fees))
        .route(
            "/{id}",
            get(base_fees::get_base_fee)
                .put(base_fees::update_base_fee)
                .delete(base_fees::delete_base_fee),
        )
        .with_state(state.clone());

    let extra_fee_routes = Router::new()
        .route(
            "/",
            get(extra_fees::list_extra_fees).post(extra_fees::create_extra_fee),
        )
        .route("/batch", post(extra_fees::create_extra_fees))
        .route(
            "/{id}",
            get(extra_fees::get_extra_fee)
                .put(extra_fees::update_extra_fee)
                .delete(extra_fees::delete_extra_fee),
        )
        .with_state(state.clone());

    let weather_routes = Router::new()
        .route("/", get(weather::list_weather_observations))
        .route("/latest", get(weather::latest_weather_observation))
        .route("/import", post(weather::import_weather_observations))
        .with_state(state);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    let mut router = Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Health
        .route(
            "/health",
            get(health::health_check).with_state(health_state),
        )
        .nest("/api/v1/delivery-fee", fee_routes)
        .nest("/api/v1/base-fees", base_fee_routes)
        .nest("/api/v1/extra-fees", extra_fee_routes)
        .nest("/api/v1/weather-observations", weather_routes);

    if let Some(handle) = prometheus {
        router = router.route(
            "/metrics",
            get(metrics::prometheus_metrics).with_state(metrics::MetricsState { handle }),
        );
    }

    router
        .route_layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
