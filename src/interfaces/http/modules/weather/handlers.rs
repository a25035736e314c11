//! Weather observation REST API handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use super::dto::{ImportSummaryResponse, LatestParams, RecentParams, WeatherObservationResponse};
use crate::domain::DomainError;
use crate::interfaces::http::common::{domain_error, ApiError, ApiResponse};
use crate::interfaces::http::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/weather-observations",
    tag = "Weather",
    params(RecentParams),
    responses(
        (status = 200, description = "Recent observations, newest first", body = ApiResponse<Vec<WeatherObservationResponse>>)
    )
)]
pub async fn list_weather_observations(
    State(state): State<AppState>,
    Query(params): Query<RecentParams>,
) -> Result<Json<ApiResponse<Vec<WeatherObservationResponse>>>, ApiError> {
    let observations = state
        .repos
        .weather()
        .find_recent(params.limit())
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        observations.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/weather-observations/latest",
    tag = "Weather",
    params(LatestParams),
    responses(
        (status = 200, description = "Newest observation for the city", body = ApiResponse<WeatherObservationResponse>),
        (status = 400, description = "City missing"),
        (status = 404, description = "No observation for the city")
    )
)]
pub async fn latest_weather_observation(
    State(state): State<AppState>,
    Query(params): Query<LatestParams>,
) -> Result<Json<ApiResponse<WeatherObservationResponse>>, ApiError> {
    let city = params.city.trim();
    if city.is_empty() {
        return Err(domain_error(DomainError::InvalidRequest(
            "city must not be empty".to_string(),
        )));
    }

    match state.repos.weather().find_latest_for_city(city).await {
        Ok(Some(observation)) => Ok(Json(ApiResponse::success(observation.into()))),
        Ok(None) => Err(domain_error(DomainError::NotFound {
            entity: "WeatherObservation",
            field: "city",
            value: city.to_string(),
        })),
        Err(e) => Err(domain_error(e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/weather-observations/import",
    tag = "Weather",
    responses(
        (status = 200, description = "Import finished", body = ApiResponse<ImportSummaryResponse>),
        (status = 502, description = "Weather feed unreachable or malformed"),
        (status = 503, description = "Weather import is disabled")
    )
)]
pub async fn import_weather_observations(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ImportSummaryResponse>>, ApiError> {
    let Some(importer) = state.importer.as_ref() else {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse::error("Weather import is disabled")),
        ));
    };

    info!("Manual weather import requested");
    let summary = importer.import_once().await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(summary.into())))
}
