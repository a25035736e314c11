//! Delivery fee REST API handler

use axum::{extract::State, Json};

use super::dto::{DeliveryFeeRequestDto, DeliveryFeeResponse};
use crate::interfaces::http::common::{domain_error, ApiError, ApiResponse, ValidatedJson};
use crate::interfaces::http::AppState;

#[utoipa::path(
    post,
    path = "/api/v1/delivery-fee",
    tag = "Delivery Fee",
    request_body = DeliveryFeeRequestDto,
    responses(
        (status = 200, description = "Calculated fee", body = ApiResponse<DeliveryFeeResponse>),
        (status = 400, description = "City or vehicle type missing"),
        (status = 404, description = "No base fee for the city and vehicle type"),
        (status = 422, description = "Weather forbids the vehicle type"),
        (status = 500, description = "Calculation failed")
    )
)]
pub async fn calculate_delivery_fee(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<DeliveryFeeRequestDto>,
) -> Result<Json<ApiResponse<DeliveryFeeResponse>>, ApiError> {
    let result = state
        .fee_service
        .calculate_for(&req.city, &req.vehicle_type)
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(result.into())))
}
