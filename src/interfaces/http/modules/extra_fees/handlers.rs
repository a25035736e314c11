//! Extra fee REST API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use super::dto::{ExtraFeeBatchRequest, ExtraFeeRequest, ExtraFeeResponse};
use crate::domain::{DomainError, DomainResult, ExtraFee};
use crate::interfaces::http::common::{domain_error, ApiError, ApiResponse, ValidatedJson};
use crate::interfaces::http::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/extra-fees",
    tag = "Extra Fees",
    responses(
        (status = 200, description = "All extra fee rules", body = ApiResponse<Vec<ExtraFeeResponse>>)
    )
)]
pub async fn list_extra_fees(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ExtraFeeResponse>>>, ApiError> {
    let fees = state.repos.extra_fees().find_all().await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        fees.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/extra-fees/{id}",
    tag = "Extra Fees",
    params(("id" = i32, Path, description = "Extra fee ID")),
    responses(
        (status = 200, description = "Extra fee rule", body = ApiResponse<ExtraFeeResponse>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_extra_fee(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ExtraFeeResponse>>, ApiError> {
    match state.repos.extra_fees().find_by_id(id).await {
        Ok(Some(fee)) => Ok(Json(ApiResponse::success(fee.into()))),
        Ok(None) => Err(domain_error(DomainError::not_found("ExtraFee", id))),
        Err(e) => Err(domain_error(e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/extra-fees",
    tag = "Extra Fees",
    request_body = ExtraFeeRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<ExtraFeeResponse>),
        (status = 400, description = "Invalid rule")
    )
)]
pub async fn create_extra_fee(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ExtraFeeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ExtraFeeResponse>>), ApiError> {
    let fee = req.into_domain().map_err(domain_error)?;
    info!(
        condition_type = %fee.condition_type(),
        vehicle_type = %fee.vehicle_type,
        fee = %fee.fee,
        "Creating extra fee"
    );

    let saved = state.repos.extra_fees().save(fee).await.map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(saved.into()))))
}

#[utoipa::path(
    post,
    path = "/api/v1/extra-fees/batch",
    tag = "Extra Fees",
    request_body = Vec<ExtraFeeRequest>,
    responses(
        (status = 201, description = "Created", body = ApiResponse<Vec<ExtraFeeResponse>>),
        (status = 400, description = "Invalid rule; nothing stored")
    )
)]
pub async fn create_extra_fees(
    State(state): State<AppState>,
    ValidatedJson(batch): ValidatedJson<ExtraFeeBatchRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<ExtraFeeResponse>>>), ApiError> {
    let fees = batch
        .items
        .into_iter()
        .map(ExtraFeeRequest::into_domain)
        .collect::<DomainResult<Vec<ExtraFee>>>()
        .map_err(domain_error)?;
    info!(count = fees.len(), "Creating extra fee batch");

    let saved = state
        .repos
        .extra_fees()
        .save_all(fees)
        .await
        .map_err(domain_error)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            saved.into_iter().map(Into::into).collect(),
        )),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/extra-fees/{id}",
    tag = "Extra Fees",
    params(("id" = i32, Path, description = "Extra fee ID")),
    request_body = ExtraFeeRequest,
    responses(
        (status = 200, description = "Updated", body = ApiResponse<ExtraFeeResponse>),
        (status = 400, description = "Invalid rule"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_extra_fee(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(req): ValidatedJson<ExtraFeeRequest>,
) -> Result<Json<ApiResponse<ExtraFeeResponse>>, ApiError> {
    let mut fee = req.into_domain().map_err(domain_error)?;
    fee.id = id;

    let updated = state.repos.extra_fees().update(fee).await.map_err(domain_error)?;
    info!(id, "Extra fee updated");
    Ok(Json(ApiResponse::success(updated.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/extra-fees/{id}",
    tag = "Extra Fees",
    params(("id" = i32, Path, description = "Extra fee ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_extra_fee(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.repos.extra_fees().delete(id).await.map_err(domain_error)?;
    info!(id, "Extra fee deleted");
    Ok(StatusCode::NO_CONTENT)
}
