//! Base fee REST API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use super::dto::{BaseFeeBatchRequest, BaseFeeRequest, BaseFeeResponse};
use crate::domain::{BaseFee, DomainError, DomainResult};
use crate::interfaces::http::common::{domain_error, ApiError, ApiResponse, ValidatedJson};
use crate::interfaces::http::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/base-fees",
    tag = "Base Fees",
    responses(
        (status = 200, description = "All base fees", body = ApiResponse<Vec<BaseFeeResponse>>)
    )
)]
pub async fn list_base_fees(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<BaseFeeResponse>>>, ApiError> {
    let fees = state.repos.base_fees().find_all().await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        fees.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/base-fees/{id}",
    tag = "Base Fees",
    params(("id" = i32, Path, description = "Base fee ID")),
    responses(
        (status = 200, description = "Base fee", body = ApiResponse<BaseFeeResponse>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_base_fee(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<BaseFeeResponse>>, ApiError> {
    match state.repos.base_fees().find_by_id(id).await {
        Ok(Some(fee)) => Ok(Json(ApiResponse::success(fee.into()))),
        Ok(None) => Err(domain_error(DomainError::not_found("BaseFee", id))),
        Err(e) => Err(domain_error(e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/base-fees",
    tag = "Base Fees",
    request_body = BaseFeeRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<BaseFeeResponse>),
        (status = 400, description = "Invalid data"),
        (status = 409, description = "City and vehicle type already priced")
    )
)]
pub async fn create_base_fee(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<BaseFeeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BaseFeeResponse>>), ApiError> {
    let fee = req.into_domain().map_err(domain_error)?;
    info!(city = %fee.city, vehicle_type = %fee.vehicle_type, fee = %fee.fee, "Creating base fee");

    let saved = state.repos.base_fees().save(fee).await.map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(saved.into()))))
}

#[utoipa::path(
    post,
    path = "/api/v1/base-fees/batch",
    tag = "Base Fees",
    request_body = Vec<BaseFeeRequest>,
    responses(
        (status = 201, description = "Created", body = ApiResponse<Vec<BaseFeeResponse>>),
        (status = 400, description = "Invalid data; nothing stored"),
        (status = 409, description = "Duplicate city and vehicle type; nothing stored")
    )
)]
pub async fn create_base_fees(
    State(state): State<AppState>,
    ValidatedJson(batch): ValidatedJson<BaseFeeBatchRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<BaseFeeResponse>>>), ApiError> {
    let fees = batch
        .items
        .into_iter()
        .map(BaseFeeRequest::into_domain)
        .collect::<DomainResult<Vec<BaseFee>>>()
        .map_err(domain_error)?;
    info!(count = fees.len(), "Creating base fee batch");

    let saved = state
        .repos
        .base_fees()
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
    path = "/api/v1/base-fees/{id}",
    tag = "Base Fees",
    params(("id" = i32, Path, description = "Base fee ID")),
    request_body = BaseFeeRequest,
    responses(
        (status = 200, description = "Updated", body = ApiResponse<BaseFeeResponse>),
        (status = 400, description = "Invalid data"),
        (status = 404, description = "Not found"),
        (status = 409, description = "City and vehicle type already priced")
    )
)]
pub async fn update_base_fee(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(req): ValidatedJson<BaseFeeRequest>,
) -> Result<Json<ApiResponse<BaseFeeResponse>>, ApiError> {
    let mut fee = req.into_domain().map_err(domain_error)?;
    fee.id = id;

    let updated = state.repos.base_fees().update(fee).await.map_err(domain_error)?;
    info!(id, "Base fee updated");
    Ok(Json(ApiResponse::success(updated.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/base-fees/{id}",
    tag = "Base Fees",
    params(("id" = i32, Path, description = "Base fee ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_base_fee(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.repos.base_fees().delete(id).await.map_err(domain_error)?;
    info!(id, "Base fee deleted");
    Ok(StatusCode::NO_CONTENT)
}
