use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use super::dto::{CreateVenueRequest, DeleteVenueResponse, UpdateVenueStatusRequest, VenueResponse};
use super::service::VenueService;
use crate::state::AppState;
use crate::utils::auth::{Actor, AdminOnly, Authorized};
use crate::utils::error::AppError;
use crate::utils::BaseResponse;

/// 장소 등록 API (관리자)
#[utoipa::path(
    post,
    path = "/api/v1/venues",
    request_body = CreateVenueRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "등록 성공", body = VenueResponse),
        (status = 400, description = "잘못된 요청", body = ErrorResponse),
        (status = 403, description = "권한 없음", body = ErrorResponse)
    ),
    tag = "Venue"
)]
pub async fn create_venue(
    State(state): State<AppState>,
    auth: Authorized<AdminOnly>,
    payload: Result<Json<CreateVenueRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BaseResponse<VenueResponse>>), AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let result = VenueService::create_venue(&state, &auth.actor, req).await?;

    Ok((StatusCode::CREATED, Json(BaseResponse::created(result))))
}

/// 장소 목록 API
#[utoipa::path(
    get,
    path = "/api/v1/venues",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "조회 성공", body = [VenueResponse]),
        (status = 401, description = "인증 실패", body = ErrorResponse)
    ),
    tag = "Venue"
)]
pub async fn list_venues(
    State(state): State<AppState>,
    _actor: Actor,
) -> Result<Json<BaseResponse<Vec<VenueResponse>>>, AppError> {
    let result = VenueService::list_venues(&state).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 장소 상태 변경 API (관리자)
#[utoipa::path(
    put,
    path = "/api/v1/venues/{venue_id}/status",
    params(("venue_id" = i64, Path, description = "장소 ID")),
    request_body = UpdateVenueStatusRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "변경 성공", body = VenueResponse),
        (status = 403, description = "권한 없음", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 장소", body = ErrorResponse)
    ),
    tag = "Venue"
)]
pub async fn update_venue_status(
    State(state): State<AppState>,
    auth: Authorized<AdminOnly>,
    Path(venue_id): Path<i64>,
    payload: Result<Json<UpdateVenueStatusRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<VenueResponse>>, AppError> {
    let Json(req) = payload?;

    let result = VenueService::update_venue_status(&state, &auth.actor, venue_id, req).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 장소 삭제 API (관리자)
///
/// 이 장소를 쓰던 행사는 삭제되지 않고 장소 정보만 비워집니다.
#[utoipa::path(
    delete,
    path = "/api/v1/venues/{venue_id}",
    params(("venue_id" = i64, Path, description = "장소 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "삭제 성공", body = DeleteVenueResponse),
        (status = 403, description = "권한 없음", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 장소", body = ErrorResponse)
    ),
    tag = "Venue"
)]
pub async fn delete_venue(
    State(state): State<AppState>,
    auth: Authorized<AdminOnly>,
    Path(venue_id): Path<i64>,
) -> Result<Json<BaseResponse<DeleteVenueResponse>>, AppError> {
    let result = VenueService::delete_venue(&state, &auth.actor, venue_id).await?;

    Ok(Json(BaseResponse::success(result)))
}
