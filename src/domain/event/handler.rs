use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use super::dto::{
    AddCoordinatorRequest, AddResourceRequest, CancelEventResponse, CoordinatorResponse,
    CreateEventRequest, DeleteEventResponse, EventListQuery, EventListResponse, EventResponse,
    ResourceResponse, UpdateEventRequest,
};
use super::service::EventService;
use crate::state::AppState;
use crate::utils::auth::{Actor, AdminOnly, Authorized, EventStaff};
use crate::utils::error::AppError;
use crate::utils::BaseResponse;

/// 행사 생성 API
///
/// draft 상태로 생성되며, 학과를 지정하지 않으면 생성자의 학과로 등록됩니다.
#[utoipa::path(
    post,
    path = "/api/v1/events",
    request_body = CreateEventRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "행사 생성 성공", body = SuccessEventResponse),
        (status = 400, description = "잘못된 요청", body = ErrorResponse),
        (status = 401, description = "인증 실패", body = ErrorResponse),
        (status = 403, description = "권한 없음", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 장소/학과", body = ErrorResponse)
    ),
    tag = "Event"
)]
pub async fn create_event(
    State(state): State<AppState>,
    auth: Authorized<EventStaff>,
    payload: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BaseResponse<EventResponse>>), AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let result = EventService::create_event(&state, &auth.actor, req).await?;

    Ok((StatusCode::CREATED, Json(BaseResponse::created(result))))
}

/// 행사 목록 조회 API
///
/// 운영진이 아니면 published/ongoing 행사만 조회됩니다.
#[utoipa::path(
    get,
    path = "/api/v1/events",
    params(EventListQuery),
    responses(
        (status = 200, description = "행사 목록 조회 성공", body = EventListResponse),
        (status = 400, description = "잘못된 쿼리", body = ErrorResponse)
    ),
    tag = "Event"
)]
pub async fn list_events(
    State(state): State<AppState>,
    viewer: Option<Actor>,
    query: Result<Query<EventListQuery>, QueryRejection>,
) -> Result<Json<BaseResponse<EventListResponse>>, AppError> {
    let Query(query) = query?;

    let result = EventService::list_events(&state, viewer.as_ref(), query).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 행사 상세 조회 API
#[utoipa::path(
    get,
    path = "/api/v1/events/{event_id}",
    params(("event_id" = i64, Path, description = "행사 ID")),
    responses(
        (status = 200, description = "행사 조회 성공", body = SuccessEventResponse),
        (status = 404, description = "존재하지 않는 행사", body = ErrorResponse)
    ),
    tag = "Event"
)]
pub async fn get_event(
    State(state): State<AppState>,
    viewer: Option<Actor>,
    Path(event_id): Path<i64>,
) -> Result<Json<BaseResponse<EventResponse>>, AppError> {
    let result = EventService::get_event(&state, viewer.as_ref(), event_id).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 행사 수정 API
///
/// 정원은 현재 신청 인원보다 적게 줄일 수 없습니다.
#[utoipa::path(
    patch,
    path = "/api/v1/events/{event_id}",
    params(("event_id" = i64, Path, description = "행사 ID")),
    request_body = UpdateEventRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "행사 수정 성공", body = SuccessEventResponse),
        (status = 400, description = "잘못된 요청", body = ErrorResponse),
        (status = 403, description = "권한 없음", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 행사", body = ErrorResponse),
        (status = 409, description = "정원 축소 불가 / 종료된 행사", body = ErrorResponse)
    ),
    tag = "Event"
)]
pub async fn update_event(
    State(state): State<AppState>,
    auth: Authorized<EventStaff>,
    Path(event_id): Path<i64>,
    payload: Result<Json<UpdateEventRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<EventResponse>>, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let result = EventService::update_event(&state, &auth.actor, event_id, req).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 행사 삭제 API
///
/// 좌석을 가진 신청자에게 취소 안내를 보낸 뒤 신청/출석/피드백을 함께 삭제합니다.
#[utoipa::path(
    delete,
    path = "/api/v1/events/{event_id}",
    params(("event_id" = i64, Path, description = "행사 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "행사 삭제 성공", body = DeleteEventResponse),
        (status = 403, description = "권한 없음", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 행사", body = ErrorResponse)
    ),
    tag = "Event"
)]
pub async fn delete_event(
    State(state): State<AppState>,
    auth: Authorized<AdminOnly>,
    Path(event_id): Path<i64>,
) -> Result<Json<BaseResponse<DeleteEventResponse>>, AppError> {
    let result = EventService::delete_event(&state, &auth.actor, event_id).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 행사 공개 API (draft → published)
#[utoipa::path(
    post,
    path = "/api/v1/events/{event_id}/publish",
    params(("event_id" = i64, Path, description = "행사 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "공개 성공", body = SuccessEventResponse),
        (status = 403, description = "권한 없음", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 행사", body = ErrorResponse),
        (status = 409, description = "허용되지 않는 상태 전이", body = ErrorResponse)
    ),
    tag = "Event"
)]
pub async fn publish_event(
    State(state): State<AppState>,
    auth: Authorized<AdminOnly>,
    Path(event_id): Path<i64>,
) -> Result<Json<BaseResponse<EventResponse>>, AppError> {
    let result = EventService::publish_event(&state, &auth.actor, event_id).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 행사 시작 API (published → ongoing)
#[utoipa::path(
    post,
    path = "/api/v1/events/{event_id}/start",
    params(("event_id" = i64, Path, description = "행사 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "시작 처리 성공", body = SuccessEventResponse),
        (status = 409, description = "허용되지 않는 상태 전이", body = ErrorResponse)
    ),
    tag = "Event"
)]
pub async fn start_event(
    State(state): State<AppState>,
    auth: Authorized<AdminOnly>,
    Path(event_id): Path<i64>,
) -> Result<Json<BaseResponse<EventResponse>>, AppError> {
    let result = EventService::start_event(&state, &auth.actor, event_id).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 행사 종료 API (ongoing → completed)
#[utoipa::path(
    post,
    path = "/api/v1/events/{event_id}/complete",
    params(("event_id" = i64, Path, description = "행사 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "종료 처리 성공", body = SuccessEventResponse),
        (status = 409, description = "허용되지 않는 상태 전이", body = ErrorResponse)
    ),
    tag = "Event"
)]
pub async fn complete_event(
    State(state): State<AppState>,
    auth: Authorized<AdminOnly>,
    Path(event_id): Path<i64>,
) -> Result<Json<BaseResponse<EventResponse>>, AppError> {
    let result = EventService::complete_event(&state, &auth.actor, event_id).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 행사 취소 API
///
/// 확정된 신청자 전원에게 취소 안내 메일을 보내고 발송 건수를 반환합니다.
#[utoipa::path(
    post,
    path = "/api/v1/events/{event_id}/cancel",
    params(("event_id" = i64, Path, description = "행사 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "취소 성공", body = SuccessCancelEventResponse),
        (status = 403, description = "권한 없음", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 행사", body = ErrorResponse),
        (status = 409, description = "이미 종료된 행사", body = ErrorResponse)
    ),
    tag = "Event"
)]
pub async fn cancel_event(
    State(state): State<AppState>,
    auth: Authorized<AdminOnly>,
    Path(event_id): Path<i64>,
) -> Result<Json<BaseResponse<CancelEventResponse>>, AppError> {
    let result = EventService::cancel_event(&state, &auth.actor, event_id).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 담당 교수 지정 API
#[utoipa::path(
    post,
    path = "/api/v1/events/{event_id}/coordinators",
    params(("event_id" = i64, Path, description = "행사 ID")),
    request_body = AddCoordinatorRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "지정 성공", body = CoordinatorResponse),
        (status = 404, description = "존재하지 않는 행사/교수", body = ErrorResponse),
        (status = 409, description = "이미 지정된 교수", body = ErrorResponse)
    ),
    tag = "Event"
)]
pub async fn add_coordinator(
    State(state): State<AppState>,
    auth: Authorized<AdminOnly>,
    Path(event_id): Path<i64>,
    payload: Result<Json<AddCoordinatorRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BaseResponse<CoordinatorResponse>>), AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let result = EventService::add_coordinator(&state, &auth.actor, event_id, req).await?;

    Ok((StatusCode::CREATED, Json(BaseResponse::created(result))))
}

/// 담당 교수 목록 API
#[utoipa::path(
    get,
    path = "/api/v1/events/{event_id}/coordinators",
    params(("event_id" = i64, Path, description = "행사 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "조회 성공", body = [CoordinatorResponse]),
        (status = 404, description = "존재하지 않는 행사", body = ErrorResponse)
    ),
    tag = "Event"
)]
pub async fn list_coordinators(
    State(state): State<AppState>,
    _actor: Actor,
    Path(event_id): Path<i64>,
) -> Result<Json<BaseResponse<Vec<CoordinatorResponse>>>, AppError> {
    let result = EventService::list_coordinators(&state, event_id).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 행사 자원 등록 API
#[utoipa::path(
    post,
    path = "/api/v1/events/{event_id}/resources",
    params(("event_id" = i64, Path, description = "행사 ID")),
    request_body = AddResourceRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "등록 성공", body = ResourceResponse),
        (status = 400, description = "잘못된 요청", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 행사", body = ErrorResponse)
    ),
    tag = "Event"
)]
pub async fn add_resource(
    State(state): State<AppState>,
    auth: Authorized<EventStaff>,
    Path(event_id): Path<i64>,
    payload: Result<Json<AddResourceRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BaseResponse<ResourceResponse>>), AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let result = EventService::add_resource(&state, &auth.actor, event_id, req).await?;

    Ok((StatusCode::CREATED, Json(BaseResponse::created(result))))
}

/// 행사 자원 목록 API
#[utoipa::path(
    get,
    path = "/api/v1/events/{event_id}/resources",
    params(("event_id" = i64, Path, description = "행사 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "조회 성공", body = [ResourceResponse]),
        (status = 404, description = "존재하지 않는 행사", body = ErrorResponse)
    ),
    tag = "Event"
)]
pub async fn list_resources(
    State(state): State<AppState>,
    _auth: Authorized<EventStaff>,
    Path(event_id): Path<i64>,
) -> Result<Json<BaseResponse<Vec<ResourceResponse>>>, AppError> {
    let result = EventService::list_resources(&state, event_id).await?;

    Ok(Json(BaseResponse::success(result)))
}
