use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use validator::Validate;

use super::dto::{
    ApproveRegistrationsRequest, ApproveRegistrationsResponse, AttendanceResponse,
    EventRegistrationItem, FeedbackListResponse, FeedbackResponse, ManualRegistrationRequest,
    MarkAttendanceRequest, MyRegistrationItem, RegistrationListQuery, RegistrationResponse,
    RejectRegistrationsRequest, RejectRegistrationsResponse, SubmitFeedbackRequest,
};
use super::export::CsvExport;
use super::service::RegistrationService;
use crate::state::AppState;
use crate::utils::auth::{AdminOnly, Authorized, EventStaff, StudentOnly};
use crate::utils::error::AppError;
use crate::utils::BaseResponse;

/// 참가 신청 API
///
/// 승인 대기(pending) 상태로 생성되며 좌석을 하나 점유합니다.
#[utoipa::path(
    post,
    path = "/api/v1/events/{event_id}/registrations",
    params(("event_id" = i64, Path, description = "행사 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "신청 성공", body = SuccessRegistrationResponse),
        (status = 401, description = "인증 실패", body = ErrorResponse),
        (status = 403, description = "학생이 아님", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 행사", body = ErrorResponse),
        (status = 409, description = "중복 신청 / 정원 초과 / 신청 불가 상태", body = ErrorResponse)
    ),
    tag = "Registration"
)]
pub async fn register(
    State(state): State<AppState>,
    auth: Authorized<StudentOnly>,
    Path(event_id): Path<i64>,
) -> Result<(StatusCode, Json<BaseResponse<RegistrationResponse>>), AppError> {
    let result = RegistrationService::register(&state, &auth.actor, event_id).await?;

    Ok((StatusCode::CREATED, Json(BaseResponse::created(result))))
}

/// 관리자 수동 등록 API
///
/// 확정(confirmed) 상태로 바로 등록됩니다.
#[utoipa::path(
    post,
    path = "/api/v1/events/{event_id}/registrations/manual",
    params(("event_id" = i64, Path, description = "행사 ID")),
    request_body = ManualRegistrationRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "등록 성공", body = SuccessRegistrationResponse),
        (status = 403, description = "권한 없음", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 행사/학생", body = ErrorResponse),
        (status = 409, description = "중복 신청 / 정원 초과 / 신청 불가 상태", body = ErrorResponse)
    ),
    tag = "Registration"
)]
pub async fn add_manual_registration(
    State(state): State<AppState>,
    auth: Authorized<AdminOnly>,
    Path(event_id): Path<i64>,
    payload: Result<Json<ManualRegistrationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BaseResponse<RegistrationResponse>>), AppError> {
    let Json(req) = payload?;

    let result =
        RegistrationService::add_manual_registration(&state, &auth.actor, event_id, req.student_id)
            .await?;

    Ok((StatusCode::CREATED, Json(BaseResponse::created(result))))
}

/// 행사별 신청자 목록 API
#[utoipa::path(
    get,
    path = "/api/v1/events/{event_id}/registrations",
    params(("event_id" = i64, Path, description = "행사 ID"), RegistrationListQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "조회 성공", body = [EventRegistrationItem]),
        (status = 403, description = "권한 없음", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 행사", body = ErrorResponse)
    ),
    tag = "Registration"
)]
pub async fn list_event_registrations(
    State(state): State<AppState>,
    _auth: Authorized<EventStaff>,
    Path(event_id): Path<i64>,
    query: Result<Query<RegistrationListQuery>, QueryRejection>,
) -> Result<Json<BaseResponse<Vec<EventRegistrationItem>>>, AppError> {
    let Query(query) = query?;

    let result = RegistrationService::list_event_registrations(&state, event_id, query).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 신청 일괄 승인 API
///
/// pending 상태가 아닌 신청은 건너뛰고, 실제 승인된 건수를 반환합니다.
#[utoipa::path(
    post,
    path = "/api/v1/events/{event_id}/registrations/approve",
    params(("event_id" = i64, Path, description = "행사 ID")),
    request_body = ApproveRegistrationsRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "승인 성공", body = ApproveRegistrationsResponse),
        (status = 400, description = "잘못된 요청", body = ErrorResponse),
        (status = 403, description = "권한 없음", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 행사", body = ErrorResponse)
    ),
    tag = "Registration"
)]
pub async fn approve_registrations(
    State(state): State<AppState>,
    auth: Authorized<AdminOnly>,
    Path(event_id): Path<i64>,
    payload: Result<Json<ApproveRegistrationsRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<ApproveRegistrationsResponse>>, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let result = RegistrationService::approve(&state, &auth.actor, event_id, req).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 신청 일괄 반려 API
///
/// 반려된 학생에게 사유가 담긴 안내 메일을 보냅니다. 사유가 없으면 기본 사유를 사용합니다.
#[utoipa::path(
    post,
    path = "/api/v1/events/{event_id}/registrations/reject",
    params(("event_id" = i64, Path, description = "행사 ID")),
    request_body = RejectRegistrationsRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "반려 성공", body = RejectRegistrationsResponse),
        (status = 400, description = "잘못된 요청", body = ErrorResponse),
        (status = 403, description = "권한 없음", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 행사", body = ErrorResponse)
    ),
    tag = "Registration"
)]
pub async fn reject_registrations(
    State(state): State<AppState>,
    auth: Authorized<AdminOnly>,
    Path(event_id): Path<i64>,
    payload: Result<Json<RejectRegistrationsRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<RejectRegistrationsResponse>>, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let result = RegistrationService::reject(&state, &auth.actor, event_id, req).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 신청자 명단 CSV 다운로드 API
#[utoipa::path(
    get,
    path = "/api/v1/events/{event_id}/registrations/export",
    params(("event_id" = i64, Path, description = "행사 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "CSV 파일", content_type = "text/csv", body = String),
        (status = 403, description = "권한 없음", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 행사", body = ErrorResponse)
    ),
    tag = "Registration"
)]
pub async fn export_registrations(
    State(state): State<AppState>,
    auth: Authorized<AdminOnly>,
    Path(event_id): Path<i64>,
) -> Result<Response, AppError> {
    let export = RegistrationService::export_registrations(&state, &auth.actor, event_id).await?;

    Ok(csv_attachment(export))
}

fn csv_attachment(export: CsvExport) -> Response {
    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        export.filename
    ))
    .unwrap_or_else(|_| HeaderValue::from_static("attachment; filename=\"registrations.csv\""));

    (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("text/csv")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.body,
    )
        .into_response()
}

/// 내 신청 내역 API
#[utoipa::path(
    get,
    path = "/api/v1/registrations/me",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "조회 성공", body = [MyRegistrationItem]),
        (status = 401, description = "인증 실패", body = ErrorResponse),
        (status = 403, description = "학생이 아님", body = ErrorResponse)
    ),
    tag = "Registration"
)]
pub async fn my_registrations(
    State(state): State<AppState>,
    auth: Authorized<StudentOnly>,
) -> Result<Json<BaseResponse<Vec<MyRegistrationItem>>>, AppError> {
    let result = RegistrationService::my_registrations(&state, &auth.actor).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 신청 취소 API (본인)
#[utoipa::path(
    post,
    path = "/api/v1/registrations/{registration_id}/cancel",
    params(("registration_id" = i64, Path, description = "신청 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "취소 성공", body = SuccessRegistrationResponse),
        (status = 404, description = "존재하지 않는 신청", body = ErrorResponse),
        (status = 409, description = "취소할 수 없는 상태", body = ErrorResponse)
    ),
    tag = "Registration"
)]
pub async fn cancel_registration(
    State(state): State<AppState>,
    auth: Authorized<StudentOnly>,
    Path(registration_id): Path<i64>,
) -> Result<Json<BaseResponse<RegistrationResponse>>, AppError> {
    let result =
        RegistrationService::cancel_registration(&state, &auth.actor, registration_id).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 출석 체크 API
///
/// 같은 학생을 다시 체크하면 체크인 시각만 갱신됩니다.
#[utoipa::path(
    post,
    path = "/api/v1/events/{event_id}/attendance",
    params(("event_id" = i64, Path, description = "행사 ID")),
    request_body = MarkAttendanceRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "출석 처리 성공", body = AttendanceResponse),
        (status = 403, description = "권한 없음", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 행사/학생", body = ErrorResponse)
    ),
    tag = "Attendance"
)]
pub async fn mark_attendance(
    State(state): State<AppState>,
    auth: Authorized<EventStaff>,
    Path(event_id): Path<i64>,
    payload: Result<Json<MarkAttendanceRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<AttendanceResponse>>, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let result = RegistrationService::mark_attendance(&state, &auth.actor, event_id, req).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 출석 목록 API
#[utoipa::path(
    get,
    path = "/api/v1/events/{event_id}/attendance",
    params(("event_id" = i64, Path, description = "행사 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "조회 성공", body = [AttendanceResponse]),
        (status = 404, description = "존재하지 않는 행사", body = ErrorResponse)
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    State(state): State<AppState>,
    _auth: Authorized<EventStaff>,
    Path(event_id): Path<i64>,
) -> Result<Json<BaseResponse<Vec<AttendanceResponse>>>, AppError> {
    let result = RegistrationService::list_attendance(&state, event_id).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 피드백 제출 API
#[utoipa::path(
    post,
    path = "/api/v1/events/{event_id}/feedback",
    params(("event_id" = i64, Path, description = "행사 ID")),
    request_body = SubmitFeedbackRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "제출 성공", body = FeedbackResponse),
        (status = 400, description = "평점 범위 오류", body = ErrorResponse),
        (status = 409, description = "이미 제출함 / 출석 기록 없음", body = ErrorResponse)
    ),
    tag = "Feedback"
)]
pub async fn submit_feedback(
    State(state): State<AppState>,
    auth: Authorized<StudentOnly>,
    Path(event_id): Path<i64>,
    payload: Result<Json<SubmitFeedbackRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BaseResponse<FeedbackResponse>>), AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let result = RegistrationService::submit_feedback(&state, &auth.actor, event_id, req).await?;

    Ok((StatusCode::CREATED, Json(BaseResponse::created(result))))
}

/// 피드백 목록 API (평균 평점 포함)
#[utoipa::path(
    get,
    path = "/api/v1/events/{event_id}/feedback",
    params(("event_id" = i64, Path, description = "행사 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "조회 성공", body = FeedbackListResponse),
        (status = 404, description = "존재하지 않는 행사", body = ErrorResponse)
    ),
    tag = "Feedback"
)]
pub async fn list_feedback(
    State(state): State<AppState>,
    _auth: Authorized<EventStaff>,
    Path(event_id): Path<i64>,
) -> Result<Json<BaseResponse<FeedbackListResponse>>, AppError> {
    let result = RegistrationService::list_feedback(&state, event_id).await?;

    Ok(Json(BaseResponse::success(result)))
}
