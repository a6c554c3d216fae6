use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use super::dto::{
    ChangeRoleRequest, CreateDepartmentRequest, DepartmentResponse, UpdateProfileRequest,
    UserListQuery, UserProfileResponse,
};
use super::service::{DepartmentService, UserService};
use crate::state::AppState;
use crate::utils::auth::{Actor, AdminOnly, Authorized};
use crate::utils::error::AppError;
use crate::utils::BaseResponse;

/// 내 프로필 조회 API
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "프로필 조회 성공", body = SuccessProfileResponse),
        (status = 401, description = "인증 실패", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 사용자", body = ErrorResponse)
    ),
    tag = "User"
)]
pub async fn get_profile(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<BaseResponse<UserProfileResponse>>, AppError> {
    let profile = UserService::get_profile(&state, &actor).await?;

    Ok(Json(BaseResponse::success(profile)))
}

/// 내 프로필 수정 API
#[utoipa::path(
    patch,
    path = "/api/v1/users/me",
    request_body = UpdateProfileRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "프로필 수정 성공", body = SuccessProfileResponse),
        (status = 400, description = "잘못된 요청", body = ErrorResponse),
        (status = 401, description = "인증 실패", body = ErrorResponse)
    ),
    tag = "User"
)]
pub async fn update_profile(
    State(state): State<AppState>,
    actor: Actor,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<UserProfileResponse>>, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let profile = UserService::update_profile(&state, &actor, req).await?;

    Ok(Json(BaseResponse::success(profile)))
}

/// 사용자 목록 API (관리자)
#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    params(UserListQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "조회 성공", body = [UserProfileResponse]),
        (status = 403, description = "권한 없음", body = ErrorResponse)
    ),
    tag = "User"
)]
pub async fn list_users(
    State(state): State<AppState>,
    _auth: Authorized<AdminOnly>,
    query: Result<Query<UserListQuery>, QueryRejection>,
) -> Result<Json<BaseResponse<Vec<UserProfileResponse>>>, AppError> {
    let Query(query) = query?;

    let users = UserService::list_users(&state, query).await?;

    Ok(Json(BaseResponse::success(users)))
}

/// 사용자 역할 변경 API (관리자)
#[utoipa::path(
    put,
    path = "/api/v1/admin/users/{user_id}/role",
    params(("user_id" = i64, Path, description = "사용자 ID")),
    request_body = ChangeRoleRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "변경 성공", body = SuccessProfileResponse),
        (status = 403, description = "권한 없음", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 사용자", body = ErrorResponse),
        (status = 409, description = "본인 역할 변경 불가", body = ErrorResponse)
    ),
    tag = "User"
)]
pub async fn change_role(
    State(state): State<AppState>,
    auth: Authorized<AdminOnly>,
    Path(user_id): Path<i64>,
    payload: Result<Json<ChangeRoleRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<UserProfileResponse>>, AppError> {
    let Json(req) = payload?;

    let profile = UserService::change_role(&state, &auth.actor, user_id, req).await?;

    Ok(Json(BaseResponse::success(profile)))
}

/// 학과 생성 API (관리자)
#[utoipa::path(
    post,
    path = "/api/v1/departments",
    request_body = CreateDepartmentRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "생성 성공", body = DepartmentResponse),
        (status = 400, description = "잘못된 요청", body = ErrorResponse),
        (status = 403, description = "권한 없음", body = ErrorResponse),
        (status = 409, description = "학과명/코드 중복", body = ErrorResponse)
    ),
    tag = "Department"
)]
pub async fn create_department(
    State(state): State<AppState>,
    auth: Authorized<AdminOnly>,
    payload: Result<Json<CreateDepartmentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BaseResponse<DepartmentResponse>>), AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let result = DepartmentService::create_department(&state, &auth.actor, req).await?;

    Ok((StatusCode::CREATED, Json(BaseResponse::created(result))))
}

/// 학과 목록 API
#[utoipa::path(
    get,
    path = "/api/v1/departments",
    responses(
        (status = 200, description = "조회 성공", body = [DepartmentResponse])
    ),
    tag = "Department"
)]
pub async fn list_departments(
    State(state): State<AppState>,
) -> Result<Json<BaseResponse<Vec<DepartmentResponse>>>, AppError> {
    let result = DepartmentService::list_departments(&state).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 학과 삭제 API (관리자)
///
/// 소속 사용자와 행사는 삭제되지 않고 학과 정보만 비워집니다.
#[utoipa::path(
    delete,
    path = "/api/v1/departments/{department_id}",
    params(("department_id" = i64, Path, description = "학과 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "삭제 성공"),
        (status = 403, description = "권한 없음", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 학과", body = ErrorResponse)
    ),
    tag = "Department"
)]
pub async fn delete_department(
    State(state): State<AppState>,
    auth: Authorized<AdminOnly>,
    Path(department_id): Path<i64>,
) -> Result<Json<BaseResponse<()>>, AppError> {
    DepartmentService::delete_department(&state, &auth.actor, department_id).await?;

    Ok(Json(BaseResponse::success_message("학과가 삭제되었습니다.")))
}
