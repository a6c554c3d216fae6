use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};

use super::dto::{AuditLogListResponse, AuditLogQuery};
use super::service::AuditService;
use crate::state::AppState;
use crate::utils::auth::{AdminOnly, Authorized};
use crate::utils::error::AppError;
use crate::utils::BaseResponse;

/// 관리자 작업 로그 조회 API
///
/// 최신순으로 정렬되며 엔티티 종류로 필터링할 수 있습니다.
#[utoipa::path(
    get,
    path = "/api/v1/admin/audit-logs",
    params(AuditLogQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "조회 성공", body = AuditLogListResponse),
        (status = 401, description = "인증 실패", body = ErrorResponse),
        (status = 403, description = "권한 없음", body = ErrorResponse)
    ),
    tag = "Admin"
)]
pub async fn list_audit_logs(
    State(state): State<AppState>,
    _auth: Authorized<AdminOnly>,
    query: Result<Query<AuditLogQuery>, QueryRejection>,
) -> Result<Json<BaseResponse<AuditLogListResponse>>, AppError> {
    let Query(query) = query?;

    let result = AuditService::list_audit_logs(&state, query).await?;

    Ok(Json(BaseResponse::success(result)))
}
