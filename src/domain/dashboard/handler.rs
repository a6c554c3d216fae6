use axum::{extract::State, Json};

use super::dto::DashboardResponse;
use super::service::DashboardService;
use crate::state::AppState;
use crate::utils::auth::{AdminOnly, Authorized};
use crate::utils::error::AppError;
use crate::utils::BaseResponse;

/// 관리자 대시보드 API
///
/// 전체 통계, 다가오는 행사 5건, 최근 신청 10건, 상태별 신청 수를 반환합니다.
#[utoipa::path(
    get,
    path = "/api/v1/admin/dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "조회 성공", body = DashboardResponse),
        (status = 401, description = "인증 실패", body = ErrorResponse),
        (status = 403, description = "권한 없음", body = ErrorResponse)
    ),
    tag = "Admin"
)]
pub async fn admin_dashboard(
    State(state): State<AppState>,
    auth: Authorized<AdminOnly>,
) -> Result<Json<BaseResponse<DashboardResponse>>, AppError> {
    let result = DashboardService::admin_dashboard(&state, &auth.actor).await?;

    Ok(Json(BaseResponse::success(result)))
}
