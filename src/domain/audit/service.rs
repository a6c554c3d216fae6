use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};

use crate::state::AppState;
use crate::utils::error::AppError;

use super::dto::{AuditLogItem, AuditLogListResponse, AuditLogQuery};
use super::entity::audit_log;

pub struct AuditService;

impl AuditService {
    /// 감사 로그 조회 (최신순)
    pub async fn list_audit_logs(
        state: &AppState,
        query: AuditLogQuery,
    ) -> Result<AuditLogListResponse, AppError> {
        let mut select = audit_log::Entity::find();
        if let Some(entity_type) = query.entity_type.as_deref().filter(|t| !t.is_empty()) {
            select = select.filter(audit_log::Column::EntityType.eq(entity_type));
        }

        let page = query.page();
        let size = query.size();
        let paginator = select
            .order_by_desc(audit_log::Column::CreatedAt)
            .order_by_desc(audit_log::Column::AuditLogId)
            .paginate(&state.db, size);

        let total = paginator.num_items().await?;
        let logs = paginator
            .fetch_page(page - 1)
            .await?
            .into_iter()
            .map(AuditLogItem::from)
            .collect();

        Ok(AuditLogListResponse {
            logs,
            page,
            size,
            total,
        })
    }
}
