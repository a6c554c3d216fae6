use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::entity::audit_log::{self, AuditAction};

pub const DEFAULT_PAGE_SIZE: u64 = 50;
pub const MAX_PAGE_SIZE: u64 = 200;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogQuery {
    /// 예: Event, Registration
    pub entity_type: Option<String>,
    pub page: Option<u64>,
    pub size: Option<u64>,
}

impl AuditLogQuery {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn size(&self) -> u64 {
        self.size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogItem {
    pub audit_log_id: i64,
    pub admin_id: Option<i64>,
    pub action_type: AuditAction,
    pub entity_type: String,
    pub entity_id: i64,
    pub description: String,
    #[schema(value_type = String)]
    pub created_at: NaiveDateTime,
    pub ip_address: Option<String>,
}

impl From<audit_log::Model> for AuditLogItem {
    fn from(model: audit_log::Model) -> Self {
        Self {
            audit_log_id: model.audit_log_id,
            admin_id: model.admin_id,
            action_type: model.action_type,
            entity_type: model.entity_type,
            entity_id: model.entity_id,
            description: model.description,
            created_at: model.created_at,
            ip_address: model.ip_address,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogListResponse {
    pub logs: Vec<AuditLogItem>,
    pub page: u64,
    pub size: u64,
    pub total: u64,
}
