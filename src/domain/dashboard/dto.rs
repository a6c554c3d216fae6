use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::event::dto::EventResponse;
use crate::domain::registration::entity::registration::RegistrationStatus;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_events: u64,
    /// published + ongoing
    pub active_events: u64,
    pub total_registrations: u64,
    pub pending_approvals: u64,
    pub total_students: u64,
    pub total_faculty: u64,
    pub total_departments: u64,
    /// 결제 완료된 신청의 참가비 합계
    #[schema(value_type = String)]
    pub total_revenue: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentRegistrationItem {
    pub registration_id: i64,
    pub event_id: i64,
    pub event_title: String,
    pub student_id: i64,
    pub student_name: String,
    pub status: RegistrationStatus,
    #[schema(value_type = String)]
    pub registered_at: NaiveDateTime,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: RegistrationStatus,
    pub count: u64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub stats: DashboardStats,
    pub upcoming_events: Vec<EventResponse>,
    pub recent_registrations: Vec<RecentRegistrationItem>,
    pub registrations_by_status: Vec<StatusCount>,
}
