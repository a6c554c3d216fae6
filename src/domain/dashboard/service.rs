use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, EntityTrait, Iterable, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::domain::audit::entity::audit_log::AuditAction;
use crate::domain::audit::logger::{entity_type, AuditEntry};
use crate::domain::event::dto::EventResponse;
use crate::domain::event::entity::event;
use crate::domain::event::lifecycle::REGISTRATION_OPEN_STATUSES;
use crate::domain::registration::entity::registration::{
    self, PaymentStatus, RegistrationStatus,
};
use crate::domain::user::entity::department;
use crate::domain::user::entity::user::{self, UserRole};
use crate::state::AppState;
use crate::utils::auth::Actor;
use crate::utils::error::AppError;

use super::dto::{DashboardResponse, DashboardStats, RecentRegistrationItem, StatusCount};

const UPCOMING_EVENT_LIMIT: u64 = 5;
const RECENT_REGISTRATION_LIMIT: u64 = 10;

pub struct DashboardService;

impl DashboardService {
    /// 관리자 대시보드
    pub async fn admin_dashboard(
        state: &AppState,
        actor: &Actor,
    ) -> Result<DashboardResponse, AppError> {
        let db = &state.db;

        let total_events = event::Entity::find().count(db).await?;
        let active_events = event::Entity::find()
            .filter(event::Column::Status.is_in(REGISTRATION_OPEN_STATUSES))
            .count(db)
            .await?;
        let total_registrations = registration::Entity::find().count(db).await?;
        let total_students = user::Entity::find()
            .filter(user::Column::Role.eq(UserRole::Student))
            .count(db)
            .await?;
        let total_faculty = user::Entity::find()
            .filter(user::Column::Role.eq(UserRole::Faculty))
            .count(db)
            .await?;
        let total_departments = department::Entity::find().count(db).await?;

        let mut registrations_by_status = Vec::new();
        for status in RegistrationStatus::iter() {
            let count = registration::Entity::find()
                .filter(registration::Column::Status.eq(status))
                .count(db)
                .await?;
            registrations_by_status.push(StatusCount { status, count });
        }
        let pending_approvals = registrations_by_status
            .iter()
            .find(|s| s.status == RegistrationStatus::Pending)
            .map(|s| s.count)
            .unwrap_or(0);

        let total_revenue = registration::Entity::find()
            .filter(registration::Column::PaymentStatus.eq(PaymentStatus::Completed))
            .find_also_related(event::Entity)
            .all(db)
            .await?
            .into_iter()
            .filter_map(|(_, ev)| ev.map(|ev| ev.registration_fee))
            .fold(Decimal::ZERO, |acc, fee| acc + fee);

        let upcoming_events = event::Entity::find()
            .filter(event::Column::EventDate.gte(Utc::now().date_naive()))
            .filter(event::Column::Status.is_in(REGISTRATION_OPEN_STATUSES))
            .order_by_asc(event::Column::EventDate)
            .order_by_asc(event::Column::StartTime)
            .limit(UPCOMING_EVENT_LIMIT)
            .all(db)
            .await?
            .into_iter()
            .map(EventResponse::from)
            .collect();

        let recent = registration::Entity::find()
            .order_by_desc(registration::Column::RegisteredAt)
            .order_by_desc(registration::Column::RegistrationId)
            .limit(RECENT_REGISTRATION_LIMIT)
            .find_also_related(event::Entity)
            .all(db)
            .await?;

        let student_ids: Vec<i64> = recent.iter().map(|(reg, _)| reg.student_id).collect();
        let student_names: HashMap<i64, String> = user::Entity::find()
            .filter(user::Column::UserId.is_in(student_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|u| (u.user_id, u.full_name))
            .collect();

        let recent_registrations = recent
            .into_iter()
            .map(|(reg, ev)| RecentRegistrationItem {
                registration_id: reg.registration_id,
                event_id: reg.event_id,
                event_title: ev.map(|ev| ev.title).unwrap_or_default(),
                student_id: reg.student_id,
                student_name: student_names
                    .get(&reg.student_id)
                    .cloned()
                    .unwrap_or_default(),
                status: reg.status,
                registered_at: reg.registered_at,
            })
            .collect();

        state
            .audit
            .record(
                db,
                actor,
                AuditEntry::new(
                    AuditAction::View,
                    entity_type::DASHBOARD,
                    0,
                    "Viewed admin dashboard",
                ),
            )
            .await;

        Ok(DashboardResponse {
            stats: DashboardStats {
                total_events,
                active_events,
                total_registrations,
                pending_approvals,
                total_students,
                total_faculty,
                total_departments,
                total_revenue,
            },
            upcoming_events,
            recent_registrations,
            registrations_by_status,
        })
    }
}
