use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use crate::domain::audit::entity::audit_log::AuditAction;
use crate::domain::audit::logger::{entity_type, AuditEntry};
use crate::domain::notification::{cancellation_notice, deliver};
use crate::domain::registration::entity::{attendance, event_feedback, registration};
use crate::domain::registration::entity::registration::RegistrationStatus;
use crate::domain::user::entity::department;
use crate::domain::user::entity::user::{self, UserRole};
use crate::domain::venue::entity::venue::{self, AvailabilityStatus};
use crate::state::AppState;
use crate::utils::auth::Actor;
use crate::utils::error::{is_unique_violation, AppError};

use super::dto::{
    AddCoordinatorRequest, AddResourceRequest, CancelEventResponse, CoordinatorResponse,
    CreateEventRequest, DeleteEventResponse, EventListQuery, EventListResponse, EventResponse,
    ResourceResponse, UpdateEventRequest,
};
use super::entity::event::{self, EventStatus};
use super::entity::event_resource::{self, ResourceStatus};
use super::entity::event_coordinator;
use super::lifecycle::{self, LifecycleAction, REGISTRATION_OPEN_STATUSES};

const DEFAULT_COORDINATOR_ROLE: &str = "Coordinator";

pub struct EventService;

impl EventService {
    /// 행사 생성 (draft 상태로 시작)
    pub async fn create_event(
        state: &AppState,
        actor: &Actor,
        req: CreateEventRequest,
    ) -> Result<EventResponse, AppError> {
        if req.end_time <= req.start_time {
            return Err(AppError::invalid_field(
                "endTime",
                "종료 시간은 시작 시간보다 늦어야 합니다.",
            ));
        }

        let registration_fee = req.registration_fee.unwrap_or(Decimal::ZERO);
        if registration_fee.is_sign_negative() {
            return Err(AppError::invalid_field(
                "registrationFee",
                "참가비는 0 이상이어야 합니다.",
            ));
        }

        if let Some(venue_id) = req.venue_id {
            Self::check_venue(&state.db, venue_id, req.max_capacity).await?;
        }

        let department_id = match req.department_id {
            Some(id) => Some(Self::find_department(&state.db, id).await?.department_id),
            None => user::Entity::find_by_id(actor.user_id)
                .one(&state.db)
                .await?
                .and_then(|creator| creator.department_id),
        };

        let now = Utc::now().naive_utc();
        let saved = event::ActiveModel {
            title: Set(req.title),
            description: Set(req.description),
            event_date: Set(req.event_date),
            start_time: Set(req.start_time),
            end_time: Set(req.end_time),
            venue_id: Set(req.venue_id),
            department_id: Set(department_id),
            created_by: Set(Some(actor.user_id)),
            max_capacity: Set(req.max_capacity),
            registered_count: Set(0),
            event_type: Set(req.event_type),
            status: Set(EventStatus::Draft),
            registration_fee: Set(registration_fee),
            registration_deadline: Set(req.registration_deadline),
            poster_image: Set(req.poster_image),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&state.db)
        .await?;

        info!(event_id = saved.event_id, created_by = actor.user_id, "event created");

        state
            .audit
            .record(
                &state.db,
                actor,
                AuditEntry::new(
                    AuditAction::Create,
                    entity_type::EVENT,
                    saved.event_id,
                    format!("Created event '{}'", saved.title),
                ),
            )
            .await;

        Ok(saved.into())
    }

    /// 행사 수정
    ///
    /// 주최자는 본인이 만든 draft 행사만 수정할 수 있습니다.
    /// 정원 변경은 현재 신청 인원 이상일 때만 반영되며, 조건부 UPDATE 한 번으로 처리합니다.
    pub async fn update_event(
        state: &AppState,
        actor: &Actor,
        event_id: i64,
        req: UpdateEventRequest,
    ) -> Result<EventResponse, AppError> {
        let existing = Self::find_event(&state.db, event_id).await?;

        if lifecycle::is_terminal(existing.status) {
            return Err(AppError::PreconditionFailed(format!(
                "{} 상태의 행사는 수정할 수 없습니다.",
                lifecycle::status_label(existing.status)
            )));
        }

        if actor.role == UserRole::Organizer {
            if existing.created_by != Some(actor.user_id) {
                return Err(AppError::forbidden("본인이 등록한 행사만 수정할 수 있습니다."));
            }
            if existing.status != EventStatus::Draft {
                return Err(AppError::PreconditionFailed(
                    "주최자는 draft 상태의 행사만 수정할 수 있습니다.".to_string(),
                ));
            }
        }

        let start_time = req.start_time.unwrap_or(existing.start_time);
        let end_time = req.end_time.unwrap_or(existing.end_time);
        if end_time <= start_time {
            return Err(AppError::invalid_field(
                "endTime",
                "종료 시간은 시작 시간보다 늦어야 합니다.",
            ));
        }

        if let Some(fee) = req.registration_fee {
            if fee.is_sign_negative() {
                return Err(AppError::invalid_field(
                    "registrationFee",
                    "참가비는 0 이상이어야 합니다.",
                ));
            }
        }

        let capacity = req.max_capacity.unwrap_or(existing.max_capacity);
        if let Some(venue_id) = req.venue_id.or(existing.venue_id) {
            if req.venue_id.is_some() || req.max_capacity.is_some() {
                Self::check_venue(&state.db, venue_id, capacity).await?;
            }
        }

        let mut changes = event::ActiveModel {
            updated_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };
        if let Some(title) = req.title {
            changes.title = Set(title);
        }
        if let Some(description) = req.description {
            changes.description = Set(description);
        }
        if let Some(event_date) = req.event_date {
            changes.event_date = Set(event_date);
        }
        if req.start_time.is_some() {
            changes.start_time = Set(start_time);
        }
        if req.end_time.is_some() {
            changes.end_time = Set(end_time);
        }
        if let Some(venue_id) = req.venue_id {
            changes.venue_id = Set(Some(venue_id));
        }
        if let Some(max_capacity) = req.max_capacity {
            changes.max_capacity = Set(max_capacity);
        }
        if let Some(event_type) = req.event_type {
            changes.event_type = Set(event_type);
        }
        if let Some(fee) = req.registration_fee {
            changes.registration_fee = Set(fee);
        }
        if let Some(deadline) = req.registration_deadline {
            changes.registration_deadline = Set(Some(deadline));
        }
        if let Some(poster_image) = req.poster_image {
            changes.poster_image = Set(Some(poster_image));
        }

        let mut update = event::Entity::update_many()
            .set(changes)
            .filter(event::Column::EventId.eq(event_id));
        if let Some(max_capacity) = req.max_capacity {
            update = update.filter(event::Column::RegisteredCount.lte(max_capacity));
        }

        let result = update.exec(&state.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::PreconditionFailed(
                "정원은 현재 신청 인원보다 적을 수 없습니다.".to_string(),
            ));
        }

        let updated = Self::find_event(&state.db, event_id).await?;

        state
            .audit
            .record(
                &state.db,
                actor,
                AuditEntry::new(
                    AuditAction::Update,
                    entity_type::EVENT,
                    event_id,
                    format!("Updated event '{}'", updated.title),
                ),
            )
            .await;

        Ok(updated.into())
    }

    /// 행사 삭제
    ///
    /// 좌석을 가진 신청자에게 안내 메일을 보내고 하위 데이터를 함께 삭제합니다.
    pub async fn delete_event(
        state: &AppState,
        actor: &Actor,
        event_id: i64,
    ) -> Result<DeleteEventResponse, AppError> {
        let txn = state.db.begin().await?;

        let existing = Self::find_event(&txn, event_id).await?;

        let registrations = registration::Entity::find()
            .filter(registration::Column::EventId.eq(event_id))
            .find_also_related(user::Entity)
            .all(&txn)
            .await?;
        let registrations_affected = registrations.len() as u64;

        attendance::Entity::delete_many()
            .filter(attendance::Column::EventId.eq(event_id))
            .exec(&txn)
            .await?;
        event_feedback::Entity::delete_many()
            .filter(event_feedback::Column::EventId.eq(event_id))
            .exec(&txn)
            .await?;
        event_coordinator::Entity::delete_many()
            .filter(event_coordinator::Column::EventId.eq(event_id))
            .exec(&txn)
            .await?;
        event_resource::Entity::delete_many()
            .filter(event_resource::Column::EventId.eq(event_id))
            .exec(&txn)
            .await?;
        registration::Entity::delete_many()
            .filter(registration::Column::EventId.eq(event_id))
            .exec(&txn)
            .await?;
        event::Entity::delete_by_id(event_id).exec(&txn).await?;

        txn.commit().await?;

        info!(event_id, registrations_affected, "event deleted");

        if !lifecycle::is_terminal(existing.status) {
            for (reg, student) in registrations {
                if !reg.status.holds_seat() {
                    continue;
                }
                if let Some(student) = student {
                    deliver(
                        state.notifier.as_ref(),
                        cancellation_notice(&existing, &student),
                    )
                    .await;
                }
            }
        }

        state
            .audit
            .record(
                &state.db,
                actor,
                AuditEntry::new(
                    AuditAction::Delete,
                    entity_type::EVENT,
                    event_id,
                    format!(
                        "Deleted event '{}' (had {} registrations)",
                        existing.title, registrations_affected
                    ),
                ),
            )
            .await;

        Ok(DeleteEventResponse {
            event_id,
            registrations_affected,
        })
    }

    /// 행사 단건 조회
    ///
    /// 운영진이 아니면 신청 가능한 상태의 행사만 보입니다.
    pub async fn get_event(
        state: &AppState,
        viewer: Option<&Actor>,
        event_id: i64,
    ) -> Result<EventResponse, AppError> {
        let found = Self::find_event(&state.db, event_id).await?;

        if !Self::is_staff(viewer) && !REGISTRATION_OPEN_STATUSES.contains(&found.status) {
            return Err(AppError::EventNotFound(
                "존재하지 않는 행사입니다.".to_string(),
            ));
        }

        Ok(found.into())
    }

    /// 행사 목록 조회 (행사일 오름차순)
    pub async fn list_events(
        state: &AppState,
        viewer: Option<&Actor>,
        query: EventListQuery,
    ) -> Result<EventListResponse, AppError> {
        let mut select = event::Entity::find();

        if !Self::is_staff(viewer) {
            select = select.filter(event::Column::Status.is_in(REGISTRATION_OPEN_STATUSES));
        }
        if let Some(status) = query.status {
            select = select.filter(event::Column::Status.eq(status));
        }
        if let Some(department_id) = query.department_id {
            select = select.filter(event::Column::DepartmentId.eq(department_id));
        }

        let page = query.page();
        let size = query.size();
        let paginator = select
            .order_by_asc(event::Column::EventDate)
            .order_by_asc(event::Column::StartTime)
            .order_by_asc(event::Column::EventId)
            .paginate(&state.db, size);

        let total = paginator.num_items().await?;
        let events = paginator
            .fetch_page(page - 1)
            .await?
            .into_iter()
            .map(EventResponse::from)
            .collect();

        Ok(EventListResponse {
            events,
            page,
            size,
            total,
        })
    }

    /// draft → published
    pub async fn publish_event(
        state: &AppState,
        actor: &Actor,
        event_id: i64,
    ) -> Result<EventResponse, AppError> {
        let updated = Self::apply_transition(state, event_id, LifecycleAction::Publish).await?;

        state
            .audit
            .record(
                &state.db,
                actor,
                AuditEntry::new(
                    AuditAction::Approve,
                    entity_type::EVENT,
                    event_id,
                    format!("Published event '{}'", updated.title),
                ),
            )
            .await;

        Ok(updated.into())
    }

    /// published → ongoing
    pub async fn start_event(
        state: &AppState,
        actor: &Actor,
        event_id: i64,
    ) -> Result<EventResponse, AppError> {
        let updated = Self::apply_transition(state, event_id, LifecycleAction::Start).await?;

        state
            .audit
            .record(
                &state.db,
                actor,
                AuditEntry::new(
                    AuditAction::Update,
                    entity_type::EVENT,
                    event_id,
                    format!("Started event '{}'", updated.title),
                ),
            )
            .await;

        Ok(updated.into())
    }

    /// ongoing → completed
    pub async fn complete_event(
        state: &AppState,
        actor: &Actor,
        event_id: i64,
    ) -> Result<EventResponse, AppError> {
        let updated = Self::apply_transition(state, event_id, LifecycleAction::Complete).await?;

        state
            .audit
            .record(
                &state.db,
                actor,
                AuditEntry::new(
                    AuditAction::Update,
                    entity_type::EVENT,
                    event_id,
                    format!("Completed event '{}'", updated.title),
                ),
            )
            .await;

        Ok(updated.into())
    }

    /// 행사 취소
    ///
    /// 확정된 신청자 전원에게 취소 안내를 보냅니다. 개별 발송 실패는 결과에 영향을 주지 않습니다.
    pub async fn cancel_event(
        state: &AppState,
        actor: &Actor,
        event_id: i64,
    ) -> Result<CancelEventResponse, AppError> {
        let updated = Self::apply_transition(state, event_id, LifecycleAction::Cancel).await?;

        let confirmed = registration::Entity::find()
            .filter(registration::Column::EventId.eq(event_id))
            .filter(registration::Column::Status.eq(RegistrationStatus::Confirmed))
            .find_also_related(user::Entity)
            .all(&state.db)
            .await?;

        let mut notifications_sent = 0u64;
        for student in confirmed.into_iter().filter_map(|(_, student)| student) {
            deliver(
                state.notifier.as_ref(),
                cancellation_notice(&updated, &student),
            )
            .await;
            notifications_sent += 1;
        }

        info!(event_id, notifications_sent, "event cancelled");

        state
            .audit
            .record(
                &state.db,
                actor,
                AuditEntry::new(
                    AuditAction::Reject,
                    entity_type::EVENT,
                    event_id,
                    format!(
                        "Cancelled event '{}' ({} registrants notified)",
                        updated.title, notifications_sent
                    ),
                ),
            )
            .await;

        Ok(CancelEventResponse {
            event: updated.into(),
            notifications_sent,
        })
    }

    /// 담당 교수 지정 (교수 역할만 가능, 중복 불가)
    pub async fn add_coordinator(
        state: &AppState,
        actor: &Actor,
        event_id: i64,
        req: AddCoordinatorRequest,
    ) -> Result<CoordinatorResponse, AppError> {
        Self::find_event(&state.db, event_id).await?;

        let faculty = user::Entity::find_by_id(req.faculty_id)
            .one(&state.db)
            .await?
            .filter(|u| u.role == UserRole::Faculty)
            .ok_or_else(|| AppError::UserNotFound("존재하지 않는 교수입니다.".to_string()))?;

        let duplicate = event_coordinator::Entity::find()
            .filter(event_coordinator::Column::EventId.eq(event_id))
            .filter(event_coordinator::Column::FacultyId.eq(faculty.user_id))
            .one(&state.db)
            .await?;
        if duplicate.is_some() {
            return Err(AppError::PreconditionFailed(
                "이미 지정된 담당 교수입니다.".to_string(),
            ));
        }

        let saved = event_coordinator::ActiveModel {
            event_id: Set(event_id),
            faculty_id: Set(faculty.user_id),
            role: Set(req
                .role
                .unwrap_or_else(|| DEFAULT_COORDINATOR_ROLE.to_string())),
            assigned_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(&state.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::PreconditionFailed("이미 지정된 담당 교수입니다.".to_string())
            } else {
                e.into()
            }
        })?;

        state
            .audit
            .record(
                &state.db,
                actor,
                AuditEntry::new(
                    AuditAction::Update,
                    entity_type::EVENT,
                    event_id,
                    format!("Assigned {} as coordinator", faculty.full_name),
                ),
            )
            .await;

        Ok(saved.into())
    }

    pub async fn list_coordinators(
        state: &AppState,
        event_id: i64,
    ) -> Result<Vec<CoordinatorResponse>, AppError> {
        Self::find_event(&state.db, event_id).await?;

        let coordinators = event_coordinator::Entity::find()
            .filter(event_coordinator::Column::EventId.eq(event_id))
            .order_by_asc(event_coordinator::Column::AssignedAt)
            .all(&state.db)
            .await?;

        Ok(coordinators.into_iter().map(Into::into).collect())
    }

    /// 행사 자원 등록
    pub async fn add_resource(
        state: &AppState,
        actor: &Actor,
        event_id: i64,
        req: AddResourceRequest,
    ) -> Result<ResourceResponse, AppError> {
        Self::find_event(&state.db, event_id).await?;

        let cost = req.cost.unwrap_or(Decimal::ZERO);
        if cost.is_sign_negative() {
            return Err(AppError::invalid_field("cost", "비용은 0 이상이어야 합니다."));
        }

        let now = Utc::now().naive_utc();
        let saved = event_resource::ActiveModel {
            event_id: Set(event_id),
            resource_type: Set(req.resource_type),
            name: Set(req.name),
            quantity: Set(req.quantity),
            status: Set(req.status.unwrap_or(ResourceStatus::Available)),
            cost: Set(cost),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&state.db)
        .await?;

        state
            .audit
            .record(
                &state.db,
                actor,
                AuditEntry::new(
                    AuditAction::Create,
                    entity_type::EVENT,
                    event_id,
                    format!("Added resource '{}' x{}", saved.name, saved.quantity),
                ),
            )
            .await;

        Ok(saved.into())
    }

    pub async fn list_resources(
        state: &AppState,
        event_id: i64,
    ) -> Result<Vec<ResourceResponse>, AppError> {
        Self::find_event(&state.db, event_id).await?;

        let resources = event_resource::Entity::find()
            .filter(event_resource::Column::EventId.eq(event_id))
            .order_by_asc(event_resource::Column::EventResourceId)
            .all(&state.db)
            .await?;

        Ok(resources.into_iter().map(Into::into).collect())
    }

    fn is_staff(viewer: Option<&Actor>) -> bool {
        viewer.is_some_and(|actor| actor.role.is_staff())
    }

    pub(crate) async fn find_event<C>(db: &C, event_id: i64) -> Result<event::Model, AppError>
    where
        C: ConnectionTrait,
    {
        event::Entity::find_by_id(event_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::EventNotFound("존재하지 않는 행사입니다.".to_string()))
    }

    /// 상태 전이를 검증하고 현재 상태가 그대로일 때만 반영합니다.
    async fn apply_transition(
        state: &AppState,
        event_id: i64,
        action: LifecycleAction,
    ) -> Result<event::Model, AppError> {
        let current = Self::find_event(&state.db, event_id).await?;
        let next = lifecycle::transition(current.status, action)?;

        let result = event::Entity::update_many()
            .col_expr(event::Column::Status, Expr::value(next))
            .col_expr(
                event::Column::UpdatedAt,
                Expr::value(Utc::now().naive_utc()),
            )
            .filter(event::Column::EventId.eq(event_id))
            .filter(event::Column::Status.eq(current.status))
            .exec(&state.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::InvalidStatusTransition(
                "다른 요청에 의해 행사 상태가 변경되었습니다.".to_string(),
            ));
        }

        info!(
            event_id,
            from = lifecycle::status_label(current.status),
            to = lifecycle::status_label(next),
            "event status changed"
        );

        Self::find_event(&state.db, event_id).await
    }

    async fn check_venue<C>(db: &C, venue_id: i64, max_capacity: i32) -> Result<(), AppError>
    where
        C: ConnectionTrait,
    {
        let found = venue::Entity::find_by_id(venue_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::VenueNotFound("존재하지 않는 장소입니다.".to_string()))?;

        if found.availability_status == AvailabilityStatus::Maintenance {
            return Err(AppError::PreconditionFailed(format!(
                "'{}' 장소는 점검 중입니다.",
                found.name
            )));
        }

        if max_capacity > found.capacity {
            return Err(AppError::invalid_field(
                "maxCapacity",
                format!("정원이 장소 수용 인원({})을 초과합니다.", found.capacity),
            ));
        }

        Ok(())
    }

    async fn find_department<C>(db: &C, department_id: i64) -> Result<department::Model, AppError>
    where
        C: ConnectionTrait,
    {
        department::Entity::find_by_id(department_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::DepartmentNotFound("존재하지 않는 학과입니다.".to_string()))
    }
}
