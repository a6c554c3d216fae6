use std::collections::HashMap;

use chrono::Utc;
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use crate::domain::audit::entity::audit_log::AuditAction;
use crate::domain::audit::logger::{entity_type, AuditEntry};
use crate::domain::event::entity::event;
use crate::domain::event::lifecycle::{self, REGISTRATION_OPEN_STATUSES, TERMINAL_STATUSES};
use crate::domain::event::service::EventService;
use crate::domain::notification::{deliver, rejection_notice};
use crate::domain::user::entity::department;
use crate::domain::user::entity::user::{self, UserRole};
use crate::state::AppState;
use crate::utils::auth::Actor;
use crate::utils::error::{is_unique_violation, AppError};

use super::dto::{
    ApproveRegistrationsRequest, ApproveRegistrationsResponse, AttendanceResponse,
    EventRegistrationItem, FeedbackListResponse, FeedbackResponse, MarkAttendanceRequest,
    MyRegistrationItem, RegistrationListQuery, RegistrationResponse, RejectRegistrationsRequest,
    RejectRegistrationsResponse, SubmitFeedbackRequest,
};
use super::entity::attendance;
use super::entity::event_feedback;
use super::entity::registration::{self, PaymentStatus, RegistrationStatus};
use super::export::{self, CsvExport};

pub struct RegistrationService;

impl RegistrationService {
    /// 학생 본인 참가 신청 (pending)
    pub async fn register(
        state: &AppState,
        actor: &Actor,
        event_id: i64,
    ) -> Result<RegistrationResponse, AppError> {
        let saved =
            Self::claim_seat(state, event_id, actor.user_id, RegistrationStatus::Pending).await?;

        info!(
            event_id,
            student_id = actor.user_id,
            registration_id = saved.registration_id,
            "registration created"
        );

        Ok(saved.into())
    }

    /// 관리자 수동 등록 (confirmed)
    pub async fn add_manual_registration(
        state: &AppState,
        actor: &Actor,
        event_id: i64,
        student_id: i64,
    ) -> Result<RegistrationResponse, AppError> {
        let student = Self::find_student(state, student_id).await?;

        let saved =
            Self::claim_seat(state, event_id, student.user_id, RegistrationStatus::Confirmed)
                .await?;

        state
            .audit
            .record(
                &state.db,
                actor,
                AuditEntry::new(
                    AuditAction::Create,
                    entity_type::REGISTRATION,
                    saved.registration_id,
                    format!(
                        "Manually registered {} for event {}",
                        student.full_name, event_id
                    ),
                ),
            )
            .await;

        Ok(saved.into())
    }

    /// 좌석 확보와 신청 생성을 하나의 트랜잭션으로 처리합니다.
    ///
    /// 검사 순서: 중복 신청 → 신청 가능 상태/마감일 → 정원.
    /// 정원 검사와 증가는 조건부 UPDATE 한 번으로 수행되므로 동시 요청에도 정원을 넘지 않습니다.
    async fn claim_seat(
        state: &AppState,
        event_id: i64,
        student_id: i64,
        status: RegistrationStatus,
    ) -> Result<registration::Model, AppError> {
        let txn = state.db.begin().await?;

        let duplicate = registration::Entity::find()
            .filter(registration::Column::EventId.eq(event_id))
            .filter(registration::Column::StudentId.eq(student_id))
            .one(&txn)
            .await?;
        if duplicate.is_some() {
            return Err(Self::already_registered());
        }

        let target = EventService::find_event(&txn, event_id).await?;
        lifecycle::ensure_registration_open(&target, Utc::now().date_naive())?;

        Self::increment_registered_count(&txn, event_id).await?;

        let now = Utc::now().naive_utc();
        let saved = registration::ActiveModel {
            event_id: Set(event_id),
            student_id: Set(student_id),
            status: Set(status),
            payment_status: Set(PaymentStatus::Pending),
            transaction_id: Set(None),
            registered_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Self::already_registered()
            } else {
                e.into()
            }
        })?;

        txn.commit().await?;

        Ok(saved)
    }

    /// `registered_count < max_capacity` 이고 신청 가능 상태일 때만 1 증가시킵니다.
    async fn increment_registered_count<C>(db: &C, event_id: i64) -> Result<(), AppError>
    where
        C: ConnectionTrait,
    {
        let result = event::Entity::update_many()
            .col_expr(
                event::Column::RegisteredCount,
                Expr::col(event::Column::RegisteredCount).add(1),
            )
            .col_expr(event::Column::UpdatedAt, Expr::value(Utc::now().naive_utc()))
            .filter(event::Column::EventId.eq(event_id))
            .filter(
                Expr::col(event::Column::RegisteredCount)
                    .lt(Expr::col(event::Column::MaxCapacity)),
            )
            .filter(event::Column::Status.is_in(REGISTRATION_OPEN_STATUSES))
            .exec(db)
            .await?;

        if result.rows_affected == 1 {
            return Ok(());
        }

        // 조건 불일치: 그 사이 상태가 바뀌었는지 다시 확인
        let current = EventService::find_event(db, event_id).await?;
        lifecycle::ensure_registration_open(&current, Utc::now().date_naive())?;

        Err(AppError::EventFull("행사 정원이 가득 찼습니다.".to_string()))
    }

    async fn decrement_registered_count(
        txn: &DatabaseTransaction,
        event_id: i64,
        by: i32,
    ) -> Result<(), AppError> {
        if by == 0 {
            return Ok(());
        }

        event::Entity::update_many()
            .col_expr(
                event::Column::RegisteredCount,
                Expr::col(event::Column::RegisteredCount).sub(by),
            )
            .col_expr(event::Column::UpdatedAt, Expr::value(Utc::now().naive_utc()))
            .filter(event::Column::EventId.eq(event_id))
            .filter(event::Column::RegisteredCount.gte(by))
            .exec(txn)
            .await?;

        Ok(())
    }

    /// 일괄 승인 (pending → confirmed). pending이 아닌 신청은 건너뜁니다.
    ///
    /// 종료된(completed, cancelled) 행사의 신청은 승인할 수 없습니다.
    pub async fn approve(
        state: &AppState,
        actor: &Actor,
        event_id: i64,
        req: ApproveRegistrationsRequest,
    ) -> Result<ApproveRegistrationsResponse, AppError> {
        let txn = state.db.begin().await?;

        let target = EventService::find_event(&txn, event_id).await?;
        lifecycle::ensure_not_terminal(&target)?;

        // 조회 이후 행사가 취소돼도 확정되지 않도록 행사 상태를 UPDATE 조건에 포함
        let active_event = Query::select()
            .column(event::Column::EventId)
            .from(event::Entity)
            .and_where(event::Column::EventId.eq(event_id))
            .and_where(event::Column::Status.is_not_in(TERMINAL_STATUSES))
            .to_owned();

        let result = registration::Entity::update_many()
            .col_expr(
                registration::Column::Status,
                Expr::value(RegistrationStatus::Confirmed),
            )
            .col_expr(
                registration::Column::UpdatedAt,
                Expr::value(Utc::now().naive_utc()),
            )
            .filter(registration::Column::EventId.in_subquery(active_event))
            .filter(registration::Column::RegistrationId.is_in(req.registration_ids))
            .filter(registration::Column::Status.eq(RegistrationStatus::Pending))
            .exec(&txn)
            .await?;

        txn.commit().await?;

        let approved_count = result.rows_affected;
        info!(event_id, approved_count, "registrations approved");

        state
            .audit
            .record(
                &state.db,
                actor,
                AuditEntry::new(
                    AuditAction::Approve,
                    entity_type::REGISTRATION,
                    event_id,
                    format!(
                        "Approved {} registrations for {}",
                        approved_count, target.title
                    ),
                ),
            )
            .await;

        Ok(ApproveRegistrationsResponse { approved_count })
    }

    /// 일괄 반려 (pending → cancelled). 종료된 행사에는 적용할 수 없습니다.
    ///
    /// 반려된 신청의 좌석을 반환하고 학생마다 안내 메일을 한 통씩 보냅니다.
    pub async fn reject(
        state: &AppState,
        actor: &Actor,
        event_id: i64,
        req: RejectRegistrationsRequest,
    ) -> Result<RejectRegistrationsResponse, AppError> {
        let reason = req.reason().to_string();
        let txn = state.db.begin().await?;

        let target = EventService::find_event(&txn, event_id).await?;
        lifecycle::ensure_not_terminal(&target)?;

        let candidates = registration::Entity::find()
            .filter(registration::Column::EventId.eq(event_id))
            .filter(registration::Column::RegistrationId.is_in(req.registration_ids))
            .filter(registration::Column::Status.eq(RegistrationStatus::Pending))
            .find_also_related(user::Entity)
            .all(&txn)
            .await?;

        let now = Utc::now().naive_utc();
        let mut rejected = Vec::with_capacity(candidates.len());
        for (reg, student) in candidates {
            let result = registration::Entity::update_many()
                .col_expr(
                    registration::Column::Status,
                    Expr::value(RegistrationStatus::Cancelled),
                )
                .col_expr(registration::Column::UpdatedAt, Expr::value(now))
                .filter(registration::Column::RegistrationId.eq(reg.registration_id))
                .filter(registration::Column::Status.eq(RegistrationStatus::Pending))
                .exec(&txn)
                .await?;

            if result.rows_affected == 1 {
                rejected.push(student);
            }
        }

        Self::decrement_registered_count(&txn, event_id, rejected.len() as i32).await?;
        txn.commit().await?;

        let rejected_count = rejected.len() as u64;
        info!(event_id, rejected_count, "registrations rejected");

        for student in rejected.into_iter().flatten() {
            deliver(
                state.notifier.as_ref(),
                rejection_notice(&target, &student, &reason),
            )
            .await;
        }

        state
            .audit
            .record(
                &state.db,
                actor,
                AuditEntry::new(
                    AuditAction::Reject,
                    entity_type::REGISTRATION,
                    event_id,
                    format!(
                        "Rejected {} registrations for {}: {}",
                        rejected_count, target.title, reason
                    ),
                ),
            )
            .await;

        Ok(RejectRegistrationsResponse { rejected_count })
    }

    /// 학생 본인 신청 취소. 좌석을 반환합니다.
    pub async fn cancel_registration(
        state: &AppState,
        actor: &Actor,
        registration_id: i64,
    ) -> Result<RegistrationResponse, AppError> {
        let txn = state.db.begin().await?;

        let found = registration::Entity::find_by_id(registration_id)
            .one(&txn)
            .await?
            .filter(|r| r.student_id == actor.user_id)
            .ok_or_else(|| {
                AppError::RegistrationNotFound("존재하지 않는 신청입니다.".to_string())
            })?;

        if !found.status.holds_seat() {
            return Err(AppError::PreconditionFailed(format!(
                "{} 상태의 신청은 취소할 수 없습니다.",
                found.status.as_str()
            )));
        }

        let target = EventService::find_event(&txn, found.event_id).await?;
        if lifecycle::is_terminal(target.status) {
            return Err(AppError::PreconditionFailed(
                "종료되었거나 취소된 행사의 신청은 취소할 수 없습니다.".to_string(),
            ));
        }

        let result = registration::Entity::update_many()
            .col_expr(
                registration::Column::Status,
                Expr::value(RegistrationStatus::Cancelled),
            )
            .col_expr(
                registration::Column::UpdatedAt,
                Expr::value(Utc::now().naive_utc()),
            )
            .filter(registration::Column::RegistrationId.eq(registration_id))
            .filter(registration::Column::Status.is_in([
                RegistrationStatus::Pending,
                RegistrationStatus::Confirmed,
            ]))
            .exec(&txn)
            .await?;

        if result.rows_affected == 1 {
            Self::decrement_registered_count(&txn, found.event_id, 1).await?;
        }

        let updated = registration::Entity::find_by_id(registration_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                AppError::RegistrationNotFound("존재하지 않는 신청입니다.".to_string())
            })?;

        txn.commit().await?;

        info!(
            registration_id,
            event_id = found.event_id,
            "registration cancelled by student"
        );

        Ok(updated.into())
    }

    /// 내 신청 내역 (최근 신청순)
    pub async fn my_registrations(
        state: &AppState,
        actor: &Actor,
    ) -> Result<Vec<MyRegistrationItem>, AppError> {
        let rows = registration::Entity::find()
            .filter(registration::Column::StudentId.eq(actor.user_id))
            .order_by_desc(registration::Column::RegisteredAt)
            .find_also_related(event::Entity)
            .all(&state.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(reg, ev)| ev.map(|ev| MyRegistrationItem::new(reg, &ev)))
            .collect())
    }

    /// 행사별 신청자 목록 (신청순)
    pub async fn list_event_registrations(
        state: &AppState,
        event_id: i64,
        query: RegistrationListQuery,
    ) -> Result<Vec<EventRegistrationItem>, AppError> {
        EventService::find_event(&state.db, event_id).await?;

        let mut select =
            registration::Entity::find().filter(registration::Column::EventId.eq(event_id));
        if let Some(status) = query.status {
            select = select.filter(registration::Column::Status.eq(status));
        }

        let rows = select
            .order_by_asc(registration::Column::RegisteredAt)
            .order_by_asc(registration::Column::RegistrationId)
            .find_also_related(user::Entity)
            .all(&state.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(reg, student)| {
                student.map(|student| EventRegistrationItem::new(reg, &student))
            })
            .collect())
    }

    /// 출석 체크
    ///
    /// 이미 출석 기록이 있으면 체크인 시각만 갱신합니다. 반복 호출해도 한 건만 유지됩니다.
    pub async fn mark_attendance(
        state: &AppState,
        actor: &Actor,
        event_id: i64,
        req: MarkAttendanceRequest,
    ) -> Result<AttendanceResponse, AppError> {
        let target = EventService::find_event(&state.db, event_id).await?;
        let student = Self::find_student(state, req.student_id).await?;

        let saved = match Self::find_attendance(state, event_id, student.user_id).await? {
            Some(existing) => Self::refresh_check_in(state, existing).await?,
            None => {
                let inserted = attendance::ActiveModel {
                    event_id: Set(event_id),
                    student_id: Set(student.user_id),
                    check_in_time: Set(Utc::now().naive_utc()),
                    check_out_time: Set(None),
                    verification_method: Set(req.verification_method),
                    ..Default::default()
                }
                .insert(&state.db)
                .await;

                match inserted {
                    Ok(model) => model,
                    Err(e) if is_unique_violation(&e) => {
                        // 동시 요청이 먼저 생성한 경우
                        let existing = Self::find_attendance(state, event_id, student.user_id)
                            .await?
                            .ok_or_else(|| AppError::internal_error(e.to_string()))?;
                        Self::refresh_check_in(state, existing).await?
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        };

        state
            .audit
            .record(
                &state.db,
                actor,
                AuditEntry::new(
                    AuditAction::Update,
                    entity_type::ATTENDANCE,
                    saved.attendance_id,
                    format!(
                        "Marked attendance for {} at {}",
                        student.full_name, target.title
                    ),
                ),
            )
            .await;

        Ok(saved.into())
    }

    pub async fn list_attendance(
        state: &AppState,
        event_id: i64,
    ) -> Result<Vec<AttendanceResponse>, AppError> {
        EventService::find_event(&state.db, event_id).await?;

        let rows = attendance::Entity::find()
            .filter(attendance::Column::EventId.eq(event_id))
            .order_by_asc(attendance::Column::CheckInTime)
            .all(&state.db)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// 행사 피드백 제출 (출석한 학생만, 1회)
    pub async fn submit_feedback(
        state: &AppState,
        actor: &Actor,
        event_id: i64,
        req: SubmitFeedbackRequest,
    ) -> Result<FeedbackResponse, AppError> {
        EventService::find_event(&state.db, event_id).await?;

        if Self::find_attendance(state, event_id, actor.user_id)
            .await?
            .is_none()
        {
            return Err(AppError::PreconditionFailed(
                "출석한 행사에만 피드백을 남길 수 있습니다.".to_string(),
            ));
        }

        let now = Utc::now().naive_utc();
        let saved = event_feedback::ActiveModel {
            event_id: Set(event_id),
            student_id: Set(actor.user_id),
            rating: Set(req.rating),
            comments: Set(req.comments),
            submitted_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&state.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::PreconditionFailed("이미 피드백을 제출했습니다.".to_string())
            } else {
                e.into()
            }
        })?;

        Ok(saved.into())
    }

    pub async fn list_feedback(
        state: &AppState,
        event_id: i64,
    ) -> Result<FeedbackListResponse, AppError> {
        EventService::find_event(&state.db, event_id).await?;

        let rows = event_feedback::Entity::find()
            .filter(event_feedback::Column::EventId.eq(event_id))
            .order_by_desc(event_feedback::Column::SubmittedAt)
            .all(&state.db)
            .await?;

        let total = rows.len();
        let average_rating = if total == 0 {
            None
        } else {
            let sum: i64 = rows.iter().map(|f| i64::from(f.rating)).sum();
            Some(sum as f64 / total as f64)
        };

        Ok(FeedbackListResponse {
            event_id,
            average_rating,
            total,
            feedback: rows.into_iter().map(Into::into).collect(),
        })
    }

    /// 신청자 명단 CSV 내보내기
    pub async fn export_registrations(
        state: &AppState,
        actor: &Actor,
        event_id: i64,
    ) -> Result<CsvExport, AppError> {
        let target = EventService::find_event(&state.db, event_id).await?;

        let rows = registration::Entity::find()
            .filter(registration::Column::EventId.eq(event_id))
            .order_by_asc(registration::Column::RegisteredAt)
            .order_by_asc(registration::Column::RegistrationId)
            .find_also_related(user::Entity)
            .all(&state.db)
            .await?;

        let departments: HashMap<i64, department::Model> = department::Entity::find()
            .all(&state.db)
            .await?
            .into_iter()
            .map(|d| (d.department_id, d))
            .collect();

        let row_count = rows.len();
        let csv = export::write_registrations(&target, rows, &departments)?;

        state
            .audit
            .record(
                &state.db,
                actor,
                AuditEntry::new(
                    AuditAction::View,
                    entity_type::REGISTRATION,
                    event_id,
                    format!(
                        "Exported {} registrations for {}",
                        row_count, target.title
                    ),
                ),
            )
            .await;

        Ok(csv)
    }

    async fn find_student(state: &AppState, student_id: i64) -> Result<user::Model, AppError> {
        user::Entity::find_by_id(student_id)
            .one(&state.db)
            .await?
            .filter(|u| u.role == UserRole::Student)
            .ok_or_else(|| AppError::UserNotFound("존재하지 않는 학생입니다.".to_string()))
    }

    async fn find_attendance(
        state: &AppState,
        event_id: i64,
        student_id: i64,
    ) -> Result<Option<attendance::Model>, AppError> {
        Ok(attendance::Entity::find()
            .filter(attendance::Column::EventId.eq(event_id))
            .filter(attendance::Column::StudentId.eq(student_id))
            .one(&state.db)
            .await?)
    }

    async fn refresh_check_in(
        state: &AppState,
        existing: attendance::Model,
    ) -> Result<attendance::Model, AppError> {
        let mut active: attendance::ActiveModel = existing.into();
        active.check_in_time = Set(Utc::now().naive_utc());
        let updated = active.update(&state.db).await?;
        Ok(updated)
    }

    fn already_registered() -> AppError {
        AppError::AlreadyRegistered("이미 신청한 행사입니다.".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use chrono::{Duration, NaiveTime};
    use rust_decimal::Decimal;
    use sea_orm::DatabaseConnection;

    use crate::config::{establish_connection, DatabaseConfig};
    use crate::domain::event::entity::event::{EventStatus, EventType};

    /// 커넥션 풀 전체가 같은 DB를 보도록 파일 기반 SQLite를 씁니다.
    struct FileDatabase {
        db: DatabaseConnection,
        path: PathBuf,
    }

    impl FileDatabase {
        async fn open() -> Self {
            let path = std::env::temp_dir().join(format!("seat-claim-{}.db", uuid::Uuid::new_v4()));
            let config = DatabaseConfig {
                url: format!("sqlite://{}?mode=rwc", path.display()),
                schema_update: true,
            };
            let db = establish_connection(&config).await.unwrap();
            Self { db, path }
        }
    }

    impl Drop for FileDatabase {
        fn drop(&mut self) {
            for suffix in ["", "-wal", "-shm"] {
                let _ = std::fs::remove_file(format!("{}{}", self.path.display(), suffix));
            }
        }
    }

    async fn insert_event(db: &DatabaseConnection, max_capacity: i32) -> event::Model {
        let now = Utc::now().naive_utc();
        event::ActiveModel {
            title: Set("Rust Workshop".to_string()),
            description: Set(String::new()),
            event_date: Set((Utc::now() + Duration::days(7)).date_naive()),
            start_time: Set(NaiveTime::from_hms_opt(10, 0, 0).unwrap()),
            end_time: Set(NaiveTime::from_hms_opt(12, 0, 0).unwrap()),
            venue_id: Set(None),
            department_id: Set(None),
            created_by: Set(None),
            max_capacity: Set(max_capacity),
            registered_count: Set(0),
            event_type: Set(EventType::Workshop),
            status: Set(EventStatus::Published),
            registration_fee: Set(Decimal::ZERO),
            registration_deadline: Set(None),
            poster_image: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn parallel_seat_claims_should_never_exceed_capacity() {
        const CAPACITY: i32 = 3;
        const CLAIMS: usize = 12;

        let file_db = FileDatabase::open().await;
        let target = insert_event(&file_db.db, CAPACITY).await;

        let tasks: Vec<_> = (0..CLAIMS)
            .map(|_| {
                let db = file_db.db.clone();
                let event_id = target.event_id;
                tokio::spawn(async move {
                    RegistrationService::increment_registered_count(&db, event_id).await
                })
            })
            .collect();

        let mut claimed = 0;
        let mut full = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(()) => claimed += 1,
                Err(AppError::EventFull(_)) => full += 1,
                Err(other) => panic!("unexpected error: {:?}", other),
            }
        }

        assert_eq!(claimed, CAPACITY as usize);
        assert_eq!(full, CLAIMS - CAPACITY as usize);

        let reloaded = EventService::find_event(&file_db.db, target.event_id)
            .await
            .unwrap();
        assert_eq!(reloaded.registered_count, CAPACITY);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn last_seat_should_go_to_exactly_one_of_two_parallel_claims() {
        let file_db = FileDatabase::open().await;
        let target = insert_event(&file_db.db, 1).await;

        let (first, second) = {
            let (db_a, db_b) = (file_db.db.clone(), file_db.db.clone());
            let event_id = target.event_id;
            tokio::join!(
                tokio::spawn(async move {
                    RegistrationService::increment_registered_count(&db_a, event_id).await
                }),
                tokio::spawn(async move {
                    RegistrationService::increment_registered_count(&db_b, event_id).await
                })
            )
        };
        let results = [first.unwrap(), second.unwrap()];

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(
            results
                .iter()
                .filter(|r| matches!(r, Err(AppError::EventFull(_))))
                .count(),
            1
        );

        let reloaded = EventService::find_event(&file_db.db, target.event_id)
            .await
            .unwrap();
        assert_eq!(reloaded.registered_count, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn parallel_seat_claims_on_cancelled_event_should_all_fail() {
        let file_db = FileDatabase::open().await;
        let target = insert_event(&file_db.db, 5).await;
        event::Entity::update_many()
            .col_expr(event::Column::Status, Expr::value(EventStatus::Cancelled))
            .filter(event::Column::EventId.eq(target.event_id))
            .exec(&file_db.db)
            .await
            .unwrap();

        let tasks: Vec<_> = (0..4)
            .map(|_| {
                let db = file_db.db.clone();
                let event_id = target.event_id;
                tokio::spawn(async move {
                    RegistrationService::increment_registered_count(&db, event_id).await
                })
            })
            .collect();

        for task in tasks {
            let result = task.await.unwrap();
            assert!(matches!(result, Err(AppError::EventNotOpen(_))));
        }

        let reloaded = EventService::find_event(&file_db.db, target.event_id)
            .await
            .unwrap();
        assert_eq!(reloaded.registered_count, 0);
    }
}
