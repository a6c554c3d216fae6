use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use crate::domain::audit::entity::audit_log::AuditAction;
use crate::domain::audit::logger::{entity_type, AuditEntry};
use crate::domain::event::entity::event;
use crate::state::AppState;
use crate::utils::auth::Actor;
use crate::utils::error::{is_unique_violation, AppError};

use super::dto::{
    ChangeRoleRequest, CreateDepartmentRequest, DepartmentResponse, UpdateProfileRequest,
    UserListQuery, UserProfileResponse,
};
use super::entity::department;
use super::entity::user;

pub struct UserService;

impl UserService {
    /// 내 프로필 조회
    pub async fn get_profile(
        state: &AppState,
        actor: &Actor,
    ) -> Result<UserProfileResponse, AppError> {
        let found = Self::find_user(state, actor.user_id).await?;
        Ok(found.into())
    }

    /// 내 프로필 수정 (이름, 전화번호)
    pub async fn update_profile(
        state: &AppState,
        actor: &Actor,
        req: UpdateProfileRequest,
    ) -> Result<UserProfileResponse, AppError> {
        let found = Self::find_user(state, actor.user_id).await?;

        let mut active: user::ActiveModel = found.into();
        if let Some(full_name) = req.full_name {
            active.full_name = Set(full_name);
        }
        if let Some(phone_number) = req.phone_number {
            active.phone_number = Set(Some(phone_number));
        }
        active.updated_at = Set(Utc::now().naive_utc());

        let updated = active.update(&state.db).await?;
        Ok(updated.into())
    }

    /// 사용자 목록 (관리자)
    pub async fn list_users(
        state: &AppState,
        query: UserListQuery,
    ) -> Result<Vec<UserProfileResponse>, AppError> {
        let mut select = user::Entity::find();
        if let Some(role) = query.role {
            select = select.filter(user::Column::Role.eq(role));
        }

        let users = select
            .order_by_asc(user::Column::UserId)
            .all(&state.db)
            .await?;

        Ok(users.into_iter().map(Into::into).collect())
    }

    /// 역할 변경 (관리자). 본인 역할은 변경할 수 없습니다.
    pub async fn change_role(
        state: &AppState,
        actor: &Actor,
        user_id: i64,
        req: ChangeRoleRequest,
    ) -> Result<UserProfileResponse, AppError> {
        if user_id == actor.user_id {
            return Err(AppError::PreconditionFailed(
                "본인의 역할은 변경할 수 없습니다.".to_string(),
            ));
        }

        let found = Self::find_user(state, user_id).await?;
        let previous = found.role;

        let mut active: user::ActiveModel = found.into();
        active.role = Set(req.role);
        active.updated_at = Set(Utc::now().naive_utc());
        let updated = active.update(&state.db).await?;

        info!(
            user_id,
            from = previous.as_str(),
            to = updated.role.as_str(),
            "user role changed"
        );

        state
            .audit
            .record(
                &state.db,
                actor,
                AuditEntry::new(
                    AuditAction::Update,
                    entity_type::USER,
                    user_id,
                    format!(
                        "Changed role of {} from {} to {}",
                        updated.full_name,
                        previous.as_str(),
                        updated.role.as_str()
                    ),
                ),
            )
            .await;

        Ok(updated.into())
    }

    async fn find_user(state: &AppState, user_id: i64) -> Result<user::Model, AppError> {
        user::Entity::find_by_id(user_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::UserNotFound("존재하지 않는 사용자입니다.".to_string()))
    }
}

pub struct DepartmentService;

impl DepartmentService {
    pub async fn create_department(
        state: &AppState,
        actor: &Actor,
        req: CreateDepartmentRequest,
    ) -> Result<DepartmentResponse, AppError> {
        let now = Utc::now().naive_utc();
        let saved = department::ActiveModel {
            name: Set(req.name.trim().to_string()),
            code: Set(req.code.trim().to_uppercase()),
            head_of_department: Set(req.head_of_department),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&state.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::PreconditionFailed("이미 존재하는 학과명 또는 코드입니다.".to_string())
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
                    AuditAction::Create,
                    entity_type::DEPARTMENT,
                    saved.department_id,
                    format!("Created department {} ({})", saved.name, saved.code),
                ),
            )
            .await;

        Ok(saved.into())
    }

    pub async fn list_departments(state: &AppState) -> Result<Vec<DepartmentResponse>, AppError> {
        let departments = department::Entity::find()
            .order_by_asc(department::Column::Name)
            .all(&state.db)
            .await?;

        Ok(departments.into_iter().map(Into::into).collect())
    }

    /// 학과 삭제. 소속 사용자와 행사의 학과는 NULL로 바뀝니다.
    pub async fn delete_department(
        state: &AppState,
        actor: &Actor,
        department_id: i64,
    ) -> Result<(), AppError> {
        let txn = state.db.begin().await?;

        let found = department::Entity::find_by_id(department_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::DepartmentNotFound("존재하지 않는 학과입니다.".to_string()))?;

        user::Entity::update_many()
            .col_expr(user::Column::DepartmentId, Expr::value(Option::<i64>::None))
            .filter(user::Column::DepartmentId.eq(department_id))
            .exec(&txn)
            .await?;
        event::Entity::update_many()
            .col_expr(event::Column::DepartmentId, Expr::value(Option::<i64>::None))
            .filter(event::Column::DepartmentId.eq(department_id))
            .exec(&txn)
            .await?;
        department::Entity::delete_by_id(department_id)
            .exec(&txn)
            .await?;

        txn.commit().await?;

        info!(department_id, "department deleted");

        state
            .audit
            .record(
                &state.db,
                actor,
                AuditEntry::new(
                    AuditAction::Delete,
                    entity_type::DEPARTMENT,
                    department_id,
                    format!("Deleted department {}", found.name),
                ),
            )
            .await;

        Ok(())
    }
}
