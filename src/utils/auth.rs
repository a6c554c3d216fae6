use std::marker::PhantomData;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::header::{AUTHORIZATION, COOKIE},
    http::request::Parts,
};
use sea_orm::EntityTrait;

use crate::domain::user::entity::user::{self, UserRole};
use crate::state::AppState;
use crate::utils::client_ip::client_ip;
use crate::utils::error::AppError;
use crate::utils::jwt::decode_access_token;

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// 인증된 호출자
///
/// 역할은 토큰이 아니라 DB의 현재 값을 사용합니다.
#[derive(Debug, Clone)]
pub struct Actor {
    pub user_id: i64,
    pub role: UserRole,
    pub ip_address: Option<String>,
}

#[async_trait]
impl FromRequestParts<AppState> for Actor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // 1. Authorization 헤더, 2. 쿠키 순서로 토큰 추출
        let token = if let Some(auth_header) = parts.headers.get(AUTHORIZATION) {
            let auth_header_str = auth_header
                .to_str()
                .map_err(|_| AppError::Unauthorized("잘못된 헤더 형식입니다.".to_string()))?;

            auth_header_str
                .strip_prefix("Bearer ")
                .map(str::to_string)
                .ok_or_else(|| {
                    AppError::Unauthorized("토큰 형식이 올바르지 않습니다.".to_string())
                })?
        } else {
            extract_token_from_cookie(parts)?
        };

        let claims = decode_access_token(&token, &state.config.jwt_secret)?;
        let user_id: i64 = claims
            .sub
            .parse()
            .map_err(|_| AppError::Unauthorized("유효하지 않은 사용자 ID입니다.".to_string()))?;

        let user = user::Entity::find_by_id(user_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::Unauthorized("존재하지 않는 사용자입니다.".to_string()))?;

        if !user.is_active {
            return Err(AppError::Unauthorized("비활성화된 계정입니다.".to_string()));
        }

        Ok(Actor {
            user_id: user.user_id,
            role: user.role,
            ip_address: client_ip(parts),
        })
    }
}

/// 쿠키에서 access_token 추출
fn extract_token_from_cookie(parts: &Parts) -> Result<String, AppError> {
    let cookie_header = parts
        .headers
        .get(COOKIE)
        .ok_or_else(|| AppError::Unauthorized("로그인이 필요합니다.".to_string()))?;

    let cookie_str = cookie_header
        .to_str()
        .map_err(|_| AppError::Unauthorized("잘못된 쿠키 형식입니다.".to_string()))?;

    // "name1=value1; name2=value2"
    for cookie in cookie_str.split(';') {
        let cookie = cookie.trim();
        if let Some(value) = cookie.strip_prefix(&format!("{}=", ACCESS_TOKEN_COOKIE)) {
            if !value.is_empty() {
                return Ok(value.to_string());
            }
        }
    }

    Err(AppError::Unauthorized("로그인이 필요합니다.".to_string()))
}

/// 엔드포인트가 요구하는 권한
pub trait Capability: Send + Sync + 'static {
    /// 거부 시 메시지
    const DENIED: &'static str;

    fn allows(role: UserRole) -> bool;
}

/// 관리자 전용
pub struct AdminOnly;

impl Capability for AdminOnly {
    const DENIED: &'static str = "관리자만 수행할 수 있는 작업입니다.";

    fn allows(role: UserRole) -> bool {
        role == UserRole::Admin
    }
}

/// 행사 운영진 (관리자, 주최자)
pub struct EventStaff;

impl Capability for EventStaff {
    const DENIED: &'static str = "관리자 또는 주최자만 수행할 수 있는 작업입니다.";

    fn allows(role: UserRole) -> bool {
        role.is_staff()
    }
}

/// 학생 전용
pub struct StudentOnly;

impl Capability for StudentOnly {
    const DENIED: &'static str = "학생만 수행할 수 있는 작업입니다.";

    fn allows(role: UserRole) -> bool {
        role == UserRole::Student
    }
}

/// 권한 검사 Extractor
///
/// 핸들러 시그니처에 `Authorized<AdminOnly>`처럼 요구 권한을 선언합니다.
pub struct Authorized<C: Capability> {
    pub actor: Actor,
    _capability: PhantomData<fn() -> C>,
}

impl<C: Capability> Authorized<C> {
    pub fn check(actor: Actor) -> Result<Self, AppError> {
        if !C::allows(actor.role) {
            tracing::warn!(
                user_id = actor.user_id,
                role = actor.role.as_str(),
                "permission denied"
            );
            return Err(AppError::Forbidden(C::DENIED.to_string()));
        }
        Ok(Self {
            actor,
            _capability: PhantomData,
        })
    }
}

#[async_trait]
impl<C: Capability> FromRequestParts<AppState> for Authorized<C> {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let actor = Actor::from_request_parts(parts, state).await?;
        Self::check(actor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: UserRole) -> Actor {
        Actor {
            user_id: 1,
            role,
            ip_address: None,
        }
    }

    #[test]
    fn admin_only_should_reject_organizer() {
        let result = Authorized::<AdminOnly>::check(actor(UserRole::Organizer));
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[test]
    fn event_staff_should_allow_admin_and_organizer() {
        assert!(Authorized::<EventStaff>::check(actor(UserRole::Admin)).is_ok());
        assert!(Authorized::<EventStaff>::check(actor(UserRole::Organizer)).is_ok());
        assert!(Authorized::<EventStaff>::check(actor(UserRole::Faculty)).is_err());
    }

    #[test]
    fn student_only_should_reject_admin() {
        assert!(Authorized::<StudentOnly>::check(actor(UserRole::Student)).is_ok());
        assert!(Authorized::<StudentOnly>::check(actor(UserRole::Admin)).is_err());
    }
}
