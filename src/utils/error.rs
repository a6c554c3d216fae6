use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use tracing::{error, warn};
use validator::ValidationErrors;

use super::response::{ErrorResponse, FieldError};

/// 애플리케이션 전역 에러 타입
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Unauthorized(String),
    /// 역할(role) 검사 실패
    Forbidden(String),
    NotFound(String),
    EventNotFound(String),
    RegistrationNotFound(String),
    UserNotFound(String),
    VenueNotFound(String),
    DepartmentNotFound(String),
    /// 동일 (행사, 학생) 신청이 이미 존재
    AlreadyRegistered(String),
    /// 정원 초과
    EventFull(String),
    /// 신청 가능한 상태가 아님 (상태/마감일)
    EventNotOpen(String),
    /// 허용되지 않는 상태 전이
    InvalidStatusTransition(String),
    /// 그 밖의 선행 조건 위반
    PreconditionFailed(String),
    ValidationError(Vec<FieldError>),
    JsonParseFailed(String),
    InternalError(String),
}

impl AppError {
    /// 에러 메시지 반환
    pub fn message(&self) -> String {
        match self {
            AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::EventNotFound(msg)
            | AppError::RegistrationNotFound(msg)
            | AppError::UserNotFound(msg)
            | AppError::VenueNotFound(msg)
            | AppError::DepartmentNotFound(msg)
            | AppError::AlreadyRegistered(msg)
            | AppError::EventFull(msg)
            | AppError::EventNotOpen(msg)
            | AppError::InvalidStatusTransition(msg)
            | AppError::PreconditionFailed(msg)
            | AppError::InternalError(msg) => msg.clone(),
            AppError::ValidationError(fields) => {
                let detail = fields
                    .iter()
                    .map(|f| format!("{}: {}", f.field, f.message))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("입력값이 올바르지 않습니다. ({})", detail)
            }
            AppError::JsonParseFailed(msg) => format!("잘못된 요청 형식입니다: {}", msg),
        }
    }

    /// 에러 코드 반환
    pub fn error_code(&self) -> String {
        match self {
            AppError::BadRequest(_) => "COMMON400",
            AppError::Unauthorized(_) => "AUTH4001",
            AppError::Forbidden(_) => "COMMON403",
            AppError::NotFound(_) => "COMMON404",
            AppError::EventNotFound(_) => "EVENT4041",
            AppError::RegistrationNotFound(_) => "REG4041",
            AppError::UserNotFound(_) => "USER4041",
            AppError::VenueNotFound(_) => "VENUE4041",
            AppError::DepartmentNotFound(_) => "DEPT4041",
            AppError::AlreadyRegistered(_) => "REG4091",
            AppError::EventFull(_) => "REG4092",
            AppError::EventNotOpen(_) => "REG4093",
            AppError::InvalidStatusTransition(_) => "EVENT4091",
            AppError::PreconditionFailed(_) => "COMMON409",
            AppError::ValidationError(_) => "COMMON400",
            AppError::JsonParseFailed(_) => "COMMON400",
            AppError::InternalError(_) => "COMMON500",
        }
        .to_string()
    }

    /// HTTP 상태 코드 반환
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::ValidationError(_) | AppError::JsonParseFailed(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_)
            | AppError::EventNotFound(_)
            | AppError::RegistrationNotFound(_)
            | AppError::UserNotFound(_)
            | AppError::VenueNotFound(_)
            | AppError::DepartmentNotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyRegistered(_)
            | AppError::EventFull(_)
            | AppError::EventNotOpen(_)
            | AppError::InvalidStatusTransition(_)
            | AppError::PreconditionFailed(_) => StatusCode::CONFLICT,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.message();

        match &self {
            AppError::InternalError(_) => {
                error!("Internal Server Error: {}", message);
            }
            _ => {
                warn!("Error [{}]: {}", error_code, message);
            }
        }

        let mut error_response = ErrorResponse::new(error_code, message);
        if let AppError::ValidationError(fields) = self {
            error_response = error_response.with_fields(fields);
        }

        (status, Json(error_response)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::JsonParseFailed(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::InternalError(err.to_string())
    }
}

/// 유니크 인덱스 위반 여부
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// validator 검증 결과를 필드별 에러 목록으로 변환
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::ValidationError(fields)
    }
}

/// 편의 함수들
impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        AppError::Forbidden(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        AppError::Unauthorized(msg.into())
    }

    pub fn internal_error(msg: impl Into<String>) -> Self {
        AppError::InternalError(msg.into())
    }

    /// 단일 필드 검증 실패
    pub fn invalid_field(field: impl Into<String>, msg: impl Into<String>) -> Self {
        AppError::ValidationError(vec![FieldError {
            field: field.into(),
            message: msg.into(),
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precondition_errors_should_map_to_conflict() {
        let errors = [
            AppError::AlreadyRegistered("x".into()),
            AppError::EventFull("x".into()),
            AppError::EventNotOpen("x".into()),
            AppError::InvalidStatusTransition("x".into()),
            AppError::PreconditionFailed("x".into()),
        ];

        for err in errors {
            assert_eq!(err.status_code(), StatusCode::CONFLICT);
        }
    }

    #[test]
    fn event_full_should_have_dedicated_code() {
        let err = AppError::EventFull("정원이 가득 찼습니다.".into());

        assert_eq!(err.error_code(), "REG4092");
        assert_eq!(err.message(), "정원이 가득 찼습니다.");
    }

    #[test]
    fn forbidden_should_map_to_403() {
        let err = AppError::forbidden("관리자만 접근할 수 있습니다.");

        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.error_code(), "COMMON403");
    }

    #[test]
    fn validation_error_message_should_list_fields() {
        let err = AppError::invalid_field("rating", "평점은 1~5 사이여야 합니다.");

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.message().contains("rating"));
    }

    #[test]
    fn db_error_should_become_internal_error() {
        let err: AppError = DbErr::Custom("boom".into()).into();

        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
