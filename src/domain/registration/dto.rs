use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::entity::attendance::{self, VerificationMethod};
use super::entity::event_feedback;
use super::entity::registration::{self, PaymentStatus, RegistrationStatus};
use crate::domain::event::entity::event::{self, EventStatus};
use crate::domain::user::entity::user;

/// 반려 사유 기본값
pub const DEFAULT_REJECTION_REASON: &str = "Does not meet criteria";

// ============== 참가 신청 ==============

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    pub registration_id: i64,
    pub event_id: i64,
    pub student_id: i64,
    pub status: RegistrationStatus,
    pub payment_status: PaymentStatus,
    pub transaction_id: Option<String>,
    #[schema(value_type = String)]
    pub registered_at: NaiveDateTime,
}

impl From<registration::Model> for RegistrationResponse {
    fn from(model: registration::Model) -> Self {
        Self {
            registration_id: model.registration_id,
            event_id: model.event_id,
            student_id: model.student_id,
            status: model.status,
            payment_status: model.payment_status,
            transaction_id: model.transaction_id,
            registered_at: model.registered_at,
        }
    }
}

/// 관리자 수동 등록
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManualRegistrationRequest {
    pub student_id: i64,
}

/// 일괄 승인
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApproveRegistrationsRequest {
    #[validate(length(min = 1, message = "신청 ID를 1개 이상 입력해주세요."))]
    pub registration_ids: Vec<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApproveRegistrationsResponse {
    /// pending 상태였던 신청만 승인됩니다.
    pub approved_count: u64,
}

/// 일괄 반려
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RejectRegistrationsRequest {
    #[validate(length(min = 1, message = "신청 ID를 1개 이상 입력해주세요."))]
    pub registration_ids: Vec<i64>,
    #[validate(length(max = 500, message = "반려 사유는 500자 이하여야 합니다."))]
    pub reason: Option<String>,
}

impl RejectRegistrationsRequest {
    pub fn reason(&self) -> &str {
        self.reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_REJECTION_REASON)
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RejectRegistrationsResponse {
    pub rejected_count: u64,
}

/// 내 신청 내역 항목
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MyRegistrationItem {
    pub registration_id: i64,
    pub event_id: i64,
    pub event_title: String,
    #[schema(value_type = String)]
    pub event_date: NaiveDate,
    pub event_status: EventStatus,
    pub status: RegistrationStatus,
    pub payment_status: PaymentStatus,
    #[schema(value_type = String)]
    pub registered_at: NaiveDateTime,
}

impl MyRegistrationItem {
    pub fn new(registration: registration::Model, event: &event::Model) -> Self {
        Self {
            registration_id: registration.registration_id,
            event_id: event.event_id,
            event_title: event.title.clone(),
            event_date: event.event_date,
            event_status: event.status,
            status: registration.status,
            payment_status: registration.payment_status,
            registered_at: registration.registered_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationListQuery {
    pub status: Option<RegistrationStatus>,
}

/// 행사별 신청자 항목
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventRegistrationItem {
    pub registration_id: i64,
    pub student_id: i64,
    pub roll_number: String,
    pub full_name: String,
    pub email: String,
    pub status: RegistrationStatus,
    pub payment_status: PaymentStatus,
    #[schema(value_type = String)]
    pub registered_at: NaiveDateTime,
}

impl EventRegistrationItem {
    pub fn new(registration: registration::Model, student: &user::Model) -> Self {
        Self {
            registration_id: registration.registration_id,
            student_id: student.user_id,
            roll_number: student.username.clone(),
            full_name: student.full_name.clone(),
            email: student.email.clone(),
            status: registration.status,
            payment_status: registration.payment_status,
            registered_at: registration.registered_at,
        }
    }
}

// ============== 출석 ==============

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendanceRequest {
    pub student_id: i64,
    #[serde(default)]
    pub verification_method: VerificationMethod,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceResponse {
    pub attendance_id: i64,
    pub event_id: i64,
    pub student_id: i64,
    #[schema(value_type = String)]
    pub check_in_time: NaiveDateTime,
    #[schema(value_type = Option<String>)]
    pub check_out_time: Option<NaiveDateTime>,
    pub verification_method: VerificationMethod,
}

impl From<attendance::Model> for AttendanceResponse {
    fn from(model: attendance::Model) -> Self {
        Self {
            attendance_id: model.attendance_id,
            event_id: model.event_id,
            student_id: model.student_id,
            check_in_time: model.check_in_time,
            check_out_time: model.check_out_time,
            verification_method: model.verification_method,
        }
    }
}

// ============== 피드백 ==============

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFeedbackRequest {
    #[validate(range(min = 1, max = 5, message = "평점은 1~5 사이여야 합니다."))]
    pub rating: i32,
    #[serde(default)]
    #[validate(length(max = 2000, message = "의견은 2000자 이하여야 합니다."))]
    pub comments: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponse {
    pub event_feedback_id: i64,
    pub event_id: i64,
    pub student_id: i64,
    pub rating: i32,
    pub comments: String,
    #[schema(value_type = String)]
    pub submitted_at: NaiveDateTime,
}

impl From<event_feedback::Model> for FeedbackResponse {
    fn from(model: event_feedback::Model) -> Self {
        Self {
            event_feedback_id: model.event_feedback_id,
            event_id: model.event_id,
            student_id: model.student_id,
            rating: model.rating,
            comments: model.comments,
            submitted_at: model.submitted_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackListResponse {
    pub event_id: i64,
    /// 피드백이 없으면 null
    pub average_rating: Option<f64>,
    pub total: usize,
    pub feedback: Vec<FeedbackResponse>,
}

/// 신청 성공 응답 (Swagger 문서용)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuccessRegistrationResponse {
    pub is_success: bool,
    pub code: String,
    pub message: String,
    pub result: RegistrationResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reject_reason_should_fall_back_to_default() {
        let req = RejectRegistrationsRequest {
            registration_ids: vec![1],
            reason: Some("   ".to_string()),
        };
        assert_eq!(req.reason(), DEFAULT_REJECTION_REASON);

        let req = RejectRegistrationsRequest {
            registration_ids: vec![1],
            reason: None,
        };
        assert_eq!(req.reason(), DEFAULT_REJECTION_REASON);
    }

    #[test]
    fn reject_reason_should_use_trimmed_input() {
        let req = RejectRegistrationsRequest {
            registration_ids: vec![1],
            reason: Some("  정원 초과  ".to_string()),
        };
        assert_eq!(req.reason(), "정원 초과");
    }

    #[test]
    fn approve_request_should_require_at_least_one_id() {
        let req = ApproveRegistrationsRequest {
            registration_ids: vec![],
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn feedback_rating_should_be_between_one_and_five() {
        for rating in [0, 6] {
            let req = SubmitFeedbackRequest {
                rating,
                comments: String::new(),
            };
            let errors = req.validate().unwrap_err();
            assert!(errors.field_errors().contains_key("rating"));
        }

        let req = SubmitFeedbackRequest {
            rating: 5,
            comments: "좋았습니다".to_string(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn attendance_method_should_default_to_manual() {
        let req: MarkAttendanceRequest =
            serde_json::from_value(serde_json::json!({ "studentId": 3 })).unwrap();
        assert_eq!(req.verification_method, VerificationMethod::Manual);
    }
}
