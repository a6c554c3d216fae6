use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::entity::event::{self, EventStatus, EventType};
use super::entity::event_coordinator;
use super::entity::event_resource::{self, ResourceStatus, ResourceType};

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

// ============== 행사 생성/수정 ==============

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 200, message = "행사 제목은 1~200자여야 합니다."))]
    pub title: String,

    #[serde(default)]
    pub description: String,

    /// YYYY-MM-DD
    #[schema(value_type = String, example = "2026-11-20")]
    pub event_date: NaiveDate,

    /// HH:MM:SS
    #[schema(value_type = String, example = "10:00:00")]
    pub start_time: NaiveTime,

    #[schema(value_type = String, example = "12:00:00")]
    pub end_time: NaiveTime,

    pub venue_id: Option<i64>,

    /// 없으면 생성자의 학과로 지정됩니다.
    pub department_id: Option<i64>,

    #[validate(range(min = 1, message = "정원은 1명 이상이어야 합니다."))]
    pub max_capacity: i32,

    pub event_type: EventType,

    #[schema(value_type = Option<String>, example = "150.00")]
    pub registration_fee: Option<Decimal>,

    #[schema(value_type = Option<String>, example = "2026-11-15")]
    pub registration_deadline: Option<NaiveDate>,

    #[validate(url(message = "유효한 URL 형식이 아닙니다."))]
    pub poster_image: Option<String>,
}

/// 전달된 필드만 수정합니다.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 200, message = "행사 제목은 1~200자여야 합니다."))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<String>)]
    pub event_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>)]
    pub start_time: Option<NaiveTime>,
    #[schema(value_type = Option<String>)]
    pub end_time: Option<NaiveTime>,
    pub venue_id: Option<i64>,
    #[validate(range(min = 1, message = "정원은 1명 이상이어야 합니다."))]
    pub max_capacity: Option<i32>,
    pub event_type: Option<EventType>,
    #[schema(value_type = Option<String>)]
    pub registration_fee: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub registration_deadline: Option<NaiveDate>,
    #[validate(url(message = "유효한 URL 형식이 아닙니다."))]
    pub poster_image: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub event_id: i64,
    pub title: String,
    pub description: String,
    #[schema(value_type = String)]
    pub event_date: NaiveDate,
    #[schema(value_type = String)]
    pub start_time: NaiveTime,
    #[schema(value_type = String)]
    pub end_time: NaiveTime,
    pub venue_id: Option<i64>,
    pub department_id: Option<i64>,
    pub created_by: Option<i64>,
    pub max_capacity: i32,
    pub registered_count: i32,
    pub remaining_seats: i32,
    pub event_type: EventType,
    pub status: EventStatus,
    #[schema(value_type = String)]
    pub registration_fee: Decimal,
    #[schema(value_type = Option<String>)]
    pub registration_deadline: Option<NaiveDate>,
    pub poster_image: Option<String>,
    #[schema(value_type = String)]
    pub created_at: NaiveDateTime,
    #[schema(value_type = String)]
    pub updated_at: NaiveDateTime,
}

impl From<event::Model> for EventResponse {
    fn from(model: event::Model) -> Self {
        Self {
            remaining_seats: model.remaining_seats(),
            event_id: model.event_id,
            title: model.title,
            description: model.description,
            event_date: model.event_date,
            start_time: model.start_time,
            end_time: model.end_time,
            venue_id: model.venue_id,
            department_id: model.department_id,
            created_by: model.created_by,
            max_capacity: model.max_capacity,
            registered_count: model.registered_count,
            event_type: model.event_type,
            status: model.status,
            registration_fee: model.registration_fee,
            registration_deadline: model.registration_deadline,
            poster_image: model.poster_image,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

// ============== 행사 목록 ==============

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct EventListQuery {
    pub status: Option<EventStatus>,
    pub department_id: Option<i64>,
    /// 1부터 시작
    pub page: Option<u64>,
    pub size: Option<u64>,
}

impl EventListQuery {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn size(&self) -> u64 {
        self.size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventListResponse {
    pub events: Vec<EventResponse>,
    pub page: u64,
    pub size: u64,
    pub total: u64,
}

// ============== 상태 전이 ==============

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CancelEventResponse {
    pub event: EventResponse,
    /// 취소 안내를 보낸 확정 신청 수
    pub notifications_sent: u64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteEventResponse {
    pub event_id: i64,
    pub registrations_affected: u64,
}

// ============== 담당 교수 / 자원 ==============

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddCoordinatorRequest {
    pub faculty_id: i64,
    #[validate(length(min = 1, max = 100, message = "역할은 1~100자여야 합니다."))]
    pub role: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CoordinatorResponse {
    pub event_coordinator_id: i64,
    pub event_id: i64,
    pub faculty_id: i64,
    pub role: String,
    #[schema(value_type = String)]
    pub assigned_at: NaiveDateTime,
}

impl From<event_coordinator::Model> for CoordinatorResponse {
    fn from(model: event_coordinator::Model) -> Self {
        Self {
            event_coordinator_id: model.event_coordinator_id,
            event_id: model.event_id,
            faculty_id: model.faculty_id,
            role: model.role,
            assigned_at: model.assigned_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddResourceRequest {
    pub resource_type: ResourceType,
    #[validate(length(min = 1, max = 200, message = "자원 이름은 1~200자여야 합니다."))]
    pub name: String,
    #[validate(range(min = 1, message = "수량은 1 이상이어야 합니다."))]
    pub quantity: i32,
    pub status: Option<ResourceStatus>,
    #[schema(value_type = Option<String>)]
    pub cost: Option<Decimal>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceResponse {
    pub event_resource_id: i64,
    pub event_id: i64,
    pub resource_type: ResourceType,
    pub name: String,
    pub quantity: i32,
    pub status: ResourceStatus,
    #[schema(value_type = String)]
    pub cost: Decimal,
}

impl From<event_resource::Model> for ResourceResponse {
    fn from(model: event_resource::Model) -> Self {
        Self {
            event_resource_id: model.event_resource_id,
            event_id: model.event_id,
            resource_type: model.resource_type,
            name: model.name,
            quantity: model.quantity,
            status: model.status,
            cost: model.cost,
        }
    }
}

/// 행사 조회 성공 응답 (Swagger 문서용)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuccessEventResponse {
    pub is_success: bool,
    pub code: String,
    pub message: String,
    pub result: EventResponse,
}

/// 행사 취소 성공 응답 (Swagger 문서용)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuccessCancelEventResponse {
    pub is_success: bool,
    pub code: String,
    pub message: String,
    pub result: CancelEventResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_should_reject_zero_capacity() {
        let req: CreateEventRequest = serde_json::from_value(serde_json::json!({
            "title": "Rust Workshop",
            "eventDate": "2026-11-20",
            "startTime": "10:00:00",
            "endTime": "12:00:00",
            "maxCapacity": 0,
            "eventType": "workshop"
        }))
        .unwrap();

        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("max_capacity"));
    }

    #[test]
    fn list_query_should_clamp_page_size() {
        let query = EventListQuery {
            size: Some(10_000),
            page: Some(0),
            ..Default::default()
        };

        assert_eq!(query.size(), MAX_PAGE_SIZE);
        assert_eq!(query.page(), 1);
    }

    #[test]
    fn event_status_should_deserialize_from_snake_case() {
        let status: EventStatus = serde_json::from_str("\"published\"").unwrap();
        assert_eq!(status, EventStatus::Published);
    }
}
