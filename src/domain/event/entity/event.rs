use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 행사 상태
///
/// 상태 전이 규칙은 `event::lifecycle`에 있습니다.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "published")]
    Published,
    #[sea_orm(string_value = "ongoing")]
    Ongoing,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    #[sea_orm(string_value = "workshop")]
    Workshop,
    #[sea_orm(string_value = "seminar")]
    Seminar,
    #[sea_orm(string_value = "conference")]
    Conference,
    #[sea_orm(string_value = "competition")]
    Competition,
    #[sea_orm(string_value = "cultural")]
    Cultural,
    #[sea_orm(string_value = "sports")]
    Sports,
    #[sea_orm(string_value = "other")]
    Other,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "event")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub event_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub event_date: Date,
    pub start_time: Time,
    pub end_time: Time,
    pub venue_id: Option<i64>,
    pub department_id: Option<i64>,
    pub created_by: Option<i64>,
    pub max_capacity: i32,
    /// 좌석을 점유 중인 신청 수 (pending + confirmed)
    pub registered_count: i32,
    pub event_type: EventType,
    pub status: EventStatus,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub registration_fee: Decimal,
    pub registration_deadline: Option<Date>,
    pub poster_image: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Model {
    pub fn remaining_seats(&self) -> i32 {
        (self.max_capacity - self.registered_count).max(0)
    }

    pub fn is_full(&self) -> bool {
        self.registered_count >= self.max_capacity
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::domain::venue::entity::venue::Entity",
        from = "Column::VenueId",
        to = "crate::domain::venue::entity::venue::Column::VenueId",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Venue,
    #[sea_orm(
        belongs_to = "crate::domain::user::entity::department::Entity",
        from = "Column::DepartmentId",
        to = "crate::domain::user::entity::department::Column::DepartmentId",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Department,
    #[sea_orm(has_many = "crate::domain::registration::entity::registration::Entity")]
    Registration,
    #[sea_orm(has_many = "crate::domain::registration::entity::attendance::Entity")]
    Attendance,
    #[sea_orm(has_many = "crate::domain::registration::entity::event_feedback::Entity")]
    EventFeedback,
    #[sea_orm(has_many = "super::event_coordinator::Entity")]
    EventCoordinator,
    #[sea_orm(has_many = "super::event_resource::Entity")]
    EventResource,
}

impl Related<crate::domain::venue::entity::venue::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Venue.def()
    }
}

impl Related<crate::domain::user::entity::department::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Department.def()
    }
}

impl Related<crate::domain::registration::entity::registration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Registration.def()
    }
}

impl Related<crate::domain::registration::entity::attendance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendance.def()
    }
}

impl Related<crate::domain::registration::entity::event_feedback::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EventFeedback.def()
    }
}

impl Related<super::event_coordinator::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EventCoordinator.def()
    }
}

impl Related<super::event_resource::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EventResource.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
