//! 행사 상태 전이 규칙
//!
//! `draft → published → ongoing → completed`, 종료 상태가 아니면 언제든 `cancelled`.
//! 종료 상태: `completed`, `cancelled`

use chrono::NaiveDate;

use super::entity::event::{self, EventStatus};
use crate::utils::error::AppError;

/// 참가 신청을 받는 상태
pub const REGISTRATION_OPEN_STATUSES: [EventStatus; 2] =
    [EventStatus::Published, EventStatus::Ongoing];

/// 종료 상태
pub const TERMINAL_STATUSES: [EventStatus; 2] = [EventStatus::Completed, EventStatus::Cancelled];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    Publish,
    Start,
    Complete,
    Cancel,
}

impl LifecycleAction {
    pub fn target(&self) -> EventStatus {
        match self {
            LifecycleAction::Publish => EventStatus::Published,
            LifecycleAction::Start => EventStatus::Ongoing,
            LifecycleAction::Complete => EventStatus::Completed,
            LifecycleAction::Cancel => EventStatus::Cancelled,
        }
    }

    fn allowed_from(&self, current: EventStatus) -> bool {
        match self {
            LifecycleAction::Publish => current == EventStatus::Draft,
            LifecycleAction::Start => current == EventStatus::Published,
            LifecycleAction::Complete => current == EventStatus::Ongoing,
            LifecycleAction::Cancel => !is_terminal(current),
        }
    }
}

pub fn is_terminal(status: EventStatus) -> bool {
    TERMINAL_STATUSES.contains(&status)
}

/// 종료된 행사의 신청은 승인/반려할 수 없습니다.
pub fn ensure_not_terminal(event: &event::Model) -> Result<(), AppError> {
    if is_terminal(event.status) {
        return Err(AppError::InvalidStatusTransition(format!(
            "{} 상태의 행사 신청은 처리할 수 없습니다.",
            status_label(event.status)
        )));
    }
    Ok(())
}

/// 현재 상태에서 액션을 적용한 다음 상태를 반환합니다.
pub fn transition(current: EventStatus, action: LifecycleAction) -> Result<EventStatus, AppError> {
    if !action.allowed_from(current) {
        return Err(AppError::InvalidStatusTransition(format!(
            "{} 상태의 행사에는 {:?} 작업을 할 수 없습니다.",
            status_label(current),
            action
        )));
    }
    Ok(action.target())
}

/// 상태와 신청 마감일 기준으로 신청 가능 여부를 확인합니다.
///
/// 마감일 당일까지는 신청할 수 있습니다. 정원 검사는 등록 시 조건부 UPDATE가 담당합니다.
pub fn ensure_registration_open(event: &event::Model, today: NaiveDate) -> Result<(), AppError> {
    if !REGISTRATION_OPEN_STATUSES.contains(&event.status) {
        return Err(AppError::EventNotOpen(format!(
            "{} 상태의 행사는 신청할 수 없습니다.",
            status_label(event.status)
        )));
    }

    if let Some(deadline) = event.registration_deadline {
        if today > deadline {
            return Err(AppError::EventNotOpen(format!(
                "신청 마감일({})이 지났습니다.",
                deadline
            )));
        }
    }

    Ok(())
}

pub fn status_label(status: EventStatus) -> &'static str {
    match status {
        EventStatus::Draft => "draft",
        EventStatus::Published => "published",
        EventStatus::Ongoing => "ongoing",
        EventStatus::Completed => "completed",
        EventStatus::Cancelled => "cancelled",
    }
}
