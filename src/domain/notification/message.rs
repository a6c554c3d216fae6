use crate::domain::event::entity::event;
use crate::domain::user::entity::user;

#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// 행사 취소 안내
pub fn cancellation_notice(event: &event::Model, student: &user::Model) -> EmailMessage {
    EmailMessage {
        to: student.email.clone(),
        subject: format!("Event Cancelled: {}", event.title),
        body: format!(
            "Dear {},\n\n\
             The following event has been cancelled:\n\
             Event: {}\n\
             Originally Scheduled: {} from {} to {}\n\n\
             We apologize for any inconvenience caused.\n\n\
             Best regards,\n\
             Event Management Team\n",
            student.full_name,
            event.title,
            event.event_date,
            event.start_time.format("%H:%M"),
            event.end_time.format("%H:%M"),
        ),
    }
}

/// 신청 반려 안내
pub fn rejection_notice(event: &event::Model, student: &user::Model, reason: &str) -> EmailMessage {
    EmailMessage {
        to: student.email.clone(),
        subject: format!("Registration Update: {}", event.title),
        body: format!(
            "Dear {},\n\n\
             Your registration for the following event could not be approved:\n\
             Event: {}\n\
             Reason: {}\n\n\
             Please contact the organizers if you have any questions.\n\n\
             Best regards,\n\
             Event Management Team\n",
            student.full_name, event.title, reason,
        ),
    }
}
